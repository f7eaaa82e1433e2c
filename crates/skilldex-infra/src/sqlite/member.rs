//! SQLite member repository implementation.
//!
//! Implements `MemberRepository` from `skilldex-core`. The member<->skill
//! relation lives in the `member_skills` join table; the additive merge is
//! an `INSERT OR IGNORE` per pair inside one transaction, never a
//! read-modify-write of the whole set, so concurrent merges for the same
//! member cannot lose updates.

use std::collections::BTreeSet;

use sqlx::Row;

use skilldex_core::repository::member::MemberRepository;
use skilldex_types::error::RepositoryError;
use skilldex_types::member::{Member, UserId};
use skilldex_types::skill::SkillId;

use super::pool::DatabasePool;
use super::skill::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `MemberRepository`.
pub struct SqliteMemberRepository {
    pool: DatabasePool,
}

impl SqliteMemberRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn skill_ids_for(&self, user_id: &UserId) -> Result<BTreeSet<SkillId>, RepositoryError> {
        let rows = sqlx::query("SELECT skill_id FROM member_skills WHERE user_id = ?")
            .bind(user_id.as_str())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let id: String = row
                    .try_get("skill_id")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                id.parse::<SkillId>()
                    .map_err(|e| RepositoryError::Query(format!("invalid skill id: {e}")))
            })
            .collect()
    }
}

impl MemberRepository for SqliteMemberRepository {
    async fn get(&self, user_id: &UserId) -> Result<Option<Member>, RepositoryError> {
        let row = sqlx::query("SELECT user_id, created_at, updated_at FROM members WHERE user_id = ?")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let updated_at: String = row
            .try_get("updated_at")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Some(Member {
            user_id: user_id.clone(),
            skills: self.skill_ids_for(user_id).await?,
            created_at: parse_datetime(&created_at)?,
            updated_at: parse_datetime(&updated_at)?,
        }))
    }

    async fn insert(&self, member: &Member) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query("INSERT INTO members (user_id, created_at, updated_at) VALUES (?, ?, ?)")
            .bind(member.user_id.as_str())
            .bind(format_datetime(&member.created_at))
            .bind(format_datetime(&member.updated_at))
            .execute(&mut *tx)
            .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                return Err(RepositoryError::Conflict(format!(
                    "member '{}' already exists",
                    member.user_id
                )));
            }
            Err(e) => return Err(RepositoryError::Query(e.to_string())),
        }

        for skill_id in &member.skills {
            sqlx::query("INSERT OR IGNORE INTO member_skills (user_id, skill_id) VALUES (?, ?)")
                .bind(member.user_id.as_str())
                .bind(skill_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    async fn merge_skills(
        &self,
        user_id: &UserId,
        skill_ids: &BTreeSet<SkillId>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let touched = sqlx::query("UPDATE members SET updated_at = ? WHERE user_id = ?")
            .bind(format_datetime(&chrono::Utc::now()))
            .bind(user_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if touched.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        for skill_id in skill_ids {
            sqlx::query("INSERT OR IGNORE INTO member_skills (user_id, skill_id) VALUES (?, ?)")
                .bind(user_id.as_str())
                .bind(skill_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    async fn find_by_skill(&self, skill_id: &SkillId) -> Result<Vec<UserId>, RepositoryError> {
        let rows = sqlx::query("SELECT user_id FROM member_skills WHERE skill_id = ?")
            .bind(skill_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let id: String = row
                    .try_get("user_id")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(UserId::new(id))
            })
            .collect()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(row.0 as u64)
    }
}
