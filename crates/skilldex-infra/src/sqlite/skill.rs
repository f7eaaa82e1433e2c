//! SQLite skill repository implementation.
//!
//! Implements `SkillRepository` from `skilldex-core` using sqlx with split
//! read/write pools. The UNIQUE index on `skills.name` is what makes
//! resolve-or-create safe under concurrent first-time resolution.

use chrono::{DateTime, Utc};
use sqlx::Row;

use skilldex_core::repository::skill::SkillRepository;
use skilldex_types::error::RepositoryError;
use skilldex_types::skill::{Skill, SkillId};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SkillRepository`.
pub struct SqliteSkillRepository {
    pool: DatabasePool,
}

impl SqliteSkillRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn skill_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Skill, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(Skill {
        id: id
            .parse::<SkillId>()
            .map_err(|e| RepositoryError::Query(format!("invalid skill id: {e}")))?,
        name,
        created_at: parse_datetime(&created_at)?,
    })
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl SkillRepository for SqliteSkillRepository {
    async fn insert(&self, skill: &Skill) -> Result<Skill, RepositoryError> {
        let result = sqlx::query("INSERT INTO skills (id, name, created_at) VALUES (?, ?, ?)")
            .bind(skill.id.to_string())
            .bind(&skill.name)
            .bind(format_datetime(&skill.created_at))
            .execute(&self.pool.writer)
            .await;

        match result {
            Ok(_) => Ok(skill.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(format!(
                    "skill name '{}' already exists",
                    skill.name
                )))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Skill>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, created_at FROM skills WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(skill_from_row).transpose()
    }

    async fn get_by_id(&self, id: &SkillId) -> Result<Option<Skill>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, created_at FROM skills WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(skill_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Skill>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, created_at FROM skills ORDER BY name ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(skill_from_row).collect()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM skills")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(row.0 as u64)
    }
}
