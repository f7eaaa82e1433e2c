//! Skill repository trait definition.

use skilldex_types::error::RepositoryError;
use skilldex_types::skill::{Skill, SkillId};

/// Repository trait for skill persistence.
///
/// Implementations live in skilldex-infra (e.g., `SqliteSkillRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// The store enforces uniqueness of the canonical `name`; that constraint,
/// not the resolver's advisory lookup, is what guarantees at most one
/// skill record per canonical name under concurrent creation.
pub trait SkillRepository: Send + Sync {
    /// Insert a new skill. Returns the inserted skill, or
    /// [`RepositoryError::Conflict`] when a skill with the same canonical
    /// name already exists.
    fn insert(
        &self,
        skill: &Skill,
    ) -> impl std::future::Future<Output = Result<Skill, RepositoryError>> + Send;

    /// Get a skill by its canonical name.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Skill>, RepositoryError>> + Send;

    /// Get a skill by its unique id.
    fn get_by_id(
        &self,
        id: &SkillId,
    ) -> impl std::future::Future<Output = Result<Option<Skill>, RepositoryError>> + Send;

    /// List all skills, ordered by canonical name.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Skill>, RepositoryError>> + Send;

    /// Count all skill records.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
