//! Member repository trait definition.

use std::collections::BTreeSet;

use skilldex_types::error::RepositoryError;
use skilldex_types::member::{Member, UserId};
use skilldex_types::skill::SkillId;

/// Repository trait for member persistence and the member<->skill relation.
///
/// Implementations live in skilldex-infra (e.g., `SqliteMemberRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// `merge_skills` is the additive-union primitive: it must be a store-side
/// set union (insert-if-absent per pair), never a read-modify-write of the
/// whole set, so concurrent merges for the same member commute without
/// lost updates.
pub trait MemberRepository: Send + Sync {
    /// Get a member by platform user id.
    fn get(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<Member>, RepositoryError>> + Send;

    /// Insert a new member with their initial skill set. Returns
    /// [`RepositoryError::Conflict`] when the member already exists.
    fn insert(
        &self,
        member: &Member,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Additively union `skill_ids` into an existing member's set.
    /// Idempotent; already-held skills are left untouched. Returns
    /// [`RepositoryError::NotFound`] when the member does not exist.
    fn merge_skills(
        &self,
        user_id: &UserId,
        skill_ids: &BTreeSet<SkillId>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All members whose skill set contains the given skill id.
    fn find_by_skill(
        &self,
        skill_id: &SkillId,
    ) -> impl std::future::Future<Output = Result<Vec<UserId>, RepositoryError>> + Send;

    /// Count all member records.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
