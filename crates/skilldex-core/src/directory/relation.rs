//! Member-skill relation store.
//!
//! Maintains, per member, the set of skill ids they hold. The only
//! mutating operation is `merge_skills`, an additive set-union: skills
//! are never removed through this path, and resubmitting the same set is
//! a no-op after the first merge.

use std::collections::BTreeSet;

use skilldex_types::error::DirectoryError;
use skilldex_types::member::{Member, UserId};
use skilldex_types::skill::SkillId;

use crate::repository::member::MemberRepository;

/// Whether a merge created the member record or folded into an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDisposition {
    /// No record existed for this member before the merge.
    Created,
    /// The member already existed; the set was unioned in place.
    Merged,
}

/// Service owning the member<->skill relation lifecycle.
pub struct RelationStore<U: MemberRepository> {
    repo: U,
}

impl<U: MemberRepository> RelationStore<U> {
    pub fn new(repo: U) -> Self {
        Self { repo }
    }

    /// Union `skill_ids` into the member's set, creating the member record
    /// if absent.
    ///
    /// Idempotent: merging the same set twice leaves the relation
    /// unchanged. A concurrent first merge for the same member is
    /// tolerated: when the insert conflicts, the call falls back to the
    /// additive path against the winner's record.
    pub async fn merge_skills(
        &self,
        user_id: &UserId,
        skill_ids: &BTreeSet<SkillId>,
    ) -> Result<MergeDisposition, DirectoryError> {
        if self.repo.get(user_id).await?.is_none() {
            let member = Member::new(user_id.clone(), skill_ids.clone());
            match self.repo.insert(&member).await {
                Ok(()) => {
                    tracing::debug!(user_id = %user_id, skills = skill_ids.len(), "member created");
                    return Ok(MergeDisposition::Created);
                }
                Err(e) if e.is_conflict() => {
                    // Another submission created the member first; merge instead.
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.repo.merge_skills(user_id, skill_ids).await?;
        Ok(MergeDisposition::Merged)
    }

    /// The member's skill set. Empty when the member is unknown -- not an
    /// error.
    pub async fn member_skills(&self, user_id: &UserId) -> Result<BTreeSet<SkillId>, DirectoryError> {
        Ok(self
            .repo
            .get(user_id)
            .await?
            .map(|member| member.skills)
            .unwrap_or_default())
    }

    /// All members holding the given skill. Empty set, not an error, when
    /// none do.
    pub async fn holders_of(&self, skill_id: &SkillId) -> Result<BTreeSet<UserId>, DirectoryError> {
        Ok(self.repo.find_by_skill(skill_id).await?.into_iter().collect())
    }
}
