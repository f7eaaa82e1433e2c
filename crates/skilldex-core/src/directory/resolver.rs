//! Skill resolver: canonical key -> stable skill identity.
//!
//! Maps a canonical skill name to its id, creating the record exactly
//! once even under concurrent first-time resolution. The lookup-then-
//! create sequence here is advisory; the store's uniqueness constraint on
//! the name is the source of truth, and a create that loses the race
//! recovers by re-reading the winner's record.

use std::collections::{BTreeMap, BTreeSet};

use skilldex_types::error::DirectoryError;
use skilldex_types::skill::{Skill, SkillId};

use crate::repository::skill::SkillRepository;

/// Resolves canonical skill keys to stable skill identities.
pub struct SkillResolver<S: SkillRepository> {
    repo: S,
}

impl<S: SkillRepository> SkillResolver<S> {
    pub fn new(repo: S) -> Self {
        Self { repo }
    }

    /// Resolve a canonical key to a skill id, creating the skill if it
    /// does not exist yet.
    ///
    /// Two concurrent resolutions of the same previously-unseen key never
    /// produce two records: the loser of the create race falls back to a
    /// fresh lookup and returns the winner's id.
    pub async fn resolve_or_create(&self, key: &str) -> Result<SkillId, DirectoryError> {
        if let Some(existing) = self.repo.get_by_name(key).await? {
            return Ok(existing.id);
        }

        let candidate = Skill::new(key);
        match self.repo.insert(&candidate).await {
            Ok(created) => {
                tracing::debug!(skill = %created.name, id = %created.id, "created skill");
                Ok(created.id)
            }
            Err(e) if e.is_conflict() => {
                // Lost the create race; the winner's record is authoritative.
                let winner = self.repo.get_by_name(key).await?.ok_or_else(|| {
                    DirectoryError::Storage(format!(
                        "skill '{key}' conflicted on insert but is absent on re-read"
                    ))
                })?;
                Ok(winner.id)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve a batch of already-deduplicated canonical keys, concurrently.
    ///
    /// Set-typed input means a batch never attempts to create the same
    /// new name twice in one call.
    pub async fn resolve_many(
        &self,
        keys: &BTreeSet<String>,
    ) -> Result<BTreeMap<String, SkillId>, DirectoryError> {
        let resolutions = keys.iter().map(|key| async move {
            let id = self.resolve_or_create(key).await?;
            Ok::<_, DirectoryError>((key.clone(), id))
        });

        let pairs = futures_util::future::try_join_all(resolutions).await?;
        Ok(pairs.into_iter().collect())
    }

    /// Look up a canonical key without creating anything. A search for a
    /// nonexistent skill must not invent it.
    pub async fn lookup(&self, key: &str) -> Result<Option<SkillId>, DirectoryError> {
        Ok(self.repo.get_by_name(key).await?.map(|skill| skill.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::testutil::{MemorySkillRepository, RacingSkillRepository};

    #[tokio::test]
    async fn test_resolve_or_create_creates_once() {
        let resolver = SkillResolver::new(MemorySkillRepository::default());

        let first = resolver.resolve_or_create("rust").await.unwrap();
        let second = resolver.resolve_or_create("rust").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(resolver.repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_resolve_or_create_conflict_falls_back_to_winner() {
        // The racing repo injects a winning insert between the resolver's
        // lookup and its own insert attempt, forcing the conflict path.
        let repo = RacingSkillRepository::new("kubernetes");
        let resolver = SkillResolver::new(repo);

        let id = resolver.resolve_or_create("kubernetes").await.unwrap();

        let winner = resolver
            .repo
            .inner()
            .get_by_name("kubernetes")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(id, winner.id, "loser must return the winner's id");
        assert_eq!(resolver.repo.inner().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_time_resolutions_single_record() {
        let resolver = SkillResolver::new(MemorySkillRepository::default());

        let (a, b, c, d) = tokio::join!(
            resolver.resolve_or_create("go"),
            resolver.resolve_or_create("go"),
            resolver.resolve_or_create("go"),
            resolver.resolve_or_create("go"),
        );

        let first = a.unwrap();
        assert_eq!(first, b.unwrap());
        assert_eq!(first, c.unwrap());
        assert_eq!(first, d.unwrap());
        assert_eq!(resolver.repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_resolve_many_resolves_batch() {
        let resolver = SkillResolver::new(MemorySkillRepository::default());
        let keys: BTreeSet<String> = ["rust", "c++", "go"]
            .into_iter()
            .map(String::from)
            .collect();

        let resolved = resolver.resolve_many(&keys).await.unwrap();

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolver.repo.count().await.unwrap(), 3);
        // Re-resolving the same batch creates nothing new.
        let again = resolver.resolve_many(&keys).await.unwrap();
        assert_eq!(again, resolved);
        assert_eq!(resolver.repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_lookup_does_not_create() {
        let resolver = SkillResolver::new(MemorySkillRepository::default());

        let found = resolver.lookup("elixir").await.unwrap();

        assert!(found.is_none());
        assert_eq!(resolver.repo.count().await.unwrap(), 0);
    }
}
