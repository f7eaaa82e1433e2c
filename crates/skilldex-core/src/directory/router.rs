//! Submission router: dispatches validated form submissions to the
//! declare/find flows and produces the outbound notification text.
//!
//! This is the single point that decides user-visible wording. Nothing
//! below it talks to the notifier. A store failure aborts the flow before
//! any message is sent, so the member never sees a silent false success.

use std::collections::BTreeSet;

use skilldex_types::error::DirectoryError;
use skilldex_types::member::UserId;
use skilldex_types::skill::{SkillId, canonicalize};
use skilldex_types::submission::{
    DeclareOutcome, DeclareSubmission, FindOutcome, FindSubmission, HolderRef, SubmissionEvent,
};

use crate::directory::relation::{MergeDisposition, RelationStore};
use crate::directory::resolver::SkillResolver;
use crate::notify::{FormDismisser, Notifier, ProfileLookup};
use crate::repository::member::MemberRepository;
use crate::repository::skill::SkillRepository;

/// Routes submissions through the resolver and relation store, then
/// notifies the submitting member.
pub struct SubmissionRouter<S, U, C>
where
    S: SkillRepository,
    U: MemberRepository,
    C: Notifier + ProfileLookup + FormDismisser,
{
    resolver: SkillResolver<S>,
    relations: RelationStore<U>,
    chat: C,
}

impl<S, U, C> SubmissionRouter<S, U, C>
where
    S: SkillRepository,
    U: MemberRepository,
    C: Notifier + ProfileLookup + FormDismisser,
{
    pub fn new(resolver: SkillResolver<S>, relations: RelationStore<U>, chat: C) -> Self {
        Self {
            resolver,
            relations,
            chat,
        }
    }

    /// Handle one submission to completion: run its flow, send the reply.
    pub async fn handle(&self, event: SubmissionEvent) -> Result<(), DirectoryError> {
        match event {
            SubmissionEvent::Declare(submission) => self.handle_declare(submission).await,
            SubmissionEvent::Find(submission) => self.handle_find(submission).await,
        }
    }

    async fn handle_declare(&self, submission: DeclareSubmission) -> Result<(), DirectoryError> {
        let keys = gather_keys(
            &submission.selected_skill_names,
            submission.new_skills_text.as_deref(),
        );

        let outcome = if keys.is_empty() {
            // Submitting with nothing selected is still a success; the
            // resolver and store are not touched.
            DeclareOutcome::Updated
        } else {
            let resolved = self.resolver.resolve_many(&keys).await?;
            let ids: BTreeSet<SkillId> = resolved.into_values().collect();
            match self.relations.merge_skills(&submission.user_id, &ids).await? {
                MergeDisposition::Created => DeclareOutcome::Added,
                MergeDisposition::Merged => DeclareOutcome::Updated,
            }
        };

        tracing::info!(
            user_id = %submission.user_id,
            skills = keys.len(),
            outcome = ?outcome,
            "declare flow completed"
        );

        if let Err(e) = self
            .chat
            .post_text(&submission.user_id, declare_text(outcome))
            .await
        {
            tracing::error!(user_id = %submission.user_id, error = %e, "failed to notify member");
        }

        self.dismiss_all(&submission.response_urls).await;
        Ok(())
    }

    async fn handle_find(&self, submission: FindSubmission) -> Result<(), DirectoryError> {
        let raw_name = submission.selected_skill_name.clone();
        let key = canonicalize(&raw_name);

        let skill_id = if key.is_empty() {
            None
        } else {
            self.resolver.lookup(&key).await?
        };

        let outcome = match skill_id {
            None => FindOutcome::SkillNotFound { name: raw_name },
            Some(skill_id) => {
                let holders = self.relations.holders_of(&skill_id).await?;
                if holders.is_empty() {
                    FindOutcome::NoHolders { name: raw_name }
                } else {
                    let holders = self.resolve_holder_names(holders).await;
                    FindOutcome::Holders {
                        name: raw_name,
                        holders,
                    }
                }
            }
        };

        tracing::info!(
            user_id = %submission.user_id,
            skill = %submission.selected_skill_name,
            outcome = outcome_label(&outcome),
            "find flow completed"
        );

        let text = find_text(&outcome, &submission.team_id);
        if let Err(e) = self.chat.post_text(&submission.user_id, &text).await {
            tracing::error!(user_id = %submission.user_id, error = %e, "failed to notify member");
        }
        Ok(())
    }

    /// Resolve display names for all holders, concurrently. A failed
    /// lookup degrades to the raw platform id rather than failing the flow.
    async fn resolve_holder_names(&self, holders: BTreeSet<UserId>) -> Vec<HolderRef> {
        let lookups = holders.into_iter().map(|user_id| async move {
            let display_name = match self.chat.display_name(&user_id).await {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "profile lookup failed");
                    user_id.to_string()
                }
            };
            HolderRef {
                user_id,
                display_name,
            }
        });
        futures_util::future::join_all(lookups).await
    }

    /// Dismiss every auxiliary response endpoint exactly once. Issued
    /// concurrently; a failing endpoint is logged and never blocks the
    /// others or the member-facing reply.
    async fn dismiss_all(&self, response_urls: &[String]) {
        let results =
            futures_util::future::join_all(response_urls.iter().map(|url| self.chat.dismiss(url)))
                .await;
        for (url, result) in response_urls.iter().zip(results) {
            if let Err(e) = result {
                tracing::warn!(response_url = %url, error = %e, "form dismissal failed");
            }
        }
    }
}

/// Union selected names and comma-separated free text into one set of
/// canonical keys. Names that are empty after canonicalization are
/// silently dropped rather than failing the submission.
pub fn gather_keys(selected: &[String], new_skills_text: Option<&str>) -> BTreeSet<String> {
    let free_text = new_skills_text.unwrap_or_default();
    selected
        .iter()
        .map(String::as_str)
        .chain(free_text.split(','))
        .map(canonicalize)
        .filter(|key| !key.is_empty())
        .collect()
}

fn declare_text(outcome: DeclareOutcome) -> &'static str {
    match outcome {
        DeclareOutcome::Added => "Your skills were added successfully!",
        DeclareOutcome::Updated => "Skills updated successfully!",
    }
}

fn find_text(outcome: &FindOutcome, team_id: &str) -> String {
    match outcome {
        FindOutcome::SkillNotFound { name } => format!("Skill not found in database '{name}'."),
        FindOutcome::NoHolders { name } => format!("No users found with the skill '{name}'."),
        FindOutcome::Holders { name, holders } => {
            let list: Vec<String> = holders
                .iter()
                .map(|holder| {
                    format!(
                        "- <slack://user?team={team_id}&id={}|{}>",
                        holder.user_id, holder.display_name
                    )
                })
                .collect();
            format!("Users with the skill '{name}':\n{}", list.join("\n"))
        }
    }
}

fn outcome_label(outcome: &FindOutcome) -> &'static str {
    match outcome {
        FindOutcome::SkillNotFound { .. } => "skill_not_found",
        FindOutcome::NoHolders { .. } => "no_holders",
        FindOutcome::Holders { .. } => "holders",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::testutil::{
        MemoryMemberRepository, MemorySkillRepository, RecordingChat,
    };

    struct Harness {
        router: SubmissionRouter<MemorySkillRepository, MemoryMemberRepository, RecordingChat>,
        skills: MemorySkillRepository,
        members: MemoryMemberRepository,
        chat: RecordingChat,
    }

    fn harness() -> Harness {
        let skills = MemorySkillRepository::default();
        let members = MemoryMemberRepository::default();
        let chat = RecordingChat::default();
        let router = SubmissionRouter::new(
            SkillResolver::new(skills.clone()),
            RelationStore::new(members.clone()),
            chat.clone(),
        );
        Harness {
            router,
            skills,
            members,
            chat,
        }
    }

    fn declare(user: &str, selected: &[&str], text: Option<&str>) -> SubmissionEvent {
        SubmissionEvent::Declare(DeclareSubmission {
            user_id: UserId::new(user),
            selected_skill_names: selected.iter().map(|s| s.to_string()).collect(),
            new_skills_text: text.map(String::from),
            response_urls: Vec::new(),
        })
    }

    fn find(user: &str, skill: &str) -> SubmissionEvent {
        SubmissionEvent::Find(FindSubmission {
            user_id: UserId::new(user),
            team_id: "T1".to_string(),
            selected_skill_name: skill.to_string(),
        })
    }

    #[test]
    fn test_gather_keys_unions_and_deduplicates() {
        let selected = vec!["Go".to_string(), " rust".to_string()];
        let keys = gather_keys(&selected, Some("Rust, C++, ,go"));
        let expected: BTreeSet<String> = ["go", "rust", "c++"].into_iter().map(String::from).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_gather_keys_drops_blank_tokens() {
        assert!(gather_keys(&[], Some(" , ,  ")).is_empty());
        assert!(gather_keys(&["  ".to_string()], None).is_empty());
    }

    #[tokio::test]
    async fn test_new_member_mixed_case_and_free_text() {
        // selected=[], text="Rust, rust, C++" -> skills {rust, c++}, outcome "added"
        let h = harness();

        h.router
            .handle(declare("U1", &[], Some("Rust, rust, C++")))
            .await
            .unwrap();

        assert_eq!(h.skills.count().await.unwrap(), 2);
        assert!(h.skills.get_by_name("rust").await.unwrap().is_some());
        assert!(h.skills.get_by_name("c++").await.unwrap().is_some());

        let member = h.members.get(&UserId::new("U1")).await.unwrap().unwrap();
        assert_eq!(member.skills.len(), 2);

        let messages = h.chat.messages.lock().await;
        assert_eq!(
            messages.as_slice(),
            &[(UserId::new("U1"), "Your skills were added successfully!".to_string())]
        );
    }

    #[tokio::test]
    async fn test_existing_member_resubmits_same_skill() {
        // Existing member {"go"} re-submits selected=["go"] -> nothing grows.
        let h = harness();
        h.router
            .handle(declare("U1", &[], Some("go")))
            .await
            .unwrap();

        h.router.handle(declare("U1", &["go"], Some(""))).await.unwrap();

        assert_eq!(h.skills.count().await.unwrap(), 1);
        let member = h.members.get(&UserId::new("U1")).await.unwrap().unwrap();
        assert_eq!(member.skills.len(), 1);

        let messages = h.chat.messages.lock().await;
        assert_eq!(messages[1].1, "Skills updated successfully!");
    }

    #[tokio::test]
    async fn test_declare_round_trip_canonicalizes_variants() {
        // {"go", "Go ", " GO"} -> one skill named "go", singleton member set.
        let h = harness();

        h.router
            .handle(declare("U1", &["go", "Go "], Some(" GO")))
            .await
            .unwrap();

        assert_eq!(h.skills.count().await.unwrap(), 1);
        let skill = h.skills.get_by_name("go").await.unwrap().unwrap();
        let member = h.members.get(&UserId::new("U1")).await.unwrap().unwrap();
        assert_eq!(member.skills, [skill.id].into_iter().collect());
    }

    #[tokio::test]
    async fn test_empty_declaration_succeeds_without_store_calls() {
        let h = harness();

        h.router.handle(declare("U1", &[], None)).await.unwrap();

        assert_eq!(h.skills.count().await.unwrap(), 0);
        assert_eq!(h.members.count().await.unwrap(), 0);
        let messages = h.chat.messages.lock().await;
        assert_eq!(messages.len(), 1, "the member still gets an acknowledgement");
    }

    #[tokio::test]
    async fn test_declare_dismisses_every_response_url() {
        let h = harness();
        let event = SubmissionEvent::Declare(DeclareSubmission {
            user_id: UserId::new("U1"),
            selected_skill_names: vec![],
            new_skills_text: Some("zig".to_string()),
            response_urls: vec!["https://a.example/1".to_string(), "https://a.example/2".to_string()],
        });

        h.router.handle(event).await.unwrap();

        let dismissed = h.chat.dismissed.lock().await;
        assert_eq!(dismissed.len(), 2);
    }

    #[tokio::test]
    async fn test_failing_dismissal_does_not_block_the_others() {
        let h = harness();
        h.chat.fail_dismissals_to("https://a.example/bad").await;
        let event = SubmissionEvent::Declare(DeclareSubmission {
            user_id: UserId::new("U1"),
            selected_skill_names: vec![],
            new_skills_text: Some("zig".to_string()),
            response_urls: vec![
                "https://a.example/bad".to_string(),
                "https://a.example/good".to_string(),
            ],
        });

        h.router.handle(event).await.unwrap();

        let dismissed = h.chat.dismissed.lock().await;
        assert_eq!(dismissed.as_slice(), &["https://a.example/good".to_string()]);
        // The member-facing reply still went out.
        assert_eq!(h.chat.messages.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_find_unknown_skill_does_not_create() {
        let h = harness();

        h.router.handle(find("U9", "Erlang")).await.unwrap();

        assert_eq!(h.skills.count().await.unwrap(), 0);
        let messages = h.chat.messages.lock().await;
        assert_eq!(messages[0].1, "Skill not found in database 'Erlang'.");
    }

    #[tokio::test]
    async fn test_find_skill_with_no_holders() {
        let h = harness();
        // Create the skill without any holder by declaring then asking as
        // a different path: insert directly through the repository.
        h.skills
            .insert(&skilldex_types::skill::Skill::new("cobol"))
            .await
            .unwrap();

        h.router.handle(find("U9", "cobol")).await.unwrap();

        let messages = h.chat.messages.lock().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].1, "No users found with the skill 'cobol'.");
    }

    #[tokio::test]
    async fn test_find_lists_all_holders() {
        let h = harness();
        h.chat.set_display_name(&UserId::new("U1"), "Ada Lovelace").await;
        h.chat.set_display_name(&UserId::new("U2"), "Grace Hopper").await;
        h.router.handle(declare("U1", &[], Some("fortran"))).await.unwrap();
        h.router.handle(declare("U2", &[], Some("Fortran"))).await.unwrap();

        h.router.handle(find("U9", "fortran")).await.unwrap();

        let messages = h.chat.messages.lock().await;
        let reply = &messages.last().unwrap().1;
        assert!(reply.starts_with("Users with the skill 'fortran':"));
        // Order is not guaranteed; assert membership, not sequence.
        assert!(reply.contains("<slack://user?team=T1&id=U1|Ada Lovelace>"));
        assert!(reply.contains("<slack://user?team=T1&id=U2|Grace Hopper>"));
    }

    #[tokio::test]
    async fn test_find_degrades_to_raw_id_when_profile_lookup_fails() {
        let h = harness();
        h.router.handle(declare("U1", &[], Some("apl"))).await.unwrap();

        h.router.handle(find("U9", "apl")).await.unwrap();

        let messages = h.chat.messages.lock().await;
        let reply = &messages.last().unwrap().1;
        assert!(reply.contains("<slack://user?team=T1&id=U1|U1>"));
    }

    #[tokio::test]
    async fn test_concurrent_declarations_of_brand_new_skill() {
        // Two members declare "kubernetes" at once: exactly one record,
        // both member sets end up holding its id.
        let h = harness();

        let (a, b) = tokio::join!(
            h.router.handle(declare("U1", &[], Some("kubernetes"))),
            h.router.handle(declare("U2", &[], Some("kubernetes"))),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(h.skills.count().await.unwrap(), 1);
        let skill = h.skills.get_by_name("kubernetes").await.unwrap().unwrap();
        for user in ["U1", "U2"] {
            let member = h.members.get(&UserId::new(user)).await.unwrap().unwrap();
            assert_eq!(member.skills, [skill.id].into_iter().collect());
        }
    }
}
