//! In-memory trait implementations for directory tests.
//!
//! The skill and member repositories enforce the same uniqueness and
//! additive-merge semantics as the SQLite implementations, so resolver
//! and router tests exercise real conflict behavior without a database.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use skilldex_types::error::{DeliveryError, RepositoryError};
use skilldex_types::member::{Member, UserId};
use skilldex_types::skill::{Skill, SkillId};

use crate::notify::{FormDismisser, Notifier, ProfileLookup};
use crate::repository::member::MemberRepository;
use crate::repository::skill::SkillRepository;

/// Skill store with a unique-name constraint, keyed by canonical name.
#[derive(Clone, Default)]
pub(crate) struct MemorySkillRepository {
    skills: Arc<Mutex<HashMap<String, Skill>>>,
}

impl SkillRepository for MemorySkillRepository {
    async fn insert(&self, skill: &Skill) -> Result<Skill, RepositoryError> {
        let mut skills = self.skills.lock().await;
        if skills.contains_key(&skill.name) {
            return Err(RepositoryError::Conflict(format!(
                "skill name '{}' already exists",
                skill.name
            )));
        }
        skills.insert(skill.name.clone(), skill.clone());
        Ok(skill.clone())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Skill>, RepositoryError> {
        Ok(self.skills.lock().await.get(name).cloned())
    }

    async fn get_by_id(&self, id: &SkillId) -> Result<Option<Skill>, RepositoryError> {
        Ok(self
            .skills
            .lock()
            .await
            .values()
            .find(|skill| skill.id == *id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Skill>, RepositoryError> {
        let mut all: Vec<Skill> = self.skills.lock().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.skills.lock().await.len() as u64)
    }
}

/// Wrapper that loses the create race exactly once for a chosen name:
/// right before the first insert goes through, a competing record with
/// the same name lands in the store, so the wrapped insert conflicts.
#[derive(Clone)]
pub(crate) struct RacingSkillRepository {
    inner: MemorySkillRepository,
    contested: String,
    raced: Arc<AtomicBool>,
}

impl RacingSkillRepository {
    pub(crate) fn new(contested: &str) -> Self {
        Self {
            inner: MemorySkillRepository::default(),
            contested: contested.to_string(),
            raced: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn inner(&self) -> MemorySkillRepository {
        self.inner.clone()
    }
}

impl SkillRepository for RacingSkillRepository {
    async fn insert(&self, skill: &Skill) -> Result<Skill, RepositoryError> {
        if skill.name == self.contested && !self.raced.swap(true, Ordering::SeqCst) {
            let winner = Skill::new(&self.contested);
            self.inner
                .insert(&winner)
                .await
                .expect("competing insert must succeed");
        }
        self.inner.insert(skill).await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Skill>, RepositoryError> {
        self.inner.get_by_name(name).await
    }

    async fn get_by_id(&self, id: &SkillId) -> Result<Option<Skill>, RepositoryError> {
        self.inner.get_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<Skill>, RepositoryError> {
        self.inner.list().await
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        self.inner.count().await
    }
}

/// Member store with additive merge semantics.
#[derive(Clone, Default)]
pub(crate) struct MemoryMemberRepository {
    members: Arc<Mutex<HashMap<UserId, Member>>>,
}

impl MemberRepository for MemoryMemberRepository {
    async fn get(&self, user_id: &UserId) -> Result<Option<Member>, RepositoryError> {
        Ok(self.members.lock().await.get(user_id).cloned())
    }

    async fn insert(&self, member: &Member) -> Result<(), RepositoryError> {
        let mut members = self.members.lock().await;
        if members.contains_key(&member.user_id) {
            return Err(RepositoryError::Conflict(format!(
                "member '{}' already exists",
                member.user_id
            )));
        }
        members.insert(member.user_id.clone(), member.clone());
        Ok(())
    }

    async fn merge_skills(
        &self,
        user_id: &UserId,
        skill_ids: &BTreeSet<SkillId>,
    ) -> Result<(), RepositoryError> {
        let mut members = self.members.lock().await;
        let member = members.get_mut(user_id).ok_or(RepositoryError::NotFound)?;
        member.skills.extend(skill_ids.iter().copied());
        member.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn find_by_skill(&self, skill_id: &SkillId) -> Result<Vec<UserId>, RepositoryError> {
        Ok(self
            .members
            .lock()
            .await
            .values()
            .filter(|member| member.skills.contains(skill_id))
            .map(|member| member.user_id.clone())
            .collect())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.members.lock().await.len() as u64)
    }
}

/// Wrapper that loses the member-create race exactly once: right before
/// the first insert goes through, a competing record for the same member
/// lands in the store, so the wrapped insert conflicts and the caller
/// must fall back to the additive path.
#[derive(Clone)]
pub(crate) struct RacingMemberRepository {
    inner: MemoryMemberRepository,
    competing_skills: BTreeSet<SkillId>,
    raced: Arc<AtomicBool>,
}

impl RacingMemberRepository {
    pub(crate) fn new(competing_skills: BTreeSet<SkillId>) -> Self {
        Self {
            inner: MemoryMemberRepository::default(),
            competing_skills,
            raced: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl MemberRepository for RacingMemberRepository {
    async fn get(&self, user_id: &UserId) -> Result<Option<Member>, RepositoryError> {
        self.inner.get(user_id).await
    }

    async fn insert(&self, member: &Member) -> Result<(), RepositoryError> {
        if !self.raced.swap(true, Ordering::SeqCst) {
            let winner = Member::new(member.user_id.clone(), self.competing_skills.clone());
            self.inner
                .insert(&winner)
                .await
                .expect("competing insert must succeed");
        }
        self.inner.insert(member).await
    }

    async fn merge_skills(
        &self,
        user_id: &UserId,
        skill_ids: &BTreeSet<SkillId>,
    ) -> Result<(), RepositoryError> {
        self.inner.merge_skills(user_id, skill_ids).await
    }

    async fn find_by_skill(&self, skill_id: &SkillId) -> Result<Vec<UserId>, RepositoryError> {
        self.inner.find_by_skill(skill_id).await
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        self.inner.count().await
    }
}

/// Chat collaborator that records every outbound call.
#[derive(Clone, Default)]
pub(crate) struct RecordingChat {
    pub(crate) messages: Arc<Mutex<Vec<(UserId, String)>>>,
    pub(crate) dismissed: Arc<Mutex<Vec<String>>>,
    pub(crate) display_names: Arc<Mutex<HashMap<UserId, String>>>,
    pub(crate) failing_dismiss_url: Arc<Mutex<Option<String>>>,
}

impl RecordingChat {
    pub(crate) async fn set_display_name(&self, user_id: &UserId, name: &str) {
        self.display_names
            .lock()
            .await
            .insert(user_id.clone(), name.to_string());
    }

    pub(crate) async fn fail_dismissals_to(&self, url: &str) {
        *self.failing_dismiss_url.lock().await = Some(url.to_string());
    }
}

impl Notifier for RecordingChat {
    async fn post_text(&self, recipient: &UserId, text: &str) -> Result<(), DeliveryError> {
        self.messages
            .lock()
            .await
            .push((recipient.clone(), text.to_string()));
        Ok(())
    }
}

impl FormDismisser for RecordingChat {
    async fn dismiss(&self, response_url: &str) -> Result<(), DeliveryError> {
        if self.failing_dismiss_url.lock().await.as_deref() == Some(response_url) {
            return Err(DeliveryError::Transport("connection refused".to_string()));
        }
        self.dismissed.lock().await.push(response_url.to_string());
        Ok(())
    }
}

impl ProfileLookup for RecordingChat {
    async fn display_name(&self, user_id: &UserId) -> Result<String, DeliveryError> {
        self.display_names
            .lock()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| DeliveryError::Api(format!("user '{user_id}' unknown")))
    }
}
