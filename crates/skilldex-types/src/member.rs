use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::skill::SkillId;

/// External platform identity of a directory member.
///
/// Assigned by the chat platform (e.g. a Slack user id like `U02ABCDEF`),
/// never generated by Skilldex. Used as the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A directory member and the set of skills they hold.
///
/// Created on first skill declaration; never deleted by the directory
/// core. The skill set only grows (additive merge).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub user_id: UserId,
    /// Skill ids this member holds. Unordered, deduplicated.
    pub skills: BTreeSet<SkillId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Build a new member record holding the given skills.
    pub fn new(user_id: UserId, skills: BTreeSet<SkillId>) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            skills,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_serde_transparent() {
        let id = UserId::new("U12345");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"U12345\"");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_member_new_skill_set_deduplicates() {
        let skill = SkillId::new();
        let skills: BTreeSet<SkillId> = [skill, skill].into_iter().collect();
        let member = Member::new(UserId::new("U1"), skills);
        assert_eq!(member.skills.len(), 1);
    }
}
