//! Validated form-submission payloads and flow outcomes.
//!
//! The transport layer parses the platform's loosely-typed modal payload
//! into one of these structs before anything touches the resolver or the
//! store. Malformed payloads are rejected at the boundary.

use serde::{Deserialize, Serialize};

use crate::member::UserId;

/// An inbound form submission, discriminated into one of the two flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "lowercase")]
pub enum SubmissionEvent {
    Declare(DeclareSubmission),
    Find(FindSubmission),
}

/// Flow A input: a member declaring the skills they hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclareSubmission {
    pub user_id: UserId,
    /// Previously-known skill names picked from the multi-select. May be empty.
    pub selected_skill_names: Vec<String>,
    /// Free-text input of new, comma-separated skill names. Optional.
    pub new_skills_text: Option<String>,
    /// Auxiliary response endpoints the transport wants dismissed after
    /// the submission is accepted. Each is notified exactly once.
    pub response_urls: Vec<String>,
}

/// Flow B input: a member asking who holds a skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindSubmission {
    pub user_id: UserId,
    /// Workspace/team id, needed to build user links in the reply.
    pub team_id: String,
    /// The selected skill name as the user saw it (not canonicalized).
    pub selected_skill_name: String,
}

/// Terminal outcome of Flow A. Both variants are successes; they differ
/// only in wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclareOutcome {
    /// The member record did not exist before this submission.
    Added,
    /// The member already existed; skills were merged into their set.
    Updated,
}

/// A resolved holder of a skill: platform identity plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderRef {
    pub user_id: UserId,
    pub display_name: String,
}

/// Terminal outcome of Flow B.
///
/// Holder order is not guaranteed stable; treat the list as a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindOutcome {
    /// No skill with that name has ever been declared. Carries the
    /// original user-facing name for display.
    SkillNotFound { name: String },
    /// The skill exists but nobody currently holds it.
    NoHolders { name: String },
    /// At least one member holds the skill.
    Holders { name: String, holders: Vec<HolderRef> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_event_discriminator() {
        let event = SubmissionEvent::Find(FindSubmission {
            user_id: UserId::new("U1"),
            team_id: "T1".to_string(),
            selected_skill_name: "rust".to_string(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["flow"], "find");
    }

    #[test]
    fn test_find_outcome_serde_roundtrip() {
        let outcome = FindOutcome::Holders {
            name: "rust".to_string(),
            holders: vec![HolderRef {
                user_id: UserId::new("U1"),
                display_name: "Ada".to_string(),
            }],
        };
        let json = serde_json::to_string(&outcome).unwrap();
        let back: FindOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }

    #[test]
    fn test_declare_outcome_is_not_an_error() {
        // Two-valued success, wording only.
        assert_ne!(DeclareOutcome::Added, DeclareOutcome::Updated);
    }
}
