use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a skill, wrapping a UUID v7 (time-sortable).
///
/// Assigned exactly once when a canonical skill name is first seen;
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillId(pub Uuid);

impl SkillId {
    /// Create a new SkillId using UUID v7 (time-sortable, guaranteed ordering).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a SkillId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SkillId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SkillId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A skill in the directory.
///
/// `name` is always the canonical form (see [`canonicalize`]) and is
/// unique across all skills: for every distinct canonical name there is
/// at most one Skill record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    /// Canonical lowercase, trimmed name. Unique.
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Skill {
    /// Build a new skill record for an already-canonicalized name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SkillId::new(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Normalize a raw skill name into its canonical key.
///
/// Lower-cases and trims leading/trailing whitespace. Nothing else: no
/// singular/plural folding, no punctuation stripping. Two raw strings
/// that canonicalize to the same key refer to the same skill.
///
/// An empty result means the input was blank; callers must discard it
/// before resolution (no empty-named skills).
///
/// # Examples
///
/// ```
/// use skilldex_types::skill::canonicalize;
///
/// assert_eq!(canonicalize("  Rust "), "rust");
/// assert_eq!(canonicalize("C++"), "c++");
/// assert_eq!(canonicalize("   "), "");
/// ```
pub fn canonicalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
