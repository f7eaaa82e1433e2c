//! Directory engine and repository trait definitions for Skilldex.
//!
//! This crate defines the "ports" (repository and collaborator traits)
//! that the infrastructure layer implements, plus the skill resolution
//! and member-skill relation logic behind the declare/find flows. It
//! depends only on `skilldex-types` -- never on `skilldex-infra` or any
//! database/IO crate.

pub mod directory;
pub mod notify;
pub mod repository;
