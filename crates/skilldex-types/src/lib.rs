//! Shared domain types for Skilldex.
//!
//! This crate contains the core domain types used across the Skilldex
//! directory: Skill, Member, submission payloads, and their associated
//! error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod member;
pub mod skill;
pub mod submission;
