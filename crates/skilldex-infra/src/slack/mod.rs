//! Slack Web API integration.
//!
//! `SlackClient` implements the core collaborator ports (notify, profile
//! lookup, form dismissal) on top of the Slack Web API, and
//! `signature` verifies inbound request signatures before any payload
//! is trusted.

pub mod client;
pub mod signature;

pub use client::SlackClient;
