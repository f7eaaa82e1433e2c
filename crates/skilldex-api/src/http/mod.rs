//! HTTP layer for Skilldex.
//!
//! Axum-based webhook surface for Slack: slash commands, modal
//! submissions, event callbacks, and the OAuth install handshake.
//! Every inbound Slack request is signature-verified before its body
//! is parsed.

pub mod error;
pub mod handlers;
pub mod payload;
pub mod router;
pub mod views;
