//! Outbound collaborator trait definitions (ports).
//!
//! The directory core never talks to the chat platform directly; it hands
//! text to a [`Notifier`], dismisses pending forms through a
//! [`FormDismisser`], and resolves display names through a
//! [`ProfileLookup`]. The Slack-backed implementations live in
//! skilldex-infra.

use skilldex_types::error::DeliveryError;
use skilldex_types::member::UserId;

/// Delivers a plain-text notification to a member. One call per
/// completed flow.
pub trait Notifier: Send + Sync {
    fn post_text(
        &self,
        recipient: &UserId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;
}

/// Dismisses a pending form via its transport-supplied response endpoint.
pub trait FormDismisser: Send + Sync {
    fn dismiss(
        &self,
        response_url: &str,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;
}

/// Resolves a platform user id to a human-readable display name.
pub trait ProfileLookup: Send + Sync {
    fn display_name(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<String, DeliveryError>> + Send;
}
