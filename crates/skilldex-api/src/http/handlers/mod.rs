//! HTTP request handlers for the Slack webhook surface.

pub mod command;
pub mod event;
pub mod oauth;
pub mod submission;

use axum::http::HeaderMap;
use secrecy::ExposeSecret;

use skilldex_infra::slack::signature;

use crate::http::error::AppError;
use crate::state::AppState;

/// Verify the inbound request signature before trusting the body.
pub(crate) fn verify_slack_signature(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), AppError> {
    let timestamp = header_str(headers, "x-slack-request-timestamp")?;
    let sig = header_str(headers, "x-slack-signature")?;

    signature::verify_request(
        state.settings.signing_secret.expose_secret().as_bytes(),
        timestamp,
        body,
        sig,
    )
    .map_err(|e| AppError::Unauthorized(e.to_string()))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, AppError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized(format!("missing {name} header")))
}
