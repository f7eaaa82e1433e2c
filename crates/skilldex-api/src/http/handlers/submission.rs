//! View submission handler.
//!
//! Validates the interaction payload into a typed event, then runs the
//! declare/find flow on a background task. The empty 200 ack returned
//! here is what closes the modal; the member-facing notification is
//! fire-and-forget relative to that handshake.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Deserialize;

use super::verify_slack_signature;
use crate::http::error::AppError;
use crate::http::payload;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SubmissionForm {
    payload: String,
}

/// POST /slack/submissions - Receive a modal submission.
pub async fn view_submission(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(), AppError> {
    verify_slack_signature(&state, &headers, &body)?;

    let form: SubmissionForm = serde_urlencoded::from_bytes(&body)
        .map_err(|e| AppError::Validation(format!("malformed submission body: {e}")))?;

    let event = payload::parse_submission(&form.payload)?;

    let router = Arc::clone(&state.router);
    tokio::spawn(async move {
        if let Err(e) = router.handle(event).await {
            tracing::error!(error = %e, "submission flow failed");
        }
    });

    Ok(())
}
