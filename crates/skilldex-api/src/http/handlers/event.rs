//! Event subscription handler: URL verification and the app home tab.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use skilldex_types::member::UserId;

use super::verify_slack_signature;
use crate::http::error::AppError;
use crate::http::views;
use crate::state::AppState;

/// POST /slack/events - Receive an event callback.
pub async fn event_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    verify_slack_signature(&state, &headers, &body)?;

    let event: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("malformed event body: {e}")))?;

    match event.get("type").and_then(Value::as_str) {
        // Endpoint ownership handshake: echo the challenge back.
        Some("url_verification") => {
            let challenge = event.get("challenge").cloned().unwrap_or(Value::Null);
            Ok(Json(json!({ "challenge": challenge })).into_response())
        }

        Some("event_callback") => {
            if event.pointer("/event/type").and_then(Value::as_str) == Some("app_home_opened") {
                if let Some(user) = event.pointer("/event/user").and_then(Value::as_str) {
                    let slack = state.slack.clone();
                    let user = UserId::new(user);
                    tokio::spawn(async move {
                        if let Err(e) = slack.publish_home(&user, views::home_view()).await {
                            tracing::error!(user_id = %user, error = %e, "failed to publish home view");
                        }
                    });
                }
            }
            Ok(().into_response())
        }

        _ => Ok(().into_response()),
    }
}
