//! Slash command handler: opens the declare/find modals.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Deserialize;

use skilldex_core::repository::skill::SkillRepository;
use skilldex_types::member::UserId;

use super::verify_slack_signature;
use crate::http::error::AppError;
use crate::http::views;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SlashCommand {
    command: String,
    trigger_id: String,
    user_id: String,
}

/// POST /slack/commands - Dispatch a slash command to its modal.
///
/// The known-skill options and the member's current selection are read
/// first, then the modal is opened on a background task so the command
/// acks within the platform's deadline.
pub async fn slash_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(), AppError> {
    verify_slack_signature(&state, &headers, &body)?;

    let form: SlashCommand = serde_urlencoded::from_bytes(&body)
        .map_err(|e| AppError::Validation(format!("malformed slash command: {e}")))?;

    let all_skills = state
        .skill_repo
        .list()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let view = if form.command == state.config.add_command {
        let held = state
            .relations
            .member_skills(&UserId::new(form.user_id.clone()))
            .await?;
        views::declare_modal(&all_skills, &held)
    } else if form.command == state.config.find_command {
        views::find_modal(&all_skills)
    } else {
        tracing::warn!(command = %form.command, "unknown slash command");
        return Ok(());
    };

    let slack = state.slack.clone();
    let trigger_id = form.trigger_id;
    tokio::spawn(async move {
        if let Err(e) = slack.open_view(&trigger_id, view).await {
            tracing::error!(error = %e, "failed to open modal");
        }
    });

    Ok(())
}
