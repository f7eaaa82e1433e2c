//! Interaction payload parsing.
//!
//! Slack posts modal submissions as urlencoded bodies with a single
//! `payload` field of JSON. This module turns that loosely-typed JSON
//! into a validated [`SubmissionEvent`], rejecting malformed payloads
//! before anything reaches the resolver or the store.

use serde::Deserialize;
use serde_json::Value;

use skilldex_types::error::DirectoryError;
use skilldex_types::member::UserId;
use skilldex_types::submission::{DeclareSubmission, FindSubmission, SubmissionEvent};

/// Callback id of the declare-skills modal.
pub const DECLARE_CALLBACK_ID: &str = "add_skills_modal";
/// Callback id of the find-skills modal.
pub const FIND_CALLBACK_ID: &str = "find_skills_modal";

#[derive(Debug, Deserialize)]
struct InteractionPayload {
    #[serde(rename = "type")]
    kind: String,
    user: PayloadUser,
    team: Option<PayloadTeam>,
    view: PayloadView,
    #[serde(default)]
    response_urls: Vec<ResponseUrl>,
}

#[derive(Debug, Deserialize)]
struct PayloadUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PayloadTeam {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PayloadView {
    callback_id: String,
    state: ViewState,
}

#[derive(Debug, Deserialize)]
struct ViewState {
    values: Value,
}

#[derive(Debug, Deserialize)]
struct ResponseUrl {
    response_url: String,
}

/// Parse the `payload` JSON of a view submission into a validated event.
pub fn parse_submission(payload_json: &str) -> Result<SubmissionEvent, DirectoryError> {
    let payload: InteractionPayload = serde_json::from_str(payload_json)
        .map_err(|e| DirectoryError::InvalidSubmission(format!("malformed payload: {e}")))?;

    if payload.kind != "view_submission" {
        return Err(DirectoryError::InvalidSubmission(format!(
            "unexpected interaction type '{}'",
            payload.kind
        )));
    }

    let values = &payload.view.state.values;
    let user_id = UserId::new(payload.user.id);

    match payload.view.callback_id.as_str() {
        DECLARE_CALLBACK_ID => {
            let selected_skill_names = values
                .pointer("/skills_input/skills_select/selected_options")
                .and_then(Value::as_array)
                .map(|options| {
                    options
                        .iter()
                        .filter_map(|option| option.get("value"))
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();

            let new_skills_text = values
                .pointer("/new_skill_input/new_skill_input/value")
                .and_then(Value::as_str)
                .map(String::from);

            Ok(SubmissionEvent::Declare(DeclareSubmission {
                user_id,
                selected_skill_names,
                new_skills_text,
                response_urls: payload
                    .response_urls
                    .into_iter()
                    .map(|r| r.response_url)
                    .collect(),
            }))
        }

        FIND_CALLBACK_ID => {
            let selected_skill_name = values
                .pointer("/skills_input/skills_select/selected_option/value")
                .and_then(Value::as_str)
                .map(String::from)
                .ok_or_else(|| {
                    DirectoryError::InvalidSubmission("find submission without a selected skill".to_string())
                })?;

            let team_id = payload
                .team
                .map(|team| team.id)
                .ok_or_else(|| {
                    DirectoryError::InvalidSubmission("find submission without a team id".to_string())
                })?;

            Ok(SubmissionEvent::Find(FindSubmission {
                user_id,
                team_id,
                selected_skill_name,
            }))
        }

        other => Err(DirectoryError::InvalidSubmission(format!(
            "unknown callback id '{other}'"
        ))),
    }
}
