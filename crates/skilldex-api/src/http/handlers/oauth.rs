//! OAuth install handshake callback.

use axum::extract::{Query, State};
use axum::response::Redirect;
use serde::Deserialize;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    code: String,
}

/// GET /oauth/callback - Exchange the install code, then bounce the
/// browser back into the app.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Redirect, AppError> {
    let oauth = state
        .settings
        .oauth
        .clone()
        .ok_or_else(|| AppError::Internal("OAuth credentials are not configured".to_string()))?;

    let team_id = state
        .slack
        .exchange_oauth_code(
            &oauth.client_id,
            &oauth.client_secret,
            &oauth.redirect_url,
            &query.code,
        )
        .await?;

    Ok(Redirect::temporary(&format!("slack://app?team={team_id}")))
}
