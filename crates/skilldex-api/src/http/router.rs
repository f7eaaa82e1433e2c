//! Axum router configuration with middleware.
//!
//! Middleware: CORS and per-request tracing. Every Slack-facing route
//! verifies the request signature inside its handler (the raw body is
//! needed for that, so it cannot live in an extractor layer).

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/slack/commands", post(handlers::command::slash_command))
        .route(
            "/slack/submissions",
            post(handlers::submission::view_submission),
        )
        .route("/slack/events", post(handlers::event::event_callback))
        .route("/oauth/callback", get(handlers::oauth::oauth_callback))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
