//! SlackClient -- Slack Web API client implementing the core
//! collaborator ports.
//!
//! The bot token is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output. All Web API calls go through
//! one envelope check: Slack replies `{"ok": false, "error": "..."}` on
//! failure with HTTP 200, so the `ok` field, not the status code, is
//! what decides success.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use skilldex_core::notify::{FormDismisser, Notifier, ProfileLookup};
use skilldex_types::error::DeliveryError;
use skilldex_types::member::UserId;

/// Slack Web API client.
#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    bot_token: SecretString,
    base_url: String,
}

impl SlackClient {
    /// Create a new client for the given bot token.
    pub fn new(bot_token: SecretString) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");

        Self {
            http,
            bot_token,
            base_url: "https://slack.com".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// POST a Web API method and unwrap the `ok`/`error` envelope.
    async fn call_api(&self, method: &str, payload: &Value) -> Result<Value, DeliveryError> {
        let url = format!("{}/api/{method}", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.bot_token.expose_secret())
            .json(payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        check_envelope(method, body)
    }

    /// Open a modal view in response to a slash command trigger.
    pub async fn open_view(&self, trigger_id: &str, view: Value) -> Result<(), DeliveryError> {
        self.call_api(
            "views.open",
            &json!({ "trigger_id": trigger_id, "view": view }),
        )
        .await?;
        Ok(())
    }

    /// Publish a member's home tab view.
    pub async fn publish_home(&self, user_id: &UserId, view: Value) -> Result<(), DeliveryError> {
        self.call_api(
            "views.publish",
            &json!({ "user_id": user_id.as_str(), "view": view }),
        )
        .await?;
        Ok(())
    }

    /// Exchange an OAuth code for an installation; returns the team id
    /// for the post-install redirect.
    pub async fn exchange_oauth_code(
        &self,
        client_id: &str,
        client_secret: &SecretString,
        redirect_uri: &str,
        code: &str,
    ) -> Result<String, DeliveryError> {
        let url = format!("{}/api/oauth.v2.access", self.base_url);
        let response = self
            .http
            .post(&url)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret.expose_secret()),
                ("redirect_uri", redirect_uri),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        let body = check_envelope("oauth.v2.access", body)?;

        body.pointer("/team/id")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| DeliveryError::Api("oauth response missing team id".to_string()))
    }
}

impl Notifier for SlackClient {
    async fn post_text(&self, recipient: &UserId, text: &str) -> Result<(), DeliveryError> {
        self.call_api(
            "chat.postMessage",
            &json!({ "channel": recipient.as_str(), "text": text }),
        )
        .await?;
        Ok(())
    }
}

impl ProfileLookup for SlackClient {
    async fn display_name(&self, user_id: &UserId) -> Result<String, DeliveryError> {
        let url = format!("{}/api/users.info", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.bot_token.expose_secret())
            .query(&[("user", user_id.as_str())])
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        let body = check_envelope("users.info", body)?;

        Ok(extract_display_name(&body, user_id.as_str()))
    }
}

impl FormDismisser for SlackClient {
    async fn dismiss(&self, response_url: &str) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(response_url)
            .json(&json!({ "response_action": "clear" }))
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeliveryError::Api(format!(
                "response endpoint returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Unwrap the Web API `ok`/`error` envelope.
fn check_envelope(method: &str, body: Value) -> Result<Value, DeliveryError> {
    if body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        Ok(body)
    } else {
        let code = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown_error");
        Err(DeliveryError::Api(format!("{method} failed: {code}")))
    }
}

/// Pull the best available display name out of a `users.info` response.
fn extract_display_name(body: &Value, fallback: &str) -> String {
    ["/user/real_name", "/user/name"]
        .iter()
        .filter_map(|pointer| body.pointer(pointer).and_then(Value::as_str))
        .find(|name| !name.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
