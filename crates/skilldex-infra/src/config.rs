//! Configuration loading for Skilldex.
//!
//! Reads `config.toml` from the data directory (`~/.skilldex/` in
//! production) into [`GlobalConfig`], falling back to defaults when the
//! file is missing or malformed. Secrets never live in the file: the bot
//! token, signing secret, and OAuth credentials come from the
//! environment.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use skilldex_types::config::GlobalConfig;

/// Resolve the data directory: `SKILLDEX_DATA_DIR`, then `~/.skilldex`,
/// then `./.skilldex` as a last resort.
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var("SKILLDEX_DATA_DIR").ok())
}

fn data_dir_from(env_override: Option<String>) -> PathBuf {
    if let Some(dir) = env_override {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".skilldex");
    }

    PathBuf::from(".skilldex")
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Slack credentials, read from the environment at startup.
#[derive(Clone, Debug)]
pub struct SlackSettings {
    /// Bot token (`SLACK_BOT_TOKEN`). Never logged.
    pub bot_token: SecretString,
    /// Request signing secret (`SLACK_SIGNING_SECRET`). Never logged.
    pub signing_secret: SecretString,
    /// OAuth install credentials; present only when the full trio of
    /// variables is set.
    pub oauth: Option<OAuthSettings>,
}

/// OAuth install handshake credentials.
#[derive(Clone, Debug)]
pub struct OAuthSettings {
    /// `SLACK_CLIENT_ID`.
    pub client_id: String,
    /// `SLACK_CLIENT_SECRET`. Never logged.
    pub client_secret: SecretString,
    /// `SLACK_REDIRECT_URL`.
    pub redirect_url: String,
}

/// Errors from reading required settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),
}

impl SlackSettings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup("SLACK_BOT_TOKEN")
            .ok_or(ConfigError::MissingEnv("SLACK_BOT_TOKEN"))?;
        let signing_secret = lookup("SLACK_SIGNING_SECRET")
            .ok_or(ConfigError::MissingEnv("SLACK_SIGNING_SECRET"))?;

        let oauth = match (
            lookup("SLACK_CLIENT_ID"),
            lookup("SLACK_CLIENT_SECRET"),
            lookup("SLACK_REDIRECT_URL"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_url)) => Some(OAuthSettings {
                client_id,
                client_secret: client_secret.into(),
                redirect_url,
            }),
            _ => None,
        };

        Ok(Self {
            bot_token: bot_token.into(),
            signing_secret: signing_secret.into(),
            oauth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_data_dir_env_override_wins() {
        let dir = data_dir_from(Some("/srv/skilldex".to_string()));
        assert_eq!(dir, PathBuf::from("/srv/skilldex"));
    }

    #[test]
    fn test_data_dir_defaults_under_home() {
        let dir = data_dir_from(None);
        assert!(dir.ends_with(".skilldex"));
    }

    #[tokio::test]
    async fn test_load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.port, 3000);
    }

    #[tokio::test]
    async fn test_load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "port = 8080\n")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[tokio::test]
    async fn test_load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.port, 3000);
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_slack_settings_requires_bot_token() {
        let vars = env(&[("SLACK_SIGNING_SECRET", "sss")]);
        let err = SlackSettings::from_lookup(|name| vars.get(name).cloned()).unwrap_err();
        assert!(err.to_string().contains("SLACK_BOT_TOKEN"));
    }

    #[test]
    fn test_slack_settings_oauth_optional() {
        let vars = env(&[("SLACK_BOT_TOKEN", "xoxb-1"), ("SLACK_SIGNING_SECRET", "sss")]);
        let settings = SlackSettings::from_lookup(|name| vars.get(name).cloned()).unwrap();
        assert!(settings.oauth.is_none());
    }

    #[test]
    fn test_slack_settings_oauth_present_when_complete() {
        let vars = env(&[
            ("SLACK_BOT_TOKEN", "xoxb-1"),
            ("SLACK_SIGNING_SECRET", "sss"),
            ("SLACK_CLIENT_ID", "123.456"),
            ("SLACK_CLIENT_SECRET", "shh"),
            ("SLACK_REDIRECT_URL", "https://example.com/oauth/callback"),
        ]);
        let settings = SlackSettings::from_lookup(|name| vars.get(name).cloned()).unwrap();
        let oauth = settings.oauth.unwrap();
        assert_eq!(oauth.client_id, "123.456");
        assert_eq!(oauth.redirect_url, "https://example.com/oauth/callback");
    }
}
