//! Global configuration types for Skilldex.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls
//! the HTTP listener and workspace-facing defaults. Secrets (bot token,
//! signing secret, OAuth credentials) never live in the file; the infra
//! layer reads them from the environment.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Skilldex directory.
///
/// Loaded from `~/.skilldex/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Slash command that opens the declare-skills modal.
    #[serde(default = "default_add_command")]
    pub add_command: String,

    /// Slash command that opens the find-skills modal.
    #[serde(default = "default_find_command")]
    pub find_command: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_add_command() -> String {
    "/add-skills".to_string()
}

fn default_find_command() -> String {
    "/find-skills".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            add_command: default_add_command(),
            find_command: default_find_command(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.add_command, "/add-skills");
        assert_eq!(config.find_command, "/find-skills");
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
host = "0.0.0.0"
port = 8080
add_command = "/declare"
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.add_command, "/declare");
        assert_eq!(config.find_command, "/find-skills");
    }
}
