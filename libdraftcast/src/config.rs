//! Configuration management for Draftcast

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub rewrite: RewriteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Owner identity used by the CLI tools
///
/// Stands in for the authentication layer: every library operation is scoped
/// to the owner name resolved here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub owner: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            owner: "local".to_string(),
        }
    }
}

/// Settings for the external rewrite provider.
///
/// The API key lives here explicitly; the provider never reads ambient
/// process state. An empty key is valid configuration and fails at call
/// time, where `generate` masks it with the deterministic fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            database: DatabaseConfig {
                path: "~/.local/share/draftcast/posts.db".to_string(),
            },
            identity: IdentityConfig::default(),
            rewrite: RewriteConfig::default(),
        }
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("DRAFTCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("draftcast").join("config.toml"))
}

/// Resolve the data directory path following XDG Base Directory spec
pub fn resolve_data_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ConfigError::MissingField("data directory".to_string()))?;

    Ok(data_dir.join("draftcast"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [database]
            path = "/tmp/draftcast/posts.db"

            [identity]
            owner = "alice"

            [rewrite]
            api_key = "gsk_test"
            model = "llama-3.1-8b-instant"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database.path, "/tmp/draftcast/posts.db");
        assert_eq!(config.identity.owner, "alice");
        assert_eq!(config.rewrite.api_key, "gsk_test");
        assert_eq!(config.rewrite.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.rewrite.timeout_secs, 30);
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml_str = r#"
            [database]
            path = "/tmp/posts.db"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.identity.owner, "local");
        assert_eq!(config.rewrite.api_key, "");
        assert_eq!(config.rewrite.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_config();
        assert_eq!(config.database.path, "~/.local/share/draftcast/posts.db");
        assert_eq!(config.identity.owner, "local");
        assert_eq!(config.rewrite.base_url, "https://api.groq.com/openai/v1");
    }

    #[test]
    #[serial]
    fn test_resolve_config_path_env_override() {
        std::env::set_var("DRAFTCAST_CONFIG", "/tmp/custom/config.toml");
        let path = resolve_config_path().unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom/config.toml"));
        std::env::remove_var("DRAFTCAST_CONFIG");
    }

    #[test]
    #[serial]
    fn test_resolve_config_path_default() {
        std::env::remove_var("DRAFTCAST_CONFIG");
        let path = resolve_config_path().unwrap();
        assert!(path.ends_with("draftcast/config.toml"));
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = Config::load_from_path(&PathBuf::from("/nonexistent/config.toml"));
        assert!(result.is_err());
    }
}
