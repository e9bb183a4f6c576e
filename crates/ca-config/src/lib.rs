//! Casino Admin Configuration System
//!
//! This crate provides TOML-based configuration with environment variable override support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub table: TableConfig,
}

/// Backend REST API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme and host, e.g. `http://localhost`
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".to_string(),
            port: 5000,
            timeout_secs: 30,
            user_agent: format!("casino-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Base URL assembled as `host:port`
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.host.trim_end_matches('/'), self.port)
    }
}

/// Client-side session persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// JSON file holding the admin and affiliate bearer tokens
    pub store_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: "./.casino-admin/session.json".to_string(),
        }
    }
}

/// Listing screen defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub rows_per_page: usize,
    pub dense: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rows_per_page: 5,
            dense: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Reject settings the console cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("api.host must not be empty".into()));
        }
        if self.api.port == 0 {
            return Err(ConfigError::ValidationError("api.port must not be 0".into()));
        }
        if self.table.rows_per_page == 0 {
            return Err(ConfigError::ValidationError(
                "table.rows_per_page must be at least 1".into(),
            ));
        }
        if self.session.store_path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "session.store_path must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# Casino Admin Configuration
# Environment variables (CASINO_ADMIN_*) override these settings

[api]
host = "http://localhost"
port = 5000
timeout_secs = 30

[session]
store_path = "./.casino-admin/session.json"

[table]
rows_per_page = 5
dense = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_example_toml_parses() {
        let config: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        assert_eq!(config.api.port, 5000);
        assert_eq!(config.table.rows_per_page, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str("[api]\nport = 8443\n").unwrap();
        assert_eq!(config.api.port, 8443);
        assert_eq!(config.api.host, "http://localhost");
        assert_eq!(config.table.rows_per_page, 5);
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let api = ApiConfig {
            host: "https://api.example.com/".to_string(),
            port: 443,
            ..ApiConfig::default()
        };
        assert_eq!(api.base_url(), "https://api.example.com:443");
    }

    #[test]
    fn test_validation_rejects_zero_rows() {
        let mut config = AppConfig::default();
        config.table.rows_per_page = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_rejects_empty_host() {
        let mut config = AppConfig::default();
        config.api.host = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
