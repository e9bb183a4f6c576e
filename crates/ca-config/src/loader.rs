//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "casino-admin.toml",
    "config.toml",
    "./config/casino-admin.toml",
    "/etc/casino-admin/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Load configuration resolving overrides through `lookup` instead of the process environment
    pub fn load_with<F>(&self, lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file(&lookup) {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        apply_overrides(&mut config, &lookup);
        config.validate()?;

        Ok(config)
    }

    fn find_config_file<F>(&self, lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An explicit path that does not exist is ignored like the search paths
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
        }

        if let Some(path) = lookup("CASINO_ADMIN_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

fn apply_overrides<F>(config: &mut AppConfig, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    // API
    if let Some(val) = lookup("CASINO_ADMIN_API_HOST") {
        config.api.host = val;
    }
    if let Some(port) = lookup("CASINO_ADMIN_API_PORT").and_then(|v| v.parse().ok()) {
        config.api.port = port;
    }
    if let Some(secs) = lookup("CASINO_ADMIN_API_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        config.api.timeout_secs = secs;
    }

    // Session
    if let Some(val) = lookup("CASINO_ADMIN_SESSION_STORE") {
        config.session.store_path = val;
    }

    // Table
    if let Some(rows) = lookup("CASINO_ADMIN_ROWS_PER_PAGE").and_then(|v| v.parse().ok()) {
        config.table.rows_per_page = rows;
    }
    if let Some(val) = lookup("CASINO_ADMIN_DENSE") {
        config.table.dense = val.parse().unwrap_or(false);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nhost = \"https://backend.test\"\nport = 8443\n").unwrap();

        let config = ConfigLoader::with_path(file.path())
            .load_with(env_of(&[]))
            .unwrap();

        assert_eq!(config.api.base_url(), "https://backend.test:8443");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[table]\nrows_per_page = 25\n").unwrap();

        let config = ConfigLoader::with_path(file.path())
            .load_with(env_of(&[
                ("CASINO_ADMIN_API_PORT", "9000"),
                ("CASINO_ADMIN_ROWS_PER_PAGE", "10"),
                ("CASINO_ADMIN_DENSE", "true"),
            ]))
            .unwrap();

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.table.rows_per_page, 10);
        assert!(config.table.dense);
    }

    #[test]
    fn test_unparseable_override_is_ignored() {
        let config = ConfigLoader::with_path("/nonexistent/casino-admin.toml")
            .load_with(env_of(&[("CASINO_ADMIN_API_PORT", "not-a-port")]))
            .unwrap();

        assert_eq!(config.api.port, 5000);
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let result = ConfigLoader::with_path("/nonexistent/casino-admin.toml")
            .load_with(env_of(&[("CASINO_ADMIN_ROWS_PER_PAGE", "0")]));

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nport = ").unwrap();

        let result = ConfigLoader::with_path(file.path()).load_with(env_of(&[]));

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
