use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the fund-platform REST backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Directory holding the session file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Page size used when a list command gives no --limit
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            page_limit: default_page_limit(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_page_limit() -> u32 {
    crate::store::DEFAULT_LIMIT
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    /// Path of the persisted session file.
    pub fn session_path(&self) -> PathBuf {
        self.console.data_dir.join("session.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            console: ConsoleConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:4000");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.console.page_limit, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_override() {
        let config: Config = toml::from_str(
            r#"
            [backend]
            base_url = "https://api.fundesk.example"

            [console]
            page_limit = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "https://api.fundesk.example");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.console.page_limit, 25);
    }
}
