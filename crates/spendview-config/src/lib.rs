//! Configuration management for spendview
//!
//! This module handles loading, validation, and management of
//! spendview configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

/// Largest accepted feed page size
pub const MAX_PAGE_SIZE: usize = 500;

/// Largest accepted simulated latency, in milliseconds
pub const MAX_LATENCY_MS: u64 = 60_000;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

/// Data provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Path to the JSON fixture served by the in-memory provider
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Transactions per feed page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Simulated latency applied to every provider call
    #[serde(default)]
    pub latency_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            page_size: default_page_size(),
            latency_ms: 0,
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./data/fixtures.json")
}

fn default_page_size() -> usize {
    5
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    /// Wrap the provider in a response cache
    #[serde(default)]
    pub enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::IoError)?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.provider.page_size == 0 || self.provider.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "provider.page_size".to_string(),
                reason: format!("Page size must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }

        if self.provider.latency_ms > MAX_LATENCY_MS {
            return Err(ConfigError::InvalidValue {
                field: "provider.latency_ms".to_string(),
                reason: format!("Latency must not exceed {} ms", MAX_LATENCY_MS),
            });
        }

        if !matches!(self.logging.level.to_lowercase().as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: "Level must be one of trace, debug, info, warn, error".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Listen address ("host:port")
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.provider.page_size, 5);
        assert_eq!(config.provider.latency_ms, 0);
        assert!(!config.cache.enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_template_is_valid() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8082");
        assert_eq!(config.provider.data_file, PathBuf::from("./data/fixtures.json"));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = Config::from_yaml("provider:\n  page_size: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "provider.page_size"));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let err = Config::from_yaml("logging:\n  level: loud\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "logging.level"));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(Config::from_yaml("server: [1, 2"), Err(ConfigError::InvalidYaml)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  port: 9000\ncache:\n  enabled: true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/nonexistent/spendview.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
