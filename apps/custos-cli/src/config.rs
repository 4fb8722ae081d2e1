//! Configuration management for the custos CLI

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CliError, CliResult};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration paths for the custos CLI
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Base configuration directory
    pub config_dir: PathBuf,
    /// Path to config.json
    pub config_file: PathBuf,
}

impl ConfigPaths {
    /// Get configuration paths for the current platform
    ///
    /// Paths:
    /// - Linux: ~/.config/custos/
    /// - macOS: ~/Library/Application Support/custos/
    /// - Windows: %APPDATA%\custos\
    pub fn new() -> CliResult<Self> {
        Ok(Self::in_dir(Self::get_config_dir()?))
    }

    /// Paths rooted at an explicit directory.
    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            config_file: config_dir.join("config.json"),
            config_dir,
        }
    }

    /// Get the configuration directory, respecting CUSTOS_CONFIG_DIR env var
    fn get_config_dir() -> CliResult<PathBuf> {
        if let Ok(dir) = std::env::var("CUSTOS_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let base_dir = dirs::config_dir().ok_or_else(|| {
            CliError::Config("Could not determine configuration directory".to_string())
        })?;

        Ok(base_dir.join("custos"))
    }
}

/// Connection settings for the hosted admin API
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the admin API
    pub endpoint: String,
    /// Bearer key authenticating every request
    pub api_key: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// Load configuration from config.json, with environment overrides
    /// (CUSTOS_ENDPOINT, CUSTOS_API_KEY, CUSTOS_TIMEOUT_SECS).
    pub fn load(paths: &ConfigPaths) -> CliResult<Self> {
        let mut config = if paths.config_file.exists() {
            let raw = std::fs::read_to_string(&paths.config_file)?;
            serde_json::from_str(&raw).map_err(|e| {
                CliError::Config(format!(
                    "Malformed {}: {e}",
                    paths.config_file.display()
                ))
            })?
        } else {
            Self {
                endpoint: String::new(),
                api_key: String::new(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            }
        };

        if let Ok(endpoint) = std::env::var("CUSTOS_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(api_key) = std::env::var("CUSTOS_API_KEY") {
            config.api_key = api_key;
        }
        if let Ok(timeout) = std::env::var("CUSTOS_TIMEOUT_SECS") {
            config.timeout_secs = timeout
                .parse()
                .map_err(|_| CliError::Config(format!("Invalid CUSTOS_TIMEOUT_SECS: {timeout}")))?;
        }

        if config.endpoint.is_empty() {
            return Err(CliError::Config("No API endpoint configured".into()));
        }
        if config.api_key.is_empty() {
            return Err(CliError::Config("No API key configured".into()));
        }

        Ok(config)
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
