// src/config.rs

//! Application configuration.
//!
//! Loaded from a TOML file; every field has a default so a partial (or
//! missing) file still yields a usable configuration. A few settings can be
//! overridden from the environment.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::is_http_uri;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings for endpoint fetches
    #[serde(default)]
    pub client: ClientConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Endpoint URIs to aggregate datasets from
    #[serde(default)]
    pub endpoints: Vec<String>,

    /// Index endpoint URIs whose linked endpoints are also aggregated
    #[serde(default)]
    pub indexes: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply `FDP_TIMEOUT`, `FDP_VERIFY_SSL` and `LOG_LEVEL` overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("FDP_TIMEOUT") {
            match value.trim().parse() {
                Ok(secs) => self.client.timeout_secs = secs,
                Err(_) => log::warn!("Ignoring FDP_TIMEOUT={value:?}: not a number of seconds"),
            }
        }
        if let Some(value) = lookup("FDP_VERIFY_SSL") {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.client.verify_tls = true,
                "0" | "false" | "no" => self.client.verify_tls = false,
                _ => log::warn!("Ignoring FDP_VERIFY_SSL={value:?}: expected true/false"),
            }
        }
        if let Some(value) = lookup("LOG_LEVEL") {
            self.logging.level = value.trim().to_ascii_lowercase();
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.client.user_agent.trim().is_empty() {
            return Err(AppError::validation("client.user_agent is empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(AppError::validation("client.timeout_secs must be > 0"));
        }
        if self.client.max_concurrent == 0 {
            return Err(AppError::validation("client.max_concurrent must be > 0"));
        }
        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(AppError::validation(format!(
                "logging.level '{}' is not a log level",
                self.logging.level
            )));
        }
        for uri in self.endpoints.iter().chain(&self.indexes) {
            if !is_http_uri(uri) {
                return Err(AppError::validation(format!(
                    "'{uri}' must start with http:// or https://"
                )));
            }
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent fetches per batch level
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Verify TLS certificates of endpoints
    #[serde(default = "defaults::verify_tls")]
    pub verify_tls: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            verify_tls: defaults::verify_tls(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of error, warn, info, debug, trace
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn user_agent() -> String {
        concat!("datavisit/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        5
    }
    pub fn verify_tls() -> bool {
        true
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
