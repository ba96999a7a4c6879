//! Configuration module for Sentinel
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SENTINEL_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use sentinel::config::SentinelConfig;
//!
//! let config = SentinelConfig::default();
//! assert_eq!(config.api.base_url, "http://localhost:5000/api");
//!
//! let toml = r#"
//! [refresh]
//! enabled = true
//! interval_seconds = 5
//! "#;
//! let config: SentinelConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.refresh.interval_seconds, 5);
//! ```

pub mod api;
pub mod error;
pub mod filters;
pub mod logging;
pub mod refresh;
pub mod session;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use filters::{FilterDefaults, MAX_WINDOW, MIN_WINDOW};
pub use logging::{LogFormat, LoggingConfig};
pub use refresh::RefreshConfig;
pub use session::{HistoryConfig, SessionConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the Sentinel console.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SentinelConfig {
    /// Backend API connection
    pub api: ApiConfig,
    /// Auto-refresh policy at startup
    pub refresh: RefreshConfig,
    /// Initial filter criteria
    pub filters: FilterDefaults,
    /// Durable session storage
    pub session: SessionConfig,
    /// Login-history query settings
    pub history: HistoryConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl SentinelConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Load from `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(Some(path))
        } else {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports SENTINEL_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("SENTINEL_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("SENTINEL_API_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.api.timeout_seconds = t;
            }
        }
        if let Ok(interval) = std::env::var("SENTINEL_REFRESH_INTERVAL") {
            if let Ok(i) = interval.parse() {
                self.refresh.interval_seconds = i;
            }
        }
        if let Ok(path) = std::env::var("SENTINEL_SESSION_FILE") {
            self.session.path = path.into();
        }

        if let Ok(level) = std::env::var("SENTINEL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SENTINEL_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "api.base_url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "api.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.refresh.interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "refresh.interval_seconds".to_string(),
                message: "interval must be at least 1 second".to_string(),
            });
        }
        if self.history.limit == 0 {
            return Err(ConfigError::Validation {
                field: "history.limit".to_string(),
                message: "limit must be non-zero".to_string(),
            });
        }
        if !(MIN_WINDOW..=MAX_WINDOW).contains(&self.filters.window) {
            return Err(ConfigError::Validation {
                field: "filters.window".to_string(),
                message: format!("window must be between {} and {}", MIN_WINDOW, MAX_WINDOW),
            });
        }

        Ok(())
    }
}
