//! Auto-refresh configuration

use serde::{Deserialize, Serialize};

/// Initial auto-refresh policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: 10,
        }
    }
}
