//! Session persistence and login-history settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the authenticated session is persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".sentinel/session.json"),
        }
    }
}

/// Login-history query settings (admin tab)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub limit: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { limit: 20 }
    }
}
