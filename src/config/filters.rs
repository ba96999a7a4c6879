//! Initial filter criteria

use crate::filter::AlertFilter;
use serde::{Deserialize, Serialize};

/// Smallest window the window control accepts
pub const MIN_WINDOW: u32 = 50;
/// Largest window the window control accepts
pub const MAX_WINDOW: u32 = 1500;

/// Filters applied before the user touches anything
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    pub alert_status: AlertFilter,
    pub root_cause: String,
    pub window: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            alert_status: AlertFilter::All,
            root_cause: "ALL".to_string(),
            window: 250,
            start_date: None,
            end_date: None,
        }
    }
}
