//! Filter state for telemetry queries.
//!
//! Holds the criteria the user has selected (alert status, root cause,
//! record window, date range) and turns a snapshot of them into query
//! parameters for the `/data` endpoint.

use crate::config::FilterDefaults;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root-cause value meaning "no root-cause filter"
pub const ALL_ROOT_CAUSES: &str = "ALL";

/// Alert-status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertFilter {
    #[default]
    All,
    Alert,
    Ok,
}

impl AlertFilter {
    /// Wire value sent as `alert_status`
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertFilter::All => "ALL",
            AlertFilter::Alert => "ALERT",
            AlertFilter::Ok => "OK",
        }
    }
}

impl fmt::Display for AlertFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ALL" => Ok(AlertFilter::All),
            "ALERT" => Ok(AlertFilter::Alert),
            "OK" => Ok(AlertFilter::Ok),
            _ => Err(format!("Invalid alert filter: {} (expected ALL, ALERT or OK)", s)),
        }
    }
}

/// Query criteria for the primary telemetry fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub alert_status: AlertFilter,
    pub root_cause: String,
    /// Number of most recent records to include
    pub window: u32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::from(&FilterDefaults::default())
    }
}

impl From<&FilterDefaults> for FilterCriteria {
    fn from(defaults: &FilterDefaults) -> Self {
        Self {
            alert_status: defaults.alert_status,
            root_cause: defaults.root_cause.clone(),
            window: defaults.window,
            start_date: defaults.start_date.clone(),
            end_date: defaults.end_date.clone(),
        }
    }
}

impl FilterCriteria {
    /// Query parameters for `/data`.
    ///
    /// All five parameters are always present; an unset date goes out as an
    /// empty string, which the backend treats as "no date range".
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("alert_status", self.alert_status.as_str().to_string()),
            ("root_cause", self.root_cause.clone()),
            ("window", self.window.to_string()),
            ("start_date", self.start_date.clone().unwrap_or_default()),
            ("end_date", self.end_date.clone().unwrap_or_default()),
        ]
    }

    /// True when the root cause filter selects everything
    pub fn all_root_causes(&self) -> bool {
        self.root_cause == ALL_ROOT_CAUSES
    }
}

/// Partial update to [`FilterCriteria`]; `None` fields are left untouched.
///
/// Dates use a nested option so a date can be cleared: `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub alert_status: Option<AlertFilter>,
    pub root_cause: Option<String>,
    pub window: Option<u32>,
    pub start_date: Option<Option<String>>,
    pub end_date: Option<Option<String>>,
}

impl FilterUpdate {
    pub fn alert_status(alert_status: AlertFilter) -> Self {
        Self {
            alert_status: Some(alert_status),
            ..Default::default()
        }
    }

    pub fn root_cause(root_cause: impl Into<String>) -> Self {
        Self {
            root_cause: Some(root_cause.into()),
            ..Default::default()
        }
    }

    pub fn window(window: u32) -> Self {
        Self {
            window: Some(window),
            ..Default::default()
        }
    }

    pub fn date_range(start: Option<String>, end: Option<String>) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Current filter criteria, mutated by user input.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    criteria: FilterCriteria,
}

impl FilterState {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self { criteria }
    }

    /// Snapshot of the current criteria
    pub fn current(&self) -> FilterCriteria {
        self.criteria.clone()
    }

    /// Apply a partial update and return the resulting criteria.
    pub fn update(&mut self, update: FilterUpdate) -> FilterCriteria {
        if let Some(alert_status) = update.alert_status {
            self.criteria.alert_status = alert_status;
        }
        if let Some(root_cause) = update.root_cause {
            self.criteria.root_cause = root_cause;
        }
        if let Some(window) = update.window {
            self.criteria.window = window;
        }
        if let Some(start_date) = update.start_date {
            self.criteria.start_date = start_date.filter(|d| !d.is_empty());
        }
        if let Some(end_date) = update.end_date {
            self.criteria.end_date = end_date.filter(|d| !d.is_empty());
        }
        self.criteria.clone()
    }

    /// Seed an unset date range from the bounds reported by `/options`.
    ///
    /// Returns true when anything changed. Dates the user already chose are kept.
    pub fn seed_date_range(&mut self, min: &str, max: &str) -> bool {
        let mut changed = false;
        if self.criteria.start_date.is_none() && !min.is_empty() {
            self.criteria.start_date = Some(min.to_string());
            changed = true;
        }
        if self.criteria.end_date.is_none() && !max.is_empty() {
            self.criteria.end_date = Some(max.to_string());
            changed = true;
        }
        changed
    }
}
