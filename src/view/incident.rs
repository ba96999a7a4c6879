//! Incident-status selection.

use super::panels::format_timestamp;
use crate::api::TelemetryRecord;
use serde::Serialize;

/// Resolution status that forces escalation regardless of alert status
pub const MANUAL_INTERVENTION_REQUIRED: &str = "MANUAL_INTERVENTION_REQUIRED";
/// Resolution status assumed when the backend omits one
pub const DEFAULT_RESOLUTION_STATUS: &str = "MONITORING";

/// The three mutually exclusive states of the incident panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentState {
    Escalation,
    Alert,
    Stable,
}

impl IncidentState {
    /// Escalation outranks an alert; anything else is stable.
    pub fn select(resolution_status: &str, alert_status: &str) -> Self {
        if resolution_status == MANUAL_INTERVENTION_REQUIRED {
            IncidentState::Escalation
        } else if alert_status == "ALERT" {
            IncidentState::Alert
        } else {
            IncidentState::Stable
        }
    }

    pub fn for_record(record: &TelemetryRecord) -> Self {
        Self::select(resolution_status(record), &record.alert_status)
    }

    pub fn headline(&self) -> &'static str {
        match self {
            IncidentState::Escalation => "ESCALATION REQUIRED",
            IncidentState::Alert => "ALERT: High Incident Risk",
            IncidentState::Stable => "System Stable",
        }
    }
}

pub(crate) fn resolution_status(record: &TelemetryRecord) -> &str {
    record
        .resolution_status
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_RESOLUTION_STATUS)
}

/// Incident card contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentPanel {
    pub state: IncidentState,
    pub headline: &'static str,
    pub lines: Vec<(String, String)>,
}

impl IncidentPanel {
    pub fn from_record(record: &TelemetryRecord) -> Self {
        let state = IncidentState::for_record(record);
        let root_cause = record
            .predicted_root_cause
            .clone()
            .unwrap_or_else(|| "N/A".to_string());
        let timestamp = format_timestamp(&record.timestamp);

        let mut lines = Vec::new();
        match state {
            IncidentState::Escalation => {
                let alert = record
                    .resolution_alert
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .unwrap_or("Auto-remediation unavailable");
                lines.push(("Root Cause".to_string(), root_cause));
                lines.push(("Resolution Alert".to_string(), alert.to_string()));
            }
            IncidentState::Alert => {
                let resolution = record
                    .auto_resolution
                    .clone()
                    .filter(|r| !r.is_empty())
                    .or_else(|| record.recommended_action.clone())
                    .unwrap_or_else(|| "N/A".to_string());
                lines.push(("Root Cause".to_string(), root_cause));
                lines.push(("Auto Resolution".to_string(), resolution));
                lines.push((
                    "Status".to_string(),
                    resolution_status(record).to_string(),
                ));
            }
            IncidentState::Stable => {
                lines.push((
                    "Prediction".to_string(),
                    "No critical incident predicted".to_string(),
                ));
            }
        }
        lines.push(("Timestamp".to_string(), timestamp));

        Self {
            state,
            headline: state.headline(),
            lines,
        }
    }
}
