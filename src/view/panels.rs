//! View models for the dashboard surfaces.
//!
//! These only format what the backend already computed.

use super::incident::{resolution_status, IncidentPanel};
use crate::api::{Insights, LoginRecord, Statistics, TelemetryRecord, TelemetryResponse};
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

/// Longest root-cause label shown in the summary tile
const ROOT_CAUSE_LABEL_MAX: usize = 20;

/// Color bucket for a displayed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Good,
    Warning,
    Critical,
}

impl Severity {
    /// Failure-probability thresholds: above 0.5 critical, above 0.2 warning.
    pub fn for_probability(probability: f64) -> Self {
        if probability > 0.5 {
            Severity::Critical
        } else if probability > 0.2 {
            Severity::Warning
        } else {
            Severity::Good
        }
    }
}

/// Risk level derived from average failure probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn for_probability(probability: f64) -> Self {
        match Severity::for_probability(probability) {
            Severity::Critical => RiskLevel::High,
            Severity::Warning => RiskLevel::Medium,
            Severity::Good => RiskLevel::Low,
        }
    }
}

/// A single KPI tile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl Kpi {
    fn plain(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            severity: None,
        }
    }

    fn rated(label: &'static str, value: String, severity: Severity) -> Self {
        Self {
            label,
            value,
            severity: Some(severity),
        }
    }
}

/// KPI tiles for the latest record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiPanel {
    pub tiles: Vec<Kpi>,
}

impl KpiPanel {
    pub fn from_record(latest: &TelemetryRecord) -> Self {
        let anomaly = latest.is_anomaly();
        let alert = latest.alert_status == "ALERT";

        Self {
            tiles: vec![
                Kpi::plain("CPU Usage", format!("{:.1}%", latest.cpu_usage)),
                Kpi::plain("Memory", format!("{:.2} GB", latest.memory_usage)),
                Kpi::plain("Response Time", format!("{:.0} ms", latest.response_time)),
                Kpi::rated(
                    "Failure Probability",
                    format!("{:.1}%", latest.failure_probability * 100.0),
                    Severity::for_probability(latest.failure_probability),
                ),
                Kpi::rated(
                    "Anomaly",
                    if anomaly { "YES" } else { "NO" }.to_string(),
                    if anomaly {
                        Severity::Critical
                    } else {
                        Severity::Good
                    },
                ),
                Kpi::rated(
                    "Alert Status",
                    latest.alert_status.clone(),
                    if alert {
                        Severity::Critical
                    } else {
                        Severity::Good
                    },
                ),
            ],
        }
    }

    pub fn get(&self, label: &str) -> Option<&Kpi> {
        self.tiles.iter().find(|k| k.label == label)
    }
}

/// Window summary counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryPanel {
    pub alerts: u64,
    pub ok: u64,
    pub anomalies: u64,
    pub top_root_cause: String,
}

impl SummaryPanel {
    pub fn from_statistics(stats: &Statistics) -> Self {
        // Highest count wins; ties go to the alphabetically first cause
        let top = stats
            .root_causes
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, _)| name.chars().take(ROOT_CAUSE_LABEL_MAX).collect())
            .unwrap_or_else(|| "--".to_string());

        Self {
            alerts: stats.alerts_count,
            ok: stats.ok_count,
            anomalies: stats.anomalies_count,
            top_root_cause: top,
        }
    }
}

/// Full detail list for the latest record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsPanel {
    pub rows: Vec<(&'static str, String)>,
}

impl DetailsPanel {
    pub fn from_record(latest: &TelemetryRecord) -> Self {
        let yes_no = |flag: bool| if flag { "YES" } else { "NO" }.to_string();
        let or_na = |value: &Option<String>| {
            value
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "N/A".to_string())
        };

        let mut rows = vec![
            ("Timestamp", format_timestamp(&latest.timestamp)),
            ("Anomaly", yes_no(latest.is_anomaly())),
            (
                "Anomaly Score",
                latest
                    .anomaly_score
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "NA".to_string()),
            ),
            ("Predicted Failure", yes_no(latest.is_predicted_failure())),
            (
                "Failure Probability",
                format!("{:.2}%", latest.failure_probability * 100.0),
            ),
            ("Root Cause", or_na(&latest.predicted_root_cause)),
            ("Action", or_na(&latest.recommended_action)),
            ("Auto Resolution", or_na(&latest.auto_resolution)),
            ("Resolution Status", resolution_status(latest).to_string()),
        ];

        if let Some(alert) = latest
            .resolution_alert
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
        {
            rows.push(("Resolution Alert", alert.to_string()));
        }

        Self { rows }
    }
}

/// Everything shown on the overview tab for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub kpis: KpiPanel,
    pub summary: SummaryPanel,
    pub incident: IncidentPanel,
    pub details: DetailsPanel,
}

impl OverviewView {
    pub fn new(latest: &TelemetryRecord, statistics: &Statistics) -> Self {
        Self {
            kpis: KpiPanel::from_record(latest),
            summary: SummaryPanel::from_statistics(statistics),
            incident: IncidentPanel::from_record(latest),
            details: DetailsPanel::from_record(latest),
        }
    }

    pub fn from_response(response: &TelemetryResponse) -> Self {
        Self::new(&response.latest, &response.statistics)
    }
}

/// Key insights and performance averages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsPanel {
    pub system_health: String,
    pub alert_rate: String,
    pub anomaly_rate: String,
    pub risk: RiskLevel,
    pub avg_cpu: String,
    pub avg_memory: String,
    pub avg_response: String,
    pub avg_failure_prob: String,
}

impl InsightsPanel {
    pub fn from_insights(insights: &Insights) -> Self {
        Self {
            system_health: format!("{:.1}% OK", 100.0 - insights.alert_rate),
            alert_rate: format!("{:.1}%", insights.alert_rate),
            anomaly_rate: format!("{:.1}%", insights.anomaly_rate),
            risk: RiskLevel::for_probability(insights.avg_failure_prob),
            avg_cpu: format!("{:.1}%", insights.avg_cpu),
            avg_memory: format!("{:.2} GB", insights.avg_memory),
            avg_response: format!("{:.0} ms", insights.avg_response),
            avg_failure_prob: format!("{:.2}%", insights.avg_failure_prob * 100.0),
        }
    }
}

/// One row of the admin login-history table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRow {
    pub username: String,
    pub role: String,
    pub login_time: String,
    pub ip_address: String,
}

impl From<&LoginRecord> for LoginRow {
    fn from(record: &LoginRecord) -> Self {
        Self {
            username: record.username.clone(),
            role: record.role.clone().unwrap_or_else(|| "N/A".to_string()),
            login_time: format_timestamp(&record.timestamp),
            ip_address: record
                .ip_address
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// Placeholder for an empty login history
pub const NO_LOGIN_HISTORY: &str = "No login history available.";

/// Login-history tab contents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum LoginHistoryView {
    Table(Vec<LoginRow>),
    Empty,
    Unavailable(String),
}

impl LoginHistoryView {
    pub fn from_records(records: &[LoginRecord]) -> Self {
        if records.is_empty() {
            LoginHistoryView::Empty
        } else {
            LoginHistoryView::Table(records.iter().map(LoginRow::from).collect())
        }
    }
}

/// Render a backend timestamp as local-style `YYYY-MM-DD HH:MM:SS`.
///
/// Accepts RFC 3339 and the space- or `T`-separated naive forms the backend
/// emits; anything else is shown verbatim.
pub fn format_timestamp(raw: &str) -> String {
    const OUT: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(OUT).to_string();
    }
    for pattern in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(OUT).to_string();
        }
    }
    raw.to_string()
}
