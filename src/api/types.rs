//! Wire types for the monitoring backend API.
//!
//! Every response except `/health` arrives in an envelope of the form
//! `{ "success": bool, ...payload }`. The envelope is checked in
//! [`super::HttpDashboardApi`]; the structs here describe the payload.
//! Fields the console does not interpret are kept in `extra` so that a
//! payload can be handed on unmodified.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// POST `/login` request body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// POST `/login` success payload
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoginResponse {
    pub username: String,
    pub role: String,
}

/// GET `/options` payload
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct FilterOptions {
    #[serde(default)]
    pub root_causes: Vec<String>,
    #[serde(default)]
    pub date_range: DateRange,
}

/// Earliest and latest dates present in the backend dataset
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct DateRange {
    #[serde(default)]
    pub min: String,
    #[serde(default)]
    pub max: String,
}

/// One telemetry record as produced by the backend pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TelemetryRecord {
    pub timestamp: String,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub response_time: f64,
    pub failure_probability: f64,
    #[serde(default)]
    pub alert_status: String,
    #[serde(default)]
    pub anomaly_label: Option<f64>,
    #[serde(default)]
    pub anomaly_score: Option<f64>,
    #[serde(default)]
    pub predicted_failure: Option<f64>,
    #[serde(default)]
    pub predicted_root_cause: Option<String>,
    #[serde(default)]
    pub recommended_action: Option<String>,
    #[serde(default)]
    pub auto_resolution: Option<String>,
    #[serde(default)]
    pub resolution_status: Option<String>,
    #[serde(default)]
    pub resolution_alert: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TelemetryRecord {
    pub fn is_anomaly(&self) -> bool {
        self.anomaly_label == Some(1.0)
    }

    pub fn is_predicted_failure(&self) -> bool {
        self.predicted_failure == Some(1.0)
    }
}

/// Aggregates computed by the backend over the filtered window
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Statistics {
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub alerts_count: u64,
    #[serde(default)]
    pub ok_count: u64,
    #[serde(default)]
    pub anomalies_count: u64,
    #[serde(default)]
    pub root_causes: BTreeMap<String, u64>,
}

/// GET `/data` payload
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TelemetryResponse {
    pub latest: TelemetryRecord,
    pub statistics: Statistics,
    #[serde(default)]
    pub data: Vec<TelemetryRecord>,
}

/// GET `/analytics` payload
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct AnalyticsPayload {
    #[serde(default)]
    pub root_causes: BTreeMap<String, u64>,
    #[serde(default)]
    pub alert_status: BTreeMap<String, u64>,
    /// Column-major correlation matrix: `correlation[column][row]`
    #[serde(default)]
    pub correlation: BTreeMap<String, BTreeMap<String, Option<f64>>>,
    #[serde(default)]
    pub statistics: Option<Value>,
}

/// GET `/insights` payload (the `insights` member of the envelope)
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Insights {
    pub alert_rate: f64,
    pub anomaly_rate: f64,
    pub avg_cpu: f64,
    pub avg_memory: f64,
    pub avg_response: f64,
    pub avg_failure_prob: f64,
    #[serde(default)]
    pub hourly_trends: Vec<HourlyTrend>,
}

/// Per-hour averages; `alert_status` is the number of alerts in that hour
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct HourlyTrend {
    pub hour: u32,
    pub cpu_usage: f64,
    #[serde(default)]
    pub memory_usage: Option<f64>,
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub alert_status: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InsightsEnvelope {
    pub insights: Insights,
}

/// One successful login as recorded by the backend
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoginRecord {
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// GET `/login-history` payload
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct LoginHistory {
    #[serde(default)]
    pub logins: Vec<LoginRecord>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Per-user aggregate from `/login-stats`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UserLoginStats {
    pub total_logins: u64,
    #[serde(default)]
    pub last_login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginStatsEnvelope {
    #[serde(default)]
    pub stats: BTreeMap<String, UserLoginStats>,
}

/// GET `/health` body (not enveloped)
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BackendHealth {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub records: u64,
    #[serde(default)]
    pub mongodb_connected: bool,
}
