//! Shared test utilities for Sentinel integration tests.
//!
//! Provides a recording renderer, canned backend payloads and wiremock
//! helpers so each test only mounts the endpoints it cares about.

#![allow(dead_code)]

use sentinel::api::{AnalyticsPayload, FilterOptions, HttpDashboardApi};
use sentinel::config::{ApiConfig, SentinelConfig};
use sentinel::dashboard::{Dashboard, Tab};
use sentinel::session::{MemorySessionStorage, Role, Session, SessionStorage};
use sentinel::view::{
    Chart, ChartSink, InsightsPanel, LoginHistoryView, Notice, OverviewView, ViewRenderer,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Recording renderer
// =============================================================================

/// Everything a renderer was asked to show, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Login(Option<String>),
    Dashboard { username: String, tabs: Vec<Tab> },
    FilterOptions(FilterOptions),
    Overview(OverviewView),
    Analytics(AnalyticsPayload),
    Insights(InsightsPanel),
    LoginHistory(LoginHistoryView),
    Notice(Notice),
}

#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<Rendered>>,
    charts: Mutex<Vec<&'static str>>,
}

impl RecordingRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, event: Rendered) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Rendered> {
        self.events.lock().unwrap().clone()
    }

    pub fn chart_ids(&self) -> Vec<&'static str> {
        self.charts.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
        self.charts.lock().unwrap().clear();
    }

    pub fn overviews(&self) -> Vec<OverviewView> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Rendered::Overview(view) => Some(view),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Rendered::Notice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    pub fn last_dashboard_tabs(&self) -> Option<Vec<Tab>> {
        self.events().into_iter().rev().find_map(|e| match e {
            Rendered::Dashboard { tabs, .. } => Some(tabs),
            _ => None,
        })
    }
}

impl ViewRenderer for RecordingRenderer {
    fn show_login(&self, error: Option<&str>) {
        self.push(Rendered::Login(error.map(str::to_string)));
    }

    fn show_dashboard(&self, session: &Session, tabs: &[Tab]) {
        self.push(Rendered::Dashboard {
            username: session.username.clone(),
            tabs: tabs.to_vec(),
        });
    }

    fn render_filter_options(&self, options: &FilterOptions) {
        self.push(Rendered::FilterOptions(options.clone()));
    }

    fn render_overview(&self, view: &OverviewView) {
        self.push(Rendered::Overview(view.clone()));
    }

    fn render_analytics(&self, analytics: &AnalyticsPayload) {
        self.push(Rendered::Analytics(analytics.clone()));
    }

    fn render_insights(&self, panel: &InsightsPanel) {
        self.push(Rendered::Insights(panel.clone()));
    }

    fn render_login_history(&self, view: &LoginHistoryView) {
        self.push(Rendered::LoginHistory(view.clone()));
    }

    fn render_notice(&self, notice: &Notice) {
        self.push(Rendered::Notice(notice.clone()));
    }
}

impl ChartSink for RecordingRenderer {
    fn render(&self, chart: &Chart) {
        self.charts.lock().unwrap().push(chart.id);
    }
}

// =============================================================================
// Backend payloads
// =============================================================================

pub fn record_json(timestamp: &str, cpu: f64, alert_status: &str) -> Value {
    json!({
        "timestamp": timestamp,
        "cpu_usage": cpu,
        "memory_usage": 5.5,
        "response_time": 320.0,
        "failure_probability": 0.12,
        "alert_status": alert_status,
        "anomaly_label": 0,
        "predicted_root_cause": "CPU_OVERLOAD",
        "resolution_status": "MONITORING"
    })
}

/// A successful `/data` envelope whose latest record has the given CPU
pub fn data_body(cpu: f64) -> Value {
    json!({
        "success": true,
        "latest": record_json("2024-03-01 12:05:00", cpu, "OK"),
        "statistics": {
            "total_records": 2,
            "alerts_count": 0,
            "ok_count": 2,
            "anomalies_count": 0,
            "root_causes": {"CPU_OVERLOAD": 2}
        },
        "data": [
            record_json("2024-03-01 12:00:00", 40.0, "OK"),
            record_json("2024-03-01 12:05:00", cpu, "OK")
        ]
    })
}

pub fn options_body() -> Value {
    json!({
        "success": true,
        "root_causes": ["CPU_OVERLOAD", "DB_LOCK"],
        "date_range": {"min": "2024-01-01", "max": "2024-03-01"}
    })
}

pub fn analytics_body() -> Value {
    json!({
        "success": true,
        "root_causes": {"CPU_OVERLOAD": 2},
        "alert_status": {"OK": 2},
        "correlation": {}
    })
}

pub fn insights_body() -> Value {
    json!({
        "success": true,
        "insights": {
            "alert_rate": 10.0,
            "anomaly_rate": 2.0,
            "avg_cpu": 45.0,
            "avg_memory": 5.0,
            "avg_response": 300.0,
            "avg_failure_prob": 0.1,
            "hourly_trends": [{"hour": 12, "cpu_usage": 45.0, "alert_status": 1}]
        }
    })
}

// =============================================================================
// Wiremock helpers
// =============================================================================

pub async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api{}", route)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount `/options`, `/analytics` and `/insights`; `/data` is left to the test.
pub async fn mount_supporting_endpoints(server: &MockServer) {
    mount_get(server, "/options", options_body()).await;
    mount_get(server, "/analytics", analytics_body()).await;
    mount_get(server, "/insights", insights_body()).await;
}

pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: format!("{}/api", server.uri()),
        timeout_seconds: 5,
    }
}

pub fn http_api(server: &MockServer) -> Arc<HttpDashboardApi> {
    Arc::new(HttpDashboardApi::new(&api_config(server)).unwrap())
}

/// Client pointed at a port nothing listens on
pub fn unreachable_api() -> Arc<HttpDashboardApi> {
    Arc::new(
        HttpDashboardApi::new(&ApiConfig {
            base_url: "http://127.0.0.1:9/api".to_string(),
            timeout_seconds: 2,
        })
        .unwrap(),
    )
}

pub fn config_for(server: &MockServer) -> SentinelConfig {
    SentinelConfig {
        api: api_config(server),
        ..Default::default()
    }
}

/// Storage that already holds a session for `username`
pub fn stored_session(username: &str, role: Role) -> MemorySessionStorage {
    let storage = MemorySessionStorage::new();
    storage
        .save(&Session::new(username.to_string(), role))
        .unwrap();
    storage
}

pub fn dashboard(
    server: &MockServer,
    storage: MemorySessionStorage,
    renderer: &Arc<RecordingRenderer>,
) -> Dashboard {
    Dashboard::new(
        http_api(server),
        Box::new(storage),
        renderer.clone(),
        renderer.clone(),
        &config_for(server),
    )
}
