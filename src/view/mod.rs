//! View rendering.
//!
//! The dashboard turns fetched payloads into the view models in [`panels`]
//! and [`charts`] and hands them to two capabilities: a [`ViewRenderer`] for
//! the named display surfaces and a [`ChartSink`] for charts. Two
//! implementations ship with the crate: [`TerminalRenderer`] (tables and
//! colors) and [`JsonRenderer`] (one JSON object per line).

pub mod charts;
pub mod incident;
mod json;
pub mod panels;
mod terminal;

pub use charts::{Chart, ChartData, ChartKind, Series};
pub use incident::{IncidentPanel, IncidentState};
pub use json::JsonRenderer;
pub use panels::{
    DetailsPanel, InsightsPanel, Kpi, KpiPanel, LoginHistoryView, LoginRow, OverviewView,
    RiskLevel, Severity, SummaryPanel, NO_LOGIN_HISTORY,
};
pub use terminal::TerminalRenderer;

use crate::api::{AnalyticsPayload, FilterOptions};
use crate::dashboard::Tab;
use crate::session::Session;
use serde::Serialize;
use std::fmt;

/// Named display surface an inline message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Surface {
    Login,
    Filters,
    Overview,
    Analytics,
    Insights,
    LoginHistory,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Surface::Login => "login",
            Surface::Filters => "filters",
            Surface::Overview => "overview",
            Surface::Analytics => "analytics",
            Surface::Insights => "insights",
            Surface::LoginHistory => "login-history",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Inline message shown on a surface instead of (or above) its content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub surface: Surface,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(surface: Surface, message: impl Into<String>) -> Self {
        Self {
            surface,
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(surface: Surface, message: impl Into<String>) -> Self {
        Self {
            surface,
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Display surfaces of the dashboard.
///
/// Implementations must tolerate calls from concurrent reload tasks.
pub trait ViewRenderer: Send + Sync {
    /// Show the login screen, optionally with an inline error.
    fn show_login(&self, error: Option<&str>);

    /// Show the dashboard frame for `session` with the tabs it may open.
    fn show_dashboard(&self, session: &Session, tabs: &[Tab]);

    /// Populate the filter controls.
    fn render_filter_options(&self, options: &FilterOptions);

    fn render_overview(&self, view: &OverviewView);

    fn render_analytics(&self, analytics: &AnalyticsPayload);

    fn render_insights(&self, panel: &InsightsPanel);

    fn render_login_history(&self, view: &LoginHistoryView);

    fn render_notice(&self, notice: &Notice);
}

/// External charting capability.
pub trait ChartSink: Send + Sync {
    fn render(&self, chart: &Chart);
}
