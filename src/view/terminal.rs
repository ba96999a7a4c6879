//! Terminal rendering with tables and colors.

use super::charts::{Chart, ChartData};
use super::incident::IncidentState;
use super::panels::{InsightsPanel, LoginHistoryView, OverviewView, RiskLevel, Severity};
use super::{ChartSink, Notice, NoticeLevel, ViewRenderer, NO_LOGIN_HISTORY};
use crate::api::{AnalyticsPayload, FilterOptions};
use crate::dashboard::Tab;
use crate::session::Session;
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::io::Write;
use std::sync::Mutex;

/// Writes every surface as text to a terminal (or any writer).
pub struct TerminalRenderer {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalRenderer {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        // A closed stdout is not worth crashing a refresh over
        if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
            tracing::debug!(error = %e, "Failed to write to terminal");
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn paint(value: &str, severity: Option<Severity>) -> ColoredString {
    match severity {
        Some(Severity::Critical) => value.red().bold(),
        Some(Severity::Warning) => value.yellow(),
        Some(Severity::Good) => value.green(),
        None => value.normal(),
    }
}

fn heading(title: &str) -> String {
    format!("\n{}", title.bold().underline())
}

/// Format an overview snapshot as text
pub(crate) fn format_overview(view: &OverviewView) -> String {
    let mut kpis = new_table();
    kpis.set_header(view.kpis.tiles.iter().map(|k| k.label).collect::<Vec<_>>());
    kpis.add_row(
        view.kpis
            .tiles
            .iter()
            .map(|k| Cell::new(paint(&k.value, k.severity)))
            .collect::<Vec<_>>(),
    );

    let mut summary = new_table();
    summary.set_header(vec!["Alerts", "OK", "Anomalies", "Top Root Cause"]);
    summary.add_row(vec![
        Cell::new(view.summary.alerts),
        Cell::new(view.summary.ok),
        Cell::new(view.summary.anomalies),
        Cell::new(&view.summary.top_root_cause),
    ]);

    let headline = match view.incident.state {
        IncidentState::Escalation => format!("!! {}", view.incident.headline).red().bold(),
        IncidentState::Alert => format!("! {}", view.incident.headline).red(),
        IncidentState::Stable => view.incident.headline.green(),
    };
    let mut incident = format!("{}", headline);
    for (label, value) in &view.incident.lines {
        incident.push_str(&format!("\n  {}: {}", label.bold(), value));
    }

    let mut details = new_table();
    details.set_header(vec!["Field", "Value"]);
    for (label, value) in &view.details.rows {
        details.add_row(vec![Cell::new(label), Cell::new(value)]);
    }

    format!(
        "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}",
        heading("Key Metrics"),
        kpis,
        heading("Summary"),
        summary,
        heading("Incident Status"),
        incident,
        heading("Latest Record"),
        details
    )
}

pub(crate) fn format_chart(chart: &Chart) -> String {
    let mut table = new_table();
    match &chart.data {
        ChartData::Series { series } => {
            table.set_header(vec!["Series", "Points", "Min", "Max", "Last"]);
            for s in series {
                let min = s.y.iter().copied().fold(f64::INFINITY, f64::min);
                let max = s.y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let last = s.y.last().copied();
                let num = |v: f64| {
                    if v.is_finite() {
                        format!("{:.2}", v)
                    } else {
                        "--".to_string()
                    }
                };
                table.add_row(vec![
                    Cell::new(&s.name),
                    Cell::new(s.y.len()),
                    Cell::new(num(min)),
                    Cell::new(num(max)),
                    Cell::new(last.map(num).unwrap_or_else(|| "--".to_string())),
                ]);
            }
        }
        ChartData::Categories { labels, values } => {
            let total: f64 = values.iter().sum();
            table.set_header(vec!["Label", "Value", "Share"]);
            for (label, value) in labels.iter().zip(values) {
                let share = if total > 0.0 {
                    format!("{:.1}%", value / total * 100.0)
                } else {
                    "--".to_string()
                };
                table.add_row(vec![Cell::new(label), Cell::new(value), Cell::new(share)]);
            }
        }
        ChartData::Matrix { labels, z } => {
            let mut header = vec![String::new()];
            header.extend(labels.iter().cloned());
            table.set_header(header);
            for (label, row) in labels.iter().zip(z) {
                let mut cells = vec![Cell::new(label)];
                cells.extend(row.iter().map(|v| {
                    Cell::new(v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "--".into()))
                }));
                table.add_row(cells);
            }
        }
    }
    format!("{}\n{}", heading(chart.title), table)
}

impl ViewRenderer for TerminalRenderer {
    fn show_login(&self, error: Option<&str>) {
        let mut text = format!(
            "{}\nRun `sentinel login --username <name>` to sign in.",
            "Not logged in.".yellow()
        );
        if let Some(error) = error {
            text.push_str(&format!("\n{}", error.red()));
        }
        self.emit(&text);
    }

    fn show_dashboard(&self, session: &Session, tabs: &[Tab]) {
        let tabs: Vec<&str> = tabs.iter().map(Tab::as_str).collect();
        self.emit(&format!(
            "{} {} ({})   tabs: {}",
            "User:".bold(),
            session.username,
            session.role,
            tabs.join(" | ")
        ));
    }

    fn render_filter_options(&self, options: &FilterOptions) {
        let causes = if options.root_causes.is_empty() {
            "--".to_string()
        } else {
            options.root_causes.join(", ")
        };
        self.emit(&format!(
            "{}\n  Root causes: ALL, {}\n  Date range: {} .. {}",
            heading("Filter Options"),
            causes,
            options.date_range.min,
            options.date_range.max
        ));
    }

    fn render_overview(&self, view: &OverviewView) {
        self.emit(&format_overview(view));
    }

    fn render_analytics(&self, analytics: &AnalyticsPayload) {
        let mut table = new_table();
        table.set_header(vec!["Alert Status", "Count"]);
        for (status, count) in &analytics.alert_status {
            table.add_row(vec![Cell::new(status), Cell::new(count)]);
        }
        self.emit(&format!("{}\n{}", heading("Analytics"), table));
    }

    fn render_insights(&self, panel: &InsightsPanel) {
        let risk = match panel.risk {
            RiskLevel::High => "High".red().bold(),
            RiskLevel::Medium => "Medium".yellow(),
            RiskLevel::Low => "Low".green(),
        };

        let mut table = new_table();
        table.set_header(vec!["Insight", "Value"]);
        table.add_row(vec![Cell::new("System Health"), Cell::new(&panel.system_health)]);
        table.add_row(vec![Cell::new("Alert Rate"), Cell::new(&panel.alert_rate)]);
        table.add_row(vec![
            Cell::new("Anomaly Detection"),
            Cell::new(&panel.anomaly_rate),
        ]);
        table.add_row(vec![Cell::new("Risk Level"), Cell::new(risk)]);
        table.add_row(vec![Cell::new("Average CPU"), Cell::new(&panel.avg_cpu)]);
        table.add_row(vec![Cell::new("Average Memory"), Cell::new(&panel.avg_memory)]);
        table.add_row(vec![
            Cell::new("Average Response"),
            Cell::new(&panel.avg_response),
        ]);
        table.add_row(vec![
            Cell::new("Avg Failure Prob"),
            Cell::new(&panel.avg_failure_prob),
        ]);

        self.emit(&format!("{}\n{}", heading("Insights"), table));
    }

    fn render_login_history(&self, view: &LoginHistoryView) {
        let body = match view {
            LoginHistoryView::Table(rows) => {
                let mut table = new_table();
                table.set_header(vec!["Username", "Role", "Login Time", "IP Address"]);
                for row in rows {
                    table.add_row(vec![
                        Cell::new(&row.username),
                        Cell::new(&row.role),
                        Cell::new(&row.login_time),
                        Cell::new(&row.ip_address),
                    ]);
                }
                table.to_string()
            }
            LoginHistoryView::Empty => NO_LOGIN_HISTORY.dimmed().to_string(),
            LoginHistoryView::Unavailable(message) => message.red().to_string(),
        };
        self.emit(&format!("{}\n{}", heading("Login History"), body));
    }

    fn render_notice(&self, notice: &Notice) {
        let text = match notice.level {
            NoticeLevel::Info => format!("[{}] {}", notice.surface, notice.message).dimmed(),
            NoticeLevel::Error => format!("[{}] {}", notice.surface, notice.message).red(),
        };
        self.emit(&text.to_string());
    }
}

impl ChartSink for TerminalRenderer {
    fn render(&self, chart: &Chart) {
        self.emit(&format_chart(chart));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TelemetryResponse;
    use crate::view::charts::Series;
    use crate::view::ChartKind;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn renderer() -> (TerminalRenderer, Buffer) {
        let buffer = Buffer::default();
        (TerminalRenderer::new(Box::new(buffer.clone())), buffer)
    }

    fn response() -> TelemetryResponse {
        serde_json::from_value(json!({
            "latest": {
                "timestamp": "2024-03-01 12:00:00",
                "cpu_usage": 92.0,
                "memory_usage": 7.25,
                "response_time": 950.0,
                "failure_probability": 0.8,
                "alert_status": "ALERT",
                "resolution_status": "MANUAL_INTERVENTION_REQUIRED",
                "predicted_root_cause": "DB_LOCK"
            },
            "statistics": {"alerts_count": 3, "ok_count": 1, "anomalies_count": 1,
                           "root_causes": {"DB_LOCK": 3}},
            "data": []
        }))
        .unwrap()
    }

    #[test]
    fn test_overview_contains_surfaces() {
        let (renderer, buffer) = renderer();
        renderer.render_overview(&OverviewView::from_response(&response()));

        let text = buffer.text();
        assert!(text.contains("Key Metrics"));
        assert!(text.contains("92.0%"));
        assert!(text.contains("ESCALATION REQUIRED"));
        assert!(text.contains("DB_LOCK"));
    }

    #[test]
    fn test_login_history_placeholder() {
        let (renderer, buffer) = renderer();
        renderer.render_login_history(&LoginHistoryView::Empty);
        assert!(buffer.text().contains(NO_LOGIN_HISTORY));
    }

    #[test]
    fn test_chart_series_summary() {
        let chart = Chart {
            id: "cpuChart",
            title: "CPU Usage Trend",
            kind: ChartKind::Line,
            data: ChartData::Series {
                series: vec![Series {
                    name: "CPU Usage".to_string(),
                    x: vec!["a".into(), "b".into(), "c".into()],
                    y: vec![30.0, 80.5, 55.0],
                }],
            },
        };
        let text = format_chart(&chart);
        assert!(text.contains("CPU Usage Trend"));
        assert!(text.contains("80.50"));
        assert!(text.contains("55.00"));
    }

    #[test]
    fn test_chart_empty_series_placeholder() {
        let chart = Chart {
            id: "hourlyTrendChart",
            title: "Hourly Trends",
            kind: ChartKind::Line,
            data: ChartData::Series {
                series: vec![Series {
                    name: "Avg CPU %".to_string(),
                    x: vec![],
                    y: vec![],
                }],
            },
        };
        assert!(format_chart(&chart).contains("--"));
    }

    #[test]
    fn test_notice_includes_surface() {
        let (renderer, buffer) = renderer();
        renderer.render_notice(&Notice::error(
            crate::view::Surface::Overview,
            "No data found for selected filters",
        ));
        let text = buffer.text();
        assert!(text.contains("[overview]"));
        assert!(text.contains("No data found"));
    }
}
