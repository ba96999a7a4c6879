//! Line-delimited JSON rendering for scripting.

use super::charts::Chart;
use super::panels::{InsightsPanel, LoginHistoryView, OverviewView};
use super::{ChartSink, Notice, Surface, ViewRenderer};
use crate::api::{AnalyticsPayload, FilterOptions};
use crate::dashboard::Tab;
use crate::session::Session;
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use std::sync::Mutex;

#[derive(Serialize)]
struct Line<'a, T: Serialize + ?Sized> {
    surface: &'a str,
    data: &'a T,
}

/// Emits one `{"surface": ..., "data": ...}` object per line.
pub struct JsonRenderer {
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonRenderer {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    fn emit<T: Serialize + ?Sized>(&self, surface: &str, data: &T) {
        let line = match serde_json::to_string(&Line { surface, data }) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(surface, error = %e, "Failed to serialize view");
                return;
            }
        };

        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            tracing::debug!(error = %e, "Failed to write JSON line");
        }
    }
}

impl ViewRenderer for JsonRenderer {
    fn show_login(&self, error: Option<&str>) {
        self.emit(
            &Surface::Login.to_string(),
            &json!({ "authenticated": false, "error": error }),
        );
    }

    fn show_dashboard(&self, session: &Session, tabs: &[Tab]) {
        self.emit("dashboard", &json!({ "session": session, "tabs": tabs }));
    }

    fn render_filter_options(&self, options: &FilterOptions) {
        self.emit(&Surface::Filters.to_string(), options);
    }

    fn render_overview(&self, view: &OverviewView) {
        self.emit(&Surface::Overview.to_string(), view);
    }

    fn render_analytics(&self, analytics: &AnalyticsPayload) {
        self.emit(&Surface::Analytics.to_string(), analytics);
    }

    fn render_insights(&self, panel: &InsightsPanel) {
        self.emit(&Surface::Insights.to_string(), panel);
    }

    fn render_login_history(&self, view: &LoginHistoryView) {
        self.emit(&Surface::LoginHistory.to_string(), view);
    }

    fn render_notice(&self, notice: &Notice) {
        self.emit("notice", notice);
    }
}

impl ChartSink for JsonRenderer {
    fn render(&self, chart: &Chart) {
        self.emit("chart", chart);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
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

    fn lines(buffer: &Buffer) -> Vec<Value> {
        let raw = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        raw.lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_one_object_per_render() {
        let buffer = Buffer::default();
        let renderer = JsonRenderer::new(Box::new(buffer.clone()));

        renderer.show_login(Some("Invalid username or password"));
        renderer.render_login_history(&LoginHistoryView::Empty);

        let lines = lines(&buffer);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["surface"], "login");
        assert_eq!(lines[0]["data"]["error"], "Invalid username or password");
        assert_eq!(lines[1]["surface"], "login-history");
        assert_eq!(lines[1]["data"]["kind"], "empty");
    }

    #[test]
    fn test_notice_shape() {
        let buffer = Buffer::default();
        let renderer = JsonRenderer::new(Box::new(buffer.clone()));
        renderer.render_notice(&Notice::error(Surface::Analytics, "boom"));

        let lines = lines(&buffer);
        assert_eq!(lines[0]["surface"], "notice");
        assert_eq!(lines[0]["data"]["surface"], "analytics");
        assert_eq!(lines[0]["data"]["level"], "error");
        assert_eq!(lines[0]["data"]["message"], "boom");
    }
}
