//! Chart payloads handed to a [`super::ChartSink`].
//!
//! Building a chart only reshapes backend data into series; drawing is the
//! sink's business.

use crate::api::{AnalyticsPayload, Insights, TelemetryRecord};
use serde::Serialize;

/// Metrics shown in the correlation heatmap, in axis order
pub const CORRELATION_METRICS: [&str; 4] = [
    "cpu_usage",
    "memory_usage",
    "response_time",
    "failure_probability",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Heatmap,
}

/// One named line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Series { series: Vec<Series> },
    Categories { labels: Vec<String>, values: Vec<f64> },
    Matrix { labels: Vec<String>, z: Vec<Vec<Option<f64>>> },
}

/// A chart ready for the chart sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    /// Stable surface id, e.g. `cpuChart`
    pub id: &'static str,
    pub title: &'static str,
    pub kind: ChartKind,
    pub data: ChartData,
}

fn line(id: &'static str, title: &'static str, series: Vec<Series>) -> Chart {
    Chart {
        id,
        title,
        kind: ChartKind::Line,
        data: ChartData::Series { series },
    }
}

/// Trend charts for the telemetry series; nothing for an empty series.
pub fn telemetry_charts(records: &[TelemetryRecord]) -> Vec<Chart> {
    if records.is_empty() {
        return Vec::new();
    }

    let timestamps: Vec<String> = records.iter().map(|r| r.timestamp.clone()).collect();
    let series = |name: &str, pick: fn(&TelemetryRecord) -> f64| Series {
        name: name.to_string(),
        x: timestamps.clone(),
        y: records.iter().map(pick).collect(),
    };

    let cpu = series("CPU Usage", |r| r.cpu_usage);
    let memory = series("Memory Usage", |r| r.memory_usage);
    let response = series("Response Time", |r| r.response_time);
    let failure = series("Failure Probability", |r| r.failure_probability);

    let multi = vec![
        Series {
            name: "CPU".to_string(),
            ..cpu.clone()
        },
        Series {
            name: "Memory".to_string(),
            ..memory.clone()
        },
        Series {
            name: "Response".to_string(),
            ..response.clone()
        },
        Series {
            name: "Failure Prob".to_string(),
            ..failure.clone()
        },
    ];

    vec![
        line("cpuChart", "CPU Usage Trend", vec![cpu]),
        line("memoryChart", "Memory Usage Trend", vec![memory]),
        line("responseChart", "Response Time Trend", vec![response]),
        line("failureChart", "Failure Probability Trend", vec![failure]),
        line("multiMetricChart", "Multi-Metric Overview", multi),
    ]
}

/// Distribution and correlation charts for the analytics tab.
pub fn analytics_charts(analytics: &AnalyticsPayload) -> Vec<Chart> {
    let mut causes: Vec<(&String, &u64)> = analytics.root_causes.iter().collect();
    causes.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let cause_labels: Vec<String> = causes.iter().map(|(name, _)| (*name).clone()).collect();
    let cause_values: Vec<f64> = causes.iter().map(|(_, count)| **count as f64).collect();

    let mut charts = vec![
        Chart {
            id: "rootCauseChart",
            title: "Root Cause Distribution",
            kind: ChartKind::Bar,
            data: ChartData::Categories {
                labels: cause_labels.clone(),
                values: cause_values.clone(),
            },
        },
        Chart {
            id: "rootCausePieChart",
            title: "Root Cause Share",
            kind: ChartKind::Pie,
            data: ChartData::Categories {
                labels: cause_labels,
                values: cause_values,
            },
        },
        Chart {
            id: "alertStatusChart",
            title: "Alert Status Distribution",
            kind: ChartKind::Pie,
            data: ChartData::Categories {
                labels: analytics.alert_status.keys().cloned().collect(),
                values: analytics.alert_status.values().map(|v| *v as f64).collect(),
            },
        },
    ];

    if !analytics.correlation.is_empty() {
        let z = CORRELATION_METRICS
            .iter()
            .map(|m| {
                CORRELATION_METRICS
                    .iter()
                    .map(|n| {
                        analytics
                            .correlation
                            .get(*m)
                            .and_then(|column| column.get(*n))
                            .copied()
                            .flatten()
                    })
                    .collect()
            })
            .collect();

        charts.push(Chart {
            id: "correlationChart",
            title: "Metrics Correlation",
            kind: ChartKind::Heatmap,
            data: ChartData::Matrix {
                labels: CORRELATION_METRICS.iter().map(|m| m.to_string()).collect(),
                z,
            },
        });
    }

    charts
}

/// Hourly CPU average alongside alert counts scaled by ten.
pub fn hourly_trend_chart(insights: &Insights) -> Chart {
    let hours: Vec<String> = insights
        .hourly_trends
        .iter()
        .map(|h| h.hour.to_string())
        .collect();

    line(
        "hourlyTrendChart",
        "Hourly Trends",
        vec![
            Series {
                name: "Avg CPU %".to_string(),
                x: hours.clone(),
                y: insights.hourly_trends.iter().map(|h| h.cpu_usage).collect(),
            },
            Series {
                name: "Alerts (x10)".to_string(),
                x: hours,
                y: insights
                    .hourly_trends
                    .iter()
                    .map(|h| h.alert_status * 10.0)
                    .collect(),
            },
        ],
    )
}
