//! Health command implementation

use crate::api::{BackendHealth, DashboardApi};
use crate::cli::HealthArgs;
use colored::Colorize;
use std::fmt::Write;

/// Format backend health as pretty text
fn format_health_pretty(health: &BackendHealth, base_url: &str) -> String {
    let mut output = String::new();

    let status_display = if health.status == "healthy" {
        "Healthy".green()
    } else {
        health.status.yellow()
    };
    let database = if health.mongodb_connected {
        "connected".green()
    } else {
        "disconnected".yellow()
    };

    let _ = writeln!(output, "Backend: {}", base_url);
    let _ = writeln!(output, "Status: {}", status_display);
    let _ = writeln!(output, "Records: {}", health.records);
    let _ = write!(output, "Database: {}", database);
    if let Some(ref timestamp) = health.timestamp {
        let _ = write!(output, "\nChecked: {}", timestamp);
    }

    output
}

/// Handle `sentinel health`
pub async fn handle_health(
    args: &HealthArgs,
    api: &dyn DashboardApi,
    base_url: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let health = api.health().await?;

    if args.json {
        Ok(serde_json::to_string_pretty(&health)?)
    } else {
        Ok(format_health_pretty(&health, base_url))
    }
}
