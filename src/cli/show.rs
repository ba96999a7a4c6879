//! Show command implementation

use crate::cli::app::build_dashboard;
use crate::cli::ShowArgs;
use crate::config::SentinelConfig;

/// Handle `sentinel show`: render the dashboard once for the stored session.
pub async fn handle_show(
    args: &ShowArgs,
    mut config: SentinelConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    args.filters.apply(&mut config.filters);
    config.refresh.enabled = false;
    config.validate()?;

    let dashboard = build_dashboard(&config, args.json)?;
    // The login view already explains how to sign in
    dashboard.start().await.ok_or("Not logged in")?;

    if args.history {
        dashboard.load_login_history().await?;
    }

    if dashboard.snapshot().is_none() {
        return Err("No telemetry loaded".into());
    }
    Ok(())
}
