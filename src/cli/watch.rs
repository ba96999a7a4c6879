//! Watch command: live dashboard driven by stdin commands.

use crate::cli::app::build_dashboard;
use crate::cli::WatchArgs;
use crate::config::{SentinelConfig, MAX_WINDOW, MIN_WINDOW};
use crate::dashboard::{Dashboard, DashboardError, Tab};
use crate::filter::{AlertFilter, FilterUpdate};
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

const HELP: &str = "\
Commands:
  alert <ALL|ALERT|OK>     filter by alert status
  root <cause|ALL>         filter by predicted root cause
  window <n>               number of recent records (50-1500)
  from <date|->            start of date range (- clears)
  to <date|->              end of date range (- clears)
  interval <secs>          auto-refresh interval
  refresh <on|off>         toggle auto-refresh
  tab <name>               overview, analytics, insights, login-history
  reload                   fetch now
  logout                   end the session and exit
  quit                     exit";

/// One line typed into `sentinel watch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    Alert(AlertFilter),
    RootCause(String),
    Window(u32),
    From(Option<String>),
    To(Option<String>),
    Interval(u64),
    Refresh(bool),
    Tab(Tab),
    Reload,
    Logout,
    Quit,
    Help,
}

fn date_arg(arg: Option<&str>) -> Option<String> {
    arg.filter(|d| *d != "-").map(str::to_string)
}

impl FromStr for WatchCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        let required = |name: &str| arg.ok_or_else(|| format!("Usage: {} <value>", name));

        match command.as_str() {
            "alert" => Ok(WatchCommand::Alert(required("alert")?.parse()?)),
            "root" => Ok(WatchCommand::RootCause(required("root")?.to_string())),
            "window" => {
                let window: u32 = required("window")?
                    .parse()
                    .map_err(|_| "Window must be a number".to_string())?;
                if !(MIN_WINDOW..=MAX_WINDOW).contains(&window) {
                    return Err(format!(
                        "Window must be between {} and {}",
                        MIN_WINDOW, MAX_WINDOW
                    ));
                }
                Ok(WatchCommand::Window(window))
            }
            "from" => Ok(WatchCommand::From(date_arg(arg))),
            "to" => Ok(WatchCommand::To(date_arg(arg))),
            "interval" => required("interval")?
                .parse()
                .map(WatchCommand::Interval)
                .map_err(|_| "Interval must be a whole number of seconds".to_string()),
            "refresh" => match required("refresh")? {
                "on" => Ok(WatchCommand::Refresh(true)),
                "off" => Ok(WatchCommand::Refresh(false)),
                other => Err(format!("Expected on or off, got {}", other)),
            },
            "tab" => Ok(WatchCommand::Tab(required("tab")?.parse()?)),
            "reload" | "r" => Ok(WatchCommand::Reload),
            "logout" => Ok(WatchCommand::Logout),
            "quit" | "exit" | "q" => Ok(WatchCommand::Quit),
            "help" | "?" => Ok(WatchCommand::Help),
            other => Err(format!("Unknown command: {} (type `help`)", other)),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

async fn apply(dashboard: &Dashboard, command: WatchCommand) -> Result<Flow, DashboardError> {
    match command {
        WatchCommand::Alert(alert_status) => {
            dashboard
                .update_filters(FilterUpdate::alert_status(alert_status))
                .await;
        }
        WatchCommand::RootCause(root_cause) => {
            dashboard
                .update_filters(FilterUpdate::root_cause(root_cause))
                .await;
        }
        WatchCommand::Window(window) => {
            dashboard.update_filters(FilterUpdate::window(window)).await;
        }
        WatchCommand::From(date) => {
            dashboard
                .update_filters(FilterUpdate {
                    start_date: Some(date),
                    ..Default::default()
                })
                .await;
        }
        WatchCommand::To(date) => {
            dashboard
                .update_filters(FilterUpdate {
                    end_date: Some(date),
                    ..Default::default()
                })
                .await;
        }
        WatchCommand::Interval(seconds) => dashboard.set_refresh_interval(seconds),
        WatchCommand::Refresh(true) => {
            let interval = dashboard.refresh_policy().interval_seconds;
            dashboard.enable_auto_refresh(interval)?;
        }
        WatchCommand::Refresh(false) => dashboard.disable_auto_refresh(),
        WatchCommand::Tab(tab) => dashboard.switch_tab(tab).await?,
        WatchCommand::Reload => {
            dashboard.reload().await;
        }
        WatchCommand::Logout => {
            dashboard.logout();
            return Ok(Flow::Stop);
        }
        WatchCommand::Quit => return Ok(Flow::Stop),
        WatchCommand::Help => eprintln!("{}", HELP),
    }
    Ok(Flow::Continue)
}

/// Wait for Ctrl+C
async fn shutdown_signal(cancel_token: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received SIGINT, stopping watch"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            return;
        }
    }
    cancel_token.cancel();
}

/// Handle `sentinel watch`
pub async fn handle_watch(
    args: &WatchArgs,
    mut config: SentinelConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    args.filters.apply(&mut config.filters);
    if let Some(interval) = args.interval {
        config.refresh.interval_seconds = interval;
    }
    // Auto-refresh is switched on below, after the first render
    let start_refresh = !args.no_refresh;
    config.refresh.enabled = false;
    config.validate()?;

    let dashboard = build_dashboard(&config, args.json)?;
    dashboard.start().await.ok_or("Not logged in")?;
    if start_refresh {
        dashboard.enable_auto_refresh(config.refresh.interval_seconds)?;
    }
    eprintln!("Type `help` for commands, `quit` to exit.");

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match line.parse::<WatchCommand>() {
                    Ok(command) => match apply(&dashboard, command).await {
                        Ok(Flow::Stop) => break,
                        Ok(Flow::Continue) => {}
                        Err(e) => eprintln!("{}", e),
                    },
                    Err(e) => eprintln!("{}", e),
                },
                // Keep refreshing until Ctrl+C once stdin is closed
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stdin");
                    stdin_open = false;
                }
            }
        }
    }

    dashboard.disable_auto_refresh();
    Ok(())
}
