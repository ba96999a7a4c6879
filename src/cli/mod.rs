//! CLI module for Sentinel
//!
//! Command-line interface definitions and handlers for the monitoring console.
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - Manage the persisted session
//! - `show` - Render the dashboard once
//! - `watch` - Auto-refreshing dashboard driven by stdin commands
//! - `options` - Show the filter choices the backend offers
//! - `health` - Check the backend
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! sentinel login --username admin
//! sentinel show --alert-status ALERT --window 500
//! sentinel watch --interval 5
//! ```

pub mod app;
pub mod completions;
pub mod config;
pub mod health;
pub mod options;
pub mod session;
pub mod show;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::{FilterDefaults, MAX_WINDOW, MIN_WINDOW};
use crate::filter::AlertFilter;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sentinel - AIOps monitoring console
#[derive(Parser, Debug)]
#[command(
    name = "sentinel",
    version,
    about = "Terminal console for the AIOps monitoring backend"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        default_value = "sentinel.toml",
        env = "SENTINEL_CONFIG"
    )]
    pub config: PathBuf,

    /// Override the backend API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Override the session file
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and persist the session
    Login(LoginArgs),
    /// Forget the persisted session
    Logout,
    /// Show the logged-in user
    Whoami(WhoamiArgs),
    /// Render the dashboard once
    Show(ShowArgs),
    /// Live dashboard with auto-refresh
    Watch(WatchArgs),
    /// Show filter options offered by the backend
    Options(OptionsArgs),
    /// Check backend health
    Health(HealthArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub username: String,

    /// Password. When omitted it is read from stdin, and the prompt echoes
    /// what you type; prefer SENTINEL_PASSWORD on shared screens
    #[arg(short, long, env = "SENTINEL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Filter flags; unset flags keep the configured defaults
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// ALL, ALERT or OK
    #[arg(short, long)]
    pub alert_status: Option<AlertFilter>,

    /// Predicted root cause, or ALL
    #[arg(short, long)]
    pub root_cause: Option<String>,

    /// Number of most recent records
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(MIN_WINDOW as i64..=MAX_WINDOW as i64)
    )]
    pub window: Option<u32>,

    /// Start of the date range
    #[arg(long = "from")]
    pub start_date: Option<String>,

    /// End of the date range
    #[arg(long = "to")]
    pub end_date: Option<String>,
}

impl FilterArgs {
    /// Layer the flags over the configured filters.
    pub fn apply(&self, defaults: &mut FilterDefaults) {
        if let Some(alert_status) = self.alert_status {
            defaults.alert_status = alert_status;
        }
        if let Some(ref root_cause) = self.root_cause {
            defaults.root_cause = root_cause.clone();
        }
        if let Some(window) = self.window {
            defaults.window = window;
        }
        if let Some(ref start_date) = self.start_date {
            defaults.start_date = Some(start_date.clone());
        }
        if let Some(ref end_date) = self.end_date {
            defaults.end_date = Some(end_date.clone());
        }
    }
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Also show the login history (admins only)
    #[arg(long)]
    pub history: bool,

    /// Output as JSON lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Auto-refresh interval in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Start with auto-refresh off
    #[arg(long)]
    pub no_refresh: bool,

    /// Output as JSON lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "sentinel.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
