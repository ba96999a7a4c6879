//! Shared wiring for commands that talk to the backend.

use crate::api::{DashboardApi, HttpDashboardApi};
use crate::cli::GlobalArgs;
use crate::config::SentinelConfig;
use crate::dashboard::Dashboard;
use crate::session::{FileSessionStorage, SessionStore};
use crate::view::{ChartSink, JsonRenderer, TerminalRenderer, ViewRenderer};
use std::sync::Arc;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &GlobalArgs,
) -> Result<SentinelConfig, Box<dyn std::error::Error>> {
    let mut config = SentinelConfig::load_or_default(&args.config)?;

    config = config.with_env_overrides();

    // CLI flags win over file and environment
    if let Some(ref url) = args.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(ref path) = args.session_file {
        config.session.path = path.clone();
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

pub fn build_api(config: &SentinelConfig) -> Result<Arc<dyn DashboardApi>, Box<dyn std::error::Error>> {
    Ok(Arc::new(HttpDashboardApi::new(&config.api)?))
}

pub fn session_store(config: &SentinelConfig, api: Arc<dyn DashboardApi>) -> SessionStore {
    SessionStore::new(api, Box::new(FileSessionStorage::new(&config.session.path)))
}

/// Renderer and chart sink writing to stdout
pub fn renderers(json: bool) -> (Arc<dyn ViewRenderer>, Arc<dyn ChartSink>) {
    if json {
        let renderer = Arc::new(JsonRenderer::stdout());
        let charts: Arc<dyn ChartSink> = renderer.clone();
        (renderer, charts)
    } else {
        let renderer = Arc::new(TerminalRenderer::stdout());
        let charts: Arc<dyn ChartSink> = renderer.clone();
        (renderer, charts)
    }
}

/// Dashboard backed by the HTTP API and the session file
pub fn build_dashboard(
    config: &SentinelConfig,
    json: bool,
) -> Result<Dashboard, Box<dyn std::error::Error>> {
    let api = build_api(config)?;
    let (renderer, charts) = renderers(json);
    Ok(Dashboard::new(
        api,
        Box::new(FileSessionStorage::new(&config.session.path)),
        renderer,
        charts,
        config,
    ))
}
