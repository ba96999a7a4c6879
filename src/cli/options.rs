//! Options command implementation

use crate::api::DashboardApi;
use crate::view::ViewRenderer;

/// Handle `sentinel options`
pub async fn handle_options(
    api: &dyn DashboardApi,
    renderer: &dyn ViewRenderer,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = api.options().await?;
    tracing::debug!(root_causes = options.root_causes.len(), "Loaded filter options");
    renderer.render_filter_options(&options);
    Ok(())
}
