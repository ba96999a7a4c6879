//! Dashboard coordinator.
//!
//! [`Dashboard`] owns the application state (session, filters, last
//! snapshot, active tab, refresh timer) and wires user actions to the
//! backend and the renderer. Reloads may run concurrently (timer ticks
//! are fire-and-forget), so every `/data` request takes a sequence number
//! and a response older than the last one applied is dropped. The
//! staleness check, the snapshot swap and the overview render happen under
//! one lock, so the screen always ends on the newest response.

mod error;
mod tabs;

pub use error::DashboardError;
pub use tabs::Tab;

use crate::api::{
    ApiError, DashboardApi, FilterOptions, Statistics, TelemetryRecord, TelemetryResponse,
};
use crate::config::SentinelConfig;
use crate::filter::{FilterCriteria, FilterState, FilterUpdate};
use crate::refresh::{RefreshController, RefreshPolicy, RefreshState, ReloadTrigger};
use crate::session::{Session, SessionStorage, SessionStore};
use crate::view::charts::{analytics_charts, hourly_trend_chart, telemetry_charts};
use crate::view::{
    ChartSink, InsightsPanel, LoginHistoryView, Notice, OverviewView, Surface, ViewRenderer,
};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// The last successful `/data` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub latest: TelemetryRecord,
    pub statistics: Statistics,
    pub series: Vec<TelemetryRecord>,
}

impl From<TelemetryResponse> for DashboardSnapshot {
    fn from(response: TelemetryResponse) -> Self {
        Self {
            latest: response.latest,
            statistics: response.statistics,
            series: response.data,
        }
    }
}

impl DashboardSnapshot {
    pub fn overview(&self) -> OverviewView {
        OverviewView::new(&self.latest, &self.statistics)
    }
}

/// The applied snapshot and the request it answered.
#[derive(Default)]
struct Applied {
    request_id: u64,
    snapshot: Option<DashboardSnapshot>,
}

/// What happened to a reload request.
#[derive(Debug, Clone, PartialEq)]
pub enum ReloadOutcome {
    /// Snapshot replaced and rendered
    Applied,
    /// A newer response was already applied, or the session ended
    Discarded,
    /// No session
    Skipped,
    /// Previous snapshot kept
    Failed(ApiError),
}

struct DashboardCore {
    api: Arc<dyn DashboardApi>,
    session: SessionStore,
    filters: Mutex<FilterState>,
    initial_filters: FilterCriteria,
    renderer: Arc<dyn ViewRenderer>,
    charts: Arc<dyn ChartSink>,
    /// Guards the snapshot together with the id of the request it answered
    applied: Mutex<Applied>,
    active_tab: RwLock<Tab>,
    /// Sequence number of the most recent `/data` request
    issued: AtomicU64,
    history_limit: u32,
}

impl DashboardCore {
    fn criteria(&self) -> FilterCriteria {
        self.filters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .current()
    }

    async fn reload(&self) -> ReloadOutcome {
        if !self.session.is_authenticated() {
            tracing::debug!("Reload skipped, no session");
            return ReloadOutcome::Skipped;
        }

        let request_id = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let criteria = self.criteria();
        tracing::debug!(request_id, ?criteria, "Reloading telemetry");

        match self.api.data(&criteria).await {
            Ok(response) => {
                let records = response.data.len();
                if !self.commit(request_id, response) {
                    return ReloadOutcome::Discarded;
                }
                tracing::info!(request_id, records, "Dashboard updated");

                futures::join!(
                    self.load_analytics(criteria.window),
                    self.load_insights(criteria.window)
                );
                ReloadOutcome::Applied
            }
            Err(e) => {
                let applied = self.lock_applied();
                if !self.is_current(&applied, request_id) {
                    return ReloadOutcome::Discarded;
                }
                tracing::warn!(request_id, error = %e, "Telemetry reload failed");
                self.renderer
                    .render_notice(&Notice::error(Surface::Overview, e.user_message()));
                ReloadOutcome::Failed(e)
            }
        }
    }

    fn lock_applied(&self) -> MutexGuard<'_, Applied> {
        self.applied.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// True while the session is live and nothing newer than `request_id`
    /// has been applied. Callers hold the `applied` lock.
    fn is_current(&self, applied: &Applied, request_id: u64) -> bool {
        if !self.session.is_authenticated() {
            tracing::debug!(request_id, "Discarding response received after logout");
            return false;
        }
        if applied.request_id >= request_id {
            tracing::debug!(
                request_id,
                newest = applied.request_id,
                "Discarding stale response"
            );
            return false;
        }
        true
    }

    /// Swap in the response to `request_id` and render it, unless it is stale.
    fn commit(&self, request_id: u64, response: TelemetryResponse) -> bool {
        let mut applied = self.lock_applied();
        if !self.is_current(&applied, request_id) {
            return false;
        }
        applied.request_id = request_id;
        let snapshot = applied.snapshot.insert(DashboardSnapshot::from(response));
        self.render_snapshot(snapshot);
        true
    }

    fn render_snapshot(&self, snapshot: &DashboardSnapshot) {
        self.renderer.render_overview(&snapshot.overview());
        for chart in telemetry_charts(&snapshot.series) {
            self.charts.render(&chart);
        }
    }

    async fn load_analytics(&self, window: u32) -> bool {
        match self.api.analytics(window).await {
            Ok(analytics) => {
                self.renderer.render_analytics(&analytics);
                for chart in analytics_charts(&analytics) {
                    self.charts.render(&chart);
                }
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Analytics load failed");
                self.renderer
                    .render_notice(&Notice::error(Surface::Analytics, e.user_message()));
                false
            }
        }
    }

    async fn load_insights(&self, window: u32) -> bool {
        match self.api.insights(window).await {
            Ok(insights) => {
                self.renderer
                    .render_insights(&InsightsPanel::from_insights(&insights));
                self.charts.render(&hourly_trend_chart(&insights));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Insights load failed");
                self.renderer
                    .render_notice(&Notice::error(Surface::Insights, e.user_message()));
                false
            }
        }
    }

    async fn load_login_history(&self) -> bool {
        let view = match self.api.login_history(self.history_limit).await {
            Ok(history) => LoginHistoryView::from_records(&history.logins),
            Err(e) => {
                tracing::warn!(error = %e, "Login history load failed");
                LoginHistoryView::Unavailable(e.user_message())
            }
        };
        let loaded = !matches!(view, LoginHistoryView::Unavailable(_));
        self.renderer.render_login_history(&view);
        loaded
    }

    async fn load_options(&self) -> Result<FilterOptions, ApiError> {
        match self.api.options().await {
            Ok(options) => {
                let seeded = self
                    .filters
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .seed_date_range(&options.date_range.min, &options.date_range.max);
                if seeded {
                    tracing::debug!(
                        min = %options.date_range.min,
                        max = %options.date_range.max,
                        "Seeded date range from backend"
                    );
                }
                self.renderer.render_filter_options(&options);
                Ok(options)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Filter options load failed");
                self.renderer
                    .render_notice(&Notice::error(Surface::Filters, e.user_message()));
                Err(e)
            }
        }
    }

    fn show_dashboard(&self, session: &Session) {
        self.renderer
            .show_dashboard(session, &Tab::visible_for(session));
    }
}

/// Coordinates the session, filters, fetches, rendering and auto-refresh.
pub struct Dashboard {
    core: Arc<DashboardCore>,
    refresh: Mutex<RefreshController>,
    refresh_on_login: bool,
}

impl Dashboard {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        storage: Box<dyn SessionStorage>,
        renderer: Arc<dyn ViewRenderer>,
        charts: Arc<dyn ChartSink>,
        config: &SentinelConfig,
    ) -> Self {
        let initial_filters = FilterCriteria::from(&config.filters);
        let core = Arc::new(DashboardCore {
            session: SessionStore::new(Arc::clone(&api), storage),
            api,
            filters: Mutex::new(FilterState::new(initial_filters.clone())),
            initial_filters,
            renderer,
            charts,
            applied: Mutex::new(Applied::default()),
            active_tab: RwLock::new(Tab::Overview),
            issued: AtomicU64::new(0),
            history_limit: config.history.limit,
        });

        let tick_core = Arc::clone(&core);
        let trigger: ReloadTrigger = Arc::new(move || {
            let core = Arc::clone(&tick_core);
            Box::pin(async move {
                core.reload().await;
            })
        });

        Self {
            core,
            refresh: Mutex::new(RefreshController::new(
                trigger,
                config.refresh.interval_seconds,
            )),
            refresh_on_login: config.refresh.enabled,
        }
    }

    /// Restore a persisted session and show the matching initial view.
    pub async fn start(&self) -> Option<Session> {
        match self.core.session.restore() {
            Some(session) => {
                self.enter(&session).await;
                Some(session)
            }
            None => {
                self.core.renderer.show_login(None);
                None
            }
        }
    }

    /// Authenticate; on failure the login view shows the error inline.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, DashboardError> {
        match self.core.session.login(username, password).await {
            Ok(session) => {
                self.enter(&session).await;
                Ok(session)
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "Login failed");
                self.core.renderer.show_login(Some(&e.to_string()));
                Err(e.into())
            }
        }
    }

    async fn enter(&self, session: &Session) {
        self.core.show_dashboard(session);
        // Seed the date range before the first /data request uses it
        let _ = self.core.load_options().await;
        self.core.reload().await;
        if self.refresh_on_login {
            self.lock_refresh().enable();
        }
    }

    /// End the session: stop refreshing, drop state, show the login view.
    pub fn logout(&self) {
        self.lock_refresh().disable();

        {
            // Responses to anything already in flight are stale from here on
            let mut applied = self.core.lock_applied();
            applied.request_id = applied
                .request_id
                .max(self.core.issued.load(Ordering::SeqCst));
            applied.snapshot = None;
            self.core.session.logout();
        }
        *self
            .core
            .filters
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = FilterState::new(self.core.initial_filters.clone());
        *self
            .core
            .active_tab
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Tab::Overview;

        self.core.renderer.show_login(None);
    }

    /// Fetch `/data` with the current filters and render the result.
    pub async fn reload(&self) -> ReloadOutcome {
        self.core.reload().await
    }

    /// Apply a filter change and reload once.
    pub async fn update_filters(&self, update: FilterUpdate) -> FilterCriteria {
        let criteria = self
            .core
            .filters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .update(update);
        tracing::debug!(?criteria, "Filters updated");
        self.core.reload().await;
        criteria
    }

    /// Switch tabs and render the tab's content.
    pub async fn switch_tab(&self, tab: Tab) -> Result<(), DashboardError> {
        let session = self
            .core
            .session
            .current()
            .ok_or(DashboardError::NotAuthenticated)?;
        if !tab.visible_to(&session) {
            return Err(DashboardError::TabNotPermitted(tab));
        }

        *self
            .core
            .active_tab
            .write()
            .unwrap_or_else(|e| e.into_inner()) = tab;

        let window = self.core.criteria().window;
        match tab {
            Tab::Overview => {
                let shown = match self.core.lock_applied().snapshot.as_ref() {
                    Some(snapshot) => {
                        self.core.render_snapshot(snapshot);
                        true
                    }
                    None => false,
                };
                if !shown {
                    self.core.reload().await;
                }
            }
            Tab::Analytics => {
                self.core.load_analytics(window).await;
            }
            Tab::Insights => {
                self.core.load_insights(window).await;
            }
            Tab::LoginHistory => {
                self.core.load_login_history().await;
            }
        }
        Ok(())
    }

    /// Fetch `/options`, seed unset dates and populate the filter controls.
    pub async fn load_options(&self) -> Result<FilterOptions, ApiError> {
        self.core.load_options().await
    }

    pub async fn load_analytics(&self) -> bool {
        let window = self.core.criteria().window;
        self.core.load_analytics(window).await
    }

    pub async fn load_insights(&self) -> bool {
        let window = self.core.criteria().window;
        self.core.load_insights(window).await
    }

    /// Admin only.
    pub async fn load_login_history(&self) -> Result<bool, DashboardError> {
        let session = self
            .core
            .session
            .current()
            .ok_or(DashboardError::NotAuthenticated)?;
        if !session.is_admin() {
            return Err(DashboardError::TabNotPermitted(Tab::LoginHistory));
        }
        Ok(self.core.load_login_history().await)
    }

    /// Start auto-refresh every `interval_seconds`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enable_auto_refresh(&self, interval_seconds: u64) -> Result<(), DashboardError> {
        if !self.core.session.is_authenticated() {
            return Err(DashboardError::NotAuthenticated);
        }
        let mut refresh = self.lock_refresh();
        refresh.set_interval(interval_seconds);
        refresh.enable();
        Ok(())
    }

    pub fn disable_auto_refresh(&self) {
        self.lock_refresh().disable();
    }

    /// Change the interval; a running timer is rescheduled.
    pub fn set_refresh_interval(&self, interval_seconds: u64) {
        self.lock_refresh().set_interval(interval_seconds);
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.lock_refresh().state()
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.lock_refresh().policy()
    }

    pub fn snapshot(&self) -> Option<DashboardSnapshot> {
        self.core.lock_applied().snapshot.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.core.session.current()
    }

    /// Tabs the current session may open; none when logged out.
    pub fn visible_tabs(&self) -> Vec<Tab> {
        self.session()
            .map(|s| Tab::visible_for(&s))
            .unwrap_or_default()
    }

    pub fn active_tab(&self) -> Tab {
        *self
            .core
            .active_tab
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub fn filters(&self) -> FilterCriteria {
        self.core.criteria()
    }

    pub fn api(&self) -> Arc<dyn DashboardApi> {
        Arc::clone(&self.core.api)
    }

    fn lock_refresh(&self) -> std::sync::MutexGuard<'_, RefreshController> {
        self.refresh.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AnalyticsPayload, BackendHealth, Insights, LoginHistory, LoginResponse};
    use crate::api::UserLoginStats;
    use crate::session::{MemorySessionStorage, Role};
    use crate::view::Chart;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::mpsc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn response(cpu: f64) -> TelemetryResponse {
        serde_json::from_value(json!({
            "latest": {
                "timestamp": "2024-03-01 12:00:00",
                "cpu_usage": cpu,
                "memory_usage": 4.0,
                "response_time": 200.0,
                "failure_probability": 0.1,
                "alert_status": "OK"
            },
            "statistics": {"alerts_count": 0, "ok_count": 1, "anomalies_count": 0},
            "data": []
        }))
        .unwrap()
    }

    /// Hands out `/data` responses in order, each gated on a oneshot.
    #[derive(Default)]
    struct GatedApi {
        gates: Mutex<VecDeque<oneshot::Receiver<TelemetryResponse>>>,
    }

    #[async_trait]
    impl DashboardApi for GatedApi {
        async fn login(&self, username: &str, _: &str) -> Result<LoginResponse, ApiError> {
            Ok(LoginResponse {
                username: username.to_string(),
                role: "USER".to_string(),
            })
        }
        async fn options(&self) -> Result<FilterOptions, ApiError> {
            Ok(FilterOptions::default())
        }
        async fn data(&self, _: &FilterCriteria) -> Result<TelemetryResponse, ApiError> {
            let gate = self.gates.lock().unwrap().pop_front();
            match gate {
                Some(rx) => rx
                    .await
                    .map_err(|e| ApiError::Connectivity(e.to_string())),
                None => Err(ApiError::Connectivity("no response queued".to_string())),
            }
        }
        async fn analytics(&self, _: u32) -> Result<AnalyticsPayload, ApiError> {
            Ok(AnalyticsPayload::default())
        }
        async fn insights(&self, _: u32) -> Result<Insights, ApiError> {
            Ok(Insights::default())
        }
        async fn login_history(&self, _: u32) -> Result<LoginHistory, ApiError> {
            Ok(LoginHistory::default())
        }
        async fn login_stats(&self) -> Result<BTreeMap<String, UserLoginStats>, ApiError> {
            Ok(BTreeMap::new())
        }
        async fn health(&self) -> Result<BackendHealth, ApiError> {
            Err(ApiError::Connectivity("unused".to_string()))
        }
    }

    struct Silent;

    impl ViewRenderer for Silent {
        fn show_login(&self, _: Option<&str>) {}
        fn show_dashboard(&self, _: &Session, _: &[Tab]) {}
        fn render_filter_options(&self, _: &FilterOptions) {}
        fn render_overview(&self, _: &OverviewView) {}
        fn render_analytics(&self, _: &AnalyticsPayload) {}
        fn render_insights(&self, _: &InsightsPanel) {}
        fn render_login_history(&self, _: &LoginHistoryView) {}
        fn render_notice(&self, _: &Notice) {}
    }

    impl ChartSink for Silent {
        fn render(&self, _: &Chart) {}
    }

    /// Records overview CPU values and notices. When armed, the first
    /// overview render reports that it started and then waits for release.
    #[derive(Default)]
    struct Recorder {
        entered: Mutex<Option<mpsc::Sender<()>>>,
        release: Mutex<Option<mpsc::Receiver<()>>>,
        overviews: Mutex<Vec<String>>,
        notices: Mutex<Vec<Notice>>,
    }

    impl Recorder {
        /// Returns the recorder, a receiver for "render started" and a
        /// sender that lets the render finish.
        fn armed() -> (Arc<Self>, mpsc::Receiver<()>, mpsc::Sender<()>) {
            let (entered_tx, entered_rx) = mpsc::channel();
            let (release_tx, release_rx) = mpsc::channel();
            let recorder = Self {
                entered: Mutex::new(Some(entered_tx)),
                release: Mutex::new(Some(release_rx)),
                ..Default::default()
            };
            (Arc::new(recorder), entered_rx, release_tx)
        }

        fn overviews(&self) -> Vec<String> {
            self.overviews.lock().unwrap().clone()
        }

        fn notices(&self) -> Vec<Notice> {
            self.notices.lock().unwrap().clone()
        }
    }

    impl ViewRenderer for Recorder {
        fn show_login(&self, _: Option<&str>) {}
        fn show_dashboard(&self, _: &Session, _: &[Tab]) {}
        fn render_filter_options(&self, _: &FilterOptions) {}
        fn render_overview(&self, view: &OverviewView) {
            let entered = self.entered.lock().unwrap().take();
            if let Some(entered) = entered {
                entered.send(()).unwrap();
                let release = self.release.lock().unwrap().take();
                if let Some(release) = release {
                    release.recv().unwrap();
                }
            }
            let cpu = view.kpis.get("CPU Usage").unwrap().value.clone();
            self.overviews.lock().unwrap().push(cpu);
        }
        fn render_analytics(&self, _: &AnalyticsPayload) {}
        fn render_insights(&self, _: &InsightsPanel) {}
        fn render_login_history(&self, _: &LoginHistoryView) {}
        fn render_notice(&self, notice: &Notice) {
            self.notices.lock().unwrap().push(notice.clone());
        }
    }

    impl ChartSink for Recorder {
        fn render(&self, _: &Chart) {}
    }

    fn dashboard_with<R>(api: Arc<GatedApi>, renderer: Arc<R>) -> Dashboard
    where
        R: ViewRenderer + ChartSink + 'static,
    {
        let storage = MemorySessionStorage::new();
        storage.save(&Session::new("user".to_string(), Role::User)).unwrap();
        Dashboard::new(
            api,
            Box::new(storage),
            renderer.clone(),
            renderer,
            &SentinelConfig::default(),
        )
    }

    fn dashboard(api: Arc<GatedApi>) -> Dashboard {
        dashboard_with(api, Arc::new(Silent))
    }

    /// Wait on a std channel without blocking the test's runtime thread.
    async fn wait_for(rx: mpsc::Receiver<()>) {
        tokio::task::spawn_blocking(move || rx.recv())
            .await
            .unwrap()
            .unwrap();
    }

    fn queue(api: &GatedApi) -> oneshot::Sender<TelemetryResponse> {
        let (tx, rx) = oneshot::channel();
        api.gates.lock().unwrap().push_back(rx);
        tx
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let api = Arc::new(GatedApi::default());
        let dashboard = dashboard(Arc::clone(&api));
        assert!(dashboard.core.session.restore().is_some());

        let first = queue(&api);
        let second = queue(&api);

        let older = dashboard.reload();
        let newer = async {
            second.send(response(20.0)).unwrap();
            let outcome = dashboard.reload().await;
            first.send(response(10.0)).unwrap();
            outcome
        };
        let (older, newer) = tokio::join!(older, newer);

        assert_eq!(newer, ReloadOutcome::Applied);
        assert_eq!(older, ReloadOutcome::Discarded);
        assert_eq!(dashboard.snapshot().unwrap().latest.cpu_usage, 20.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_older_response_rendering_slowly_does_not_win() {
        let api = Arc::new(GatedApi::default());
        let (recorder, entered, release) = Recorder::armed();
        let dashboard = Arc::new(dashboard_with(Arc::clone(&api), Arc::clone(&recorder)));
        dashboard.core.session.restore();

        let first = queue(&api);
        let second = queue(&api);

        let older = tokio::spawn({
            let dashboard = Arc::clone(&dashboard);
            async move { dashboard.reload().await }
        });
        first.send(response(10.0)).unwrap();
        // Request 1 is now inside render_overview
        wait_for(entered).await;

        let newer = tokio::spawn({
            let dashboard = Arc::clone(&dashboard);
            async move { dashboard.reload().await }
        });
        second.send(response(20.0)).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        release.send(()).unwrap();

        assert_eq!(older.await.unwrap(), ReloadOutcome::Applied);
        assert_eq!(newer.await.unwrap(), ReloadOutcome::Applied);
        assert_eq!(dashboard.snapshot().unwrap().latest.cpu_usage, 20.0);
        assert_eq!(recorder.overviews(), vec!["10.0%", "20.0%"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_logout_during_render_leaves_no_snapshot() {
        let api = Arc::new(GatedApi::default());
        let (recorder, entered, release) = Recorder::armed();
        let dashboard = Arc::new(dashboard_with(Arc::clone(&api), recorder));
        dashboard.core.session.restore();

        let gate = queue(&api);
        let pending = tokio::spawn({
            let dashboard = Arc::clone(&dashboard);
            async move { dashboard.reload().await }
        });
        gate.send(response(30.0)).unwrap();
        wait_for(entered).await;

        let logout = tokio::task::spawn_blocking({
            let dashboard = Arc::clone(&dashboard);
            move || dashboard.logout()
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        release.send(()).unwrap();

        assert_eq!(pending.await.unwrap(), ReloadOutcome::Applied);
        logout.await.unwrap();
        assert!(dashboard.snapshot().is_none());
        assert!(dashboard.session().is_none());
    }

    #[tokio::test]
    async fn test_stale_failure_shows_no_notice() {
        let api = Arc::new(GatedApi::default());
        let recorder = Arc::new(Recorder::default());
        let dashboard = dashboard_with(Arc::clone(&api), Arc::clone(&recorder));
        dashboard.core.session.restore();

        let first = queue(&api);
        let second = queue(&api);

        let older = dashboard.reload();
        let newer = async {
            second.send(response(20.0)).unwrap();
            let outcome = dashboard.reload().await;
            // Dropping the gate fails request 1 with a connectivity error
            drop(first);
            outcome
        };
        let (older, newer) = tokio::join!(older, newer);

        assert_eq!(newer, ReloadOutcome::Applied);
        assert_eq!(older, ReloadOutcome::Discarded);
        assert!(recorder.notices().is_empty());
        assert_eq!(dashboard.snapshot().unwrap().latest.cpu_usage, 20.0);
    }

    #[tokio::test]
    async fn test_current_failure_shows_overview_notice() {
        let api = Arc::new(GatedApi::default());
        let recorder = Arc::new(Recorder::default());
        let dashboard = dashboard_with(Arc::clone(&api), Arc::clone(&recorder));
        dashboard.core.session.restore();

        assert!(matches!(dashboard.reload().await, ReloadOutcome::Failed(_)));
        let notices = recorder.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].surface, Surface::Overview);
    }

    #[tokio::test]
    async fn test_response_after_logout_is_discarded() {
        let api = Arc::new(GatedApi::default());
        let dashboard = dashboard(Arc::clone(&api));
        dashboard.core.session.restore();

        let gate = queue(&api);
        let pending = dashboard.reload();
        let logout = async {
            dashboard.logout();
            gate.send(response(50.0)).unwrap();
        };
        let (outcome, _) = tokio::join!(pending, logout);

        assert_eq!(outcome, ReloadOutcome::Discarded);
        assert!(dashboard.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_reload_without_session_is_skipped() {
        let api = Arc::new(GatedApi::default());
        let dashboard = Dashboard::new(
            api,
            Box::new(MemorySessionStorage::new()),
            Arc::new(Silent),
            Arc::new(Silent),
            &SentinelConfig::default(),
        );
        assert_eq!(dashboard.reload().await, ReloadOutcome::Skipped);
        assert!(dashboard.visible_tabs().is_empty());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_snapshot() {
        let api = Arc::new(GatedApi::default());
        let dashboard = dashboard(Arc::clone(&api));
        dashboard.core.session.restore();

        queue(&api).send(response(33.0)).unwrap();
        assert_eq!(dashboard.reload().await, ReloadOutcome::Applied);

        // Nothing queued: the fake reports a connectivity failure
        assert!(matches!(
            dashboard.reload().await,
            ReloadOutcome::Failed(ApiError::Connectivity(_))
        ));
        assert_eq!(dashboard.snapshot().unwrap().latest.cpu_usage, 33.0);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_switch_to_login_history() {
        let api = Arc::new(GatedApi::default());
        let dashboard = dashboard(api);
        dashboard.core.session.restore();

        let err = dashboard.switch_tab(Tab::LoginHistory).await.unwrap_err();
        assert!(matches!(err, DashboardError::TabNotPermitted(Tab::LoginHistory)));
        assert_eq!(dashboard.active_tab(), Tab::Overview);
    }

    #[tokio::test]
    async fn test_auto_refresh_requires_session() {
        let api = Arc::new(GatedApi::default());
        let dashboard = Dashboard::new(
            api,
            Box::new(MemorySessionStorage::new()),
            Arc::new(Silent),
            Arc::new(Silent),
            &SentinelConfig::default(),
        );
        assert!(matches!(
            dashboard.enable_auto_refresh(5),
            Err(DashboardError::NotAuthenticated)
        ));
        assert_eq!(dashboard.refresh_state(), RefreshState::Stopped);
    }
}
