//! Auto-refresh controller.
//!
//! Owns at most one repeating timer. Each tick starts the reload trigger as
//! an independent task and does not wait for it, so a slow reload never
//! delays or swallows the next tick.
//!
//! ```text
//! Stopped --enable--> Running --disable--> Stopped
//!                     Running --set_interval--> Running (old timer cancelled first)
//! ```

use futures::future::BoxFuture;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Work started on every tick.
pub type ReloadTrigger = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Whether auto-refresh is on and how often it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshPolicy {
    pub enabled: bool,
    pub interval_seconds: u64,
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    Stopped,
    Running,
}

struct ActiveTimer {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ActiveTimer {
    fn stop(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// Cancellable repeating timer driving dashboard reloads.
pub struct RefreshController {
    trigger: ReloadTrigger,
    interval_seconds: u64,
    timer: Option<ActiveTimer>,
    ticks: Arc<AtomicU64>,
}

impl RefreshController {
    /// Create a stopped controller. Intervals below one second are raised to one.
    pub fn new(trigger: ReloadTrigger, interval_seconds: u64) -> Self {
        Self {
            trigger,
            interval_seconds: interval_seconds.max(1),
            timer: None,
            ticks: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> RefreshState {
        if self.timer.is_some() {
            RefreshState::Running
        } else {
            RefreshState::Stopped
        }
    }

    pub fn policy(&self) -> RefreshPolicy {
        RefreshPolicy {
            enabled: self.timer.is_some(),
            interval_seconds: self.interval_seconds,
        }
    }

    /// Ticks fired since the controller was created
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Start ticking. A no-op when already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enable(&mut self) {
        if self.timer.is_some() {
            return;
        }
        self.timer = Some(self.spawn_timer());
        tracing::info!(interval_seconds = self.interval_seconds, "Auto-refresh started");
    }

    /// Stop ticking. No tick fires after this returns.
    pub fn disable(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
            tracing::info!("Auto-refresh stopped");
        }
    }

    /// Change the interval; a running timer is cancelled and rescheduled.
    pub fn set_interval(&mut self, interval_seconds: u64) {
        let interval_seconds = interval_seconds.max(1);
        self.interval_seconds = interval_seconds;

        if let Some(timer) = self.timer.take() {
            timer.stop();
            self.timer = Some(self.spawn_timer());
            tracing::info!(interval_seconds, "Auto-refresh rescheduled");
        } else {
            tracing::debug!(interval_seconds, "Auto-refresh interval updated while stopped");
        }
    }

    fn spawn_timer(&self) -> ActiveTimer {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let trigger = Arc::clone(&self.trigger);
        let ticks = Arc::clone(&self.ticks);
        let period = Duration::from_secs(self.interval_seconds);

        let handle = tokio::spawn(async move {
            // First tick one full period after enabling, like a browser interval
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let tick = ticks.fetch_add(1, Ordering::Relaxed) + 1;
                        tracing::debug!(tick, "Auto-refresh tick");
                        tokio::spawn(trigger());
                    }
                }
            }
        });

        ActiveTimer { cancel, handle }
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
    }
}
