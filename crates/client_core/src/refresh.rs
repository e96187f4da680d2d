//! Auto-refresh timer and the recompute-then-fetch cycle.

use std::{sync::Arc, time::Duration};

use shared::error::ScoreboardError;
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{error, info, warn};

use crate::{events::ScoreboardEvent, snapshot::SnapshotStore};

/// Fixed auto-refresh period.
pub const AUTO_REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// What happened during one refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub recompute: Result<(), ScoreboardError>,
    /// Number of entries in the new snapshot.
    pub fetch: Result<usize, ScoreboardError>,
}

impl CycleReport {
    pub fn snapshot_updated(&self) -> bool {
        self.fetch.is_ok()
    }
}

/// Trigger a recompute (best effort), then always read the scoreboard.
async fn refresh_cycle(store: &SnapshotStore) -> CycleReport {
    let recompute = store.api().trigger_recompute().await;
    match &recompute {
        Ok(()) => info!("refresh: backend rank update triggered"),
        Err(err) => {
            error!("refresh: failed to trigger rank update: {err}");
            store.emit(ScoreboardEvent::RecomputeFailed(err.to_string()));
        }
    }

    let fetch = store.fetch_scores().await.map(|snapshot| snapshot.len());
    CycleReport { recompute, fetch }
}

/// `timer` is `Some` exactly while auto-refresh is active, so there is never
/// more than one live ticker.
#[derive(Debug, Default)]
struct RefreshState {
    timer: Option<JoinHandle<()>>,
}

/// Single authority over periodic refresh.
///
/// Lifecycle is create, start/stop (or toggle), dispose. Dropping the
/// controller cancels the timer.
pub struct RefreshController {
    store: Arc<SnapshotStore>,
    state: RefreshState,
}

impl RefreshController {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self {
            store,
            state: RefreshState::default(),
        }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    pub fn is_active(&self) -> bool {
        self.state.timer.is_some()
    }

    pub async fn fetch_scores(&self) -> Result<(), ScoreboardError> {
        self.store.fetch_scores().await.map(|_| ())
    }

    pub async fn run_refresh_cycle(&self) -> CycleReport {
        refresh_cycle(&self.store).await
    }

    /// One cycle regardless of auto-refresh state.
    pub async fn manual_update(&self) -> CycleReport {
        info!("refresh: manual update requested");
        self.run_refresh_cycle().await
    }

    pub fn toggle_auto_refresh(&mut self) {
        if self.is_active() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Runs a cycle right away and then one every [`AUTO_REFRESH_PERIOD`].
    ///
    /// The immediate cycle is detached from the ticker and completes even if
    /// auto-refresh is switched off again before it runs. Must be called from
    /// within a tokio runtime. No-op when already active.
    pub fn start(&mut self) {
        if self.is_active() {
            return;
        }

        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let report = refresh_cycle(&store).await;
            if let Err(err) = report.fetch {
                warn!("refresh: initial auto-refresh cycle failed: {err}");
            }
        });

        let store = Arc::clone(&self.store);
        let handle = tokio::spawn(async move {
            let first_tick = Instant::now() + AUTO_REFRESH_PERIOD;
            let mut ticker = time::interval_at(first_tick, AUTO_REFRESH_PERIOD);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let report = refresh_cycle(&store).await;
                if let Err(err) = report.fetch {
                    warn!("refresh: scheduled cycle missed, schedule continues: {err}");
                }
            }
        });
        self.state.timer = Some(handle);
        info!(
            period_secs = AUTO_REFRESH_PERIOD.as_secs(),
            "refresh: auto-refresh started"
        );
        self.store.emit(ScoreboardEvent::AutoRefreshChanged(true));
    }

    /// Cancels the ticker along with any scheduled cycle it has in flight.
    pub fn stop(&mut self) {
        if let Some(handle) = self.state.timer.take() {
            handle.abort();
            info!("refresh: auto-refresh stopped");
            self.store.emit(ScoreboardEvent::AutoRefreshChanged(false));
        }
    }

    pub fn dispose(mut self) {
        self.stop();
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        if let Some(handle) = self.state.timer.take() {
            handle.abort();
            info!("refresh: cleaned up auto-refresh timer on teardown");
        }
    }
}

#[cfg(test)]
#[path = "tests/refresh_tests.rs"]
mod tests;
