//! Refresh and synchronization core for the hackathon scoreboard client.
//!
//! [`RefreshController`] decides when the backend recomputes ranks and when
//! the board is re-read, [`ScoreboardView`] turns the current [`Snapshot`]
//! into a ranked page, and [`RegistrationController`] keeps the board in step
//! with participant changes.

pub mod api;
pub mod events;
pub mod refresh;
pub mod registration;
pub mod setup;
pub mod snapshot;
pub mod view;

use std::sync::Arc;

pub use api::{HttpScoreboardApi, ScoreboardApi};
pub use events::ScoreboardEvent;
pub use refresh::{CycleReport, RefreshController, AUTO_REFRESH_PERIOD};
pub use registration::{FormMessage, RegistrationController};
pub use setup::{SetupAccess, SetupGate, SetupPage};
pub use snapshot::{Snapshot, SnapshotStore};
pub use view::{Badge, Pager, RankedRow, ScoreboardPage, ScoreboardView, PAGE_SIZE};

/// The controllers wired around one shared snapshot cell.
pub struct ScoreboardClient {
    pub store: Arc<SnapshotStore>,
    pub refresh: RefreshController,
    pub registration: Arc<RegistrationController>,
}

impl ScoreboardClient {
    pub fn new(api: Arc<dyn ScoreboardApi>) -> Self {
        let store = SnapshotStore::new(api);
        Self {
            refresh: RefreshController::new(Arc::clone(&store)),
            registration: Arc::new(RegistrationController::new(Arc::clone(&store))),
            store,
        }
    }

    /// First read when the board opens; no recompute is requested.
    pub async fn initial_load(&self) -> Result<(), shared::error::ScoreboardError> {
        self.refresh.fetch_scores().await
    }

    pub fn render(&self, pager: &Pager) -> ScoreboardPage {
        ScoreboardView::render(&self.store.current(), pager)
    }

    /// Stops periodic work; the client is unusable afterwards.
    pub fn dispose(self) {
        self.refresh.dispose();
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
