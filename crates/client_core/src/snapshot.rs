use std::sync::Arc;

use shared::{domain::ScoreEntry, error::ScoreboardError};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use crate::{api::ScoreboardApi, events::ScoreboardEvent};

/// Scoreboard rows as of one successful fetch. Never patched in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<ScoreEntry>,
}

impl Snapshot {
    pub fn new(entries: Vec<ScoreEntry>) -> Self {
        Self { entries }
    }

    /// Rows in the order the backend sent them.
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owner of the shared "current snapshot" cell.
///
/// The cell only ever changes by swapping in a whole new `Arc<Snapshot>`, so a
/// reader holds either the old board or the new one.
pub struct SnapshotStore {
    api: Arc<dyn ScoreboardApi>,
    current: watch::Sender<Arc<Snapshot>>,
    events: broadcast::Sender<ScoreboardEvent>,
}

impl SnapshotStore {
    pub fn new(api: Arc<dyn ScoreboardApi>) -> Arc<Self> {
        let (current, _) = watch::channel(Arc::new(Snapshot::default()));
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            current,
            events,
        })
    }

    pub fn api(&self) -> &Arc<dyn ScoreboardApi> {
        &self.api
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.current.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ScoreboardEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: ScoreboardEvent) {
        let _ = self.events.send(event);
    }

    /// Reads the scoreboard and replaces the current snapshot on success.
    ///
    /// On failure the previous snapshot stays current.
    pub async fn fetch_scores(&self) -> Result<Arc<Snapshot>, ScoreboardError> {
        match self.api.fetch_scoreboard().await {
            Ok(entries) => {
                let snapshot = Arc::new(Snapshot::new(entries));
                self.current.send_replace(Arc::clone(&snapshot));
                info!(entries = snapshot.len(), "scoreboard: snapshot replaced");
                self.emit(ScoreboardEvent::SnapshotUpdated {
                    entries: snapshot.len(),
                });
                Ok(snapshot)
            }
            Err(err) => {
                warn!("scoreboard: fetch failed, keeping previous snapshot: {err}");
                self.emit(ScoreboardEvent::FetchFailed(err.to_string()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/snapshot_tests.rs"]
mod tests;
