//! Notifications published to UI and telemetry subscribers.

use shared::domain::{Participant, ParticipantId};

#[derive(Debug, Clone, PartialEq)]
pub enum ScoreboardEvent {
    /// A fetch succeeded and the current snapshot was replaced.
    SnapshotUpdated { entries: usize },
    /// The recompute trigger failed; the cycle still went on to fetch.
    RecomputeFailed(String),
    /// A fetch failed; the previous snapshot is still current.
    FetchFailed(String),
    AutoRefreshChanged(bool),
    ParticipantAdded(Participant),
    ParticipantDeleted(ParticipantId),
}
