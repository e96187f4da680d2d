use std::sync::Arc;

use shared::{
    domain::{NewParticipant, Participant, ParticipantId},
    error::ScoreboardError,
};
use tracing::{error, info, warn};

use crate::{events::ScoreboardEvent, snapshot::SnapshotStore};

pub const MISSING_FIELDS_MESSAGE: &str = "Please enter both participant name and project ID.";
pub const REGISTERED_MESSAGE: &str = "Registered successfully.";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred.";

/// Outcome text shown under the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMessage {
    Success(String),
    Failure(String),
}

impl FormMessage {
    pub fn text(&self) -> &str {
        match self {
            FormMessage::Success(text) | FormMessage::Failure(text) => text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FormMessage::Success(_))
    }
}

/// Failure text for the user, falling back when the server said nothing.
pub fn failure_text(err: &ScoreboardError) -> String {
    let message = err.user_message().trim();
    if message.is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message.to_string()
    }
}

/// Adds and removes participants, then brings the board up to date.
///
/// Each successful mutation is followed by exactly one snapshot fetch; a
/// failed one by none.
pub struct RegistrationController {
    store: Arc<SnapshotStore>,
}

impl RegistrationController {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    pub async fn add_participant(
        &self,
        name: &str,
        project_id: &str,
    ) -> Result<Participant, ScoreboardError> {
        let (name, project_id) = (name.trim(), project_id.trim());
        if name.is_empty() || project_id.is_empty() {
            return Err(ScoreboardError::validation(MISSING_FIELDS_MESSAGE));
        }

        let request = NewParticipant {
            participant: name.to_string(),
            project: project_id.to_string(),
        };
        let created = self
            .store
            .api()
            .register_participant(&request)
            .await
            .inspect_err(|err| error!("registration: could not add participant: {err}"))?;
        info!(id = %created.id, project = %created.project, "registration: participant added");
        self.store
            .emit(ScoreboardEvent::ParticipantAdded(created.clone()));
        self.refresh_after_mutation().await;
        Ok(created)
    }

    /// `None` means the registry could not be reached, not that it is empty.
    pub async fn list_participants(&self) -> Option<Vec<Participant>> {
        match self.store.api().list_participants().await {
            Ok(participants) => Some(participants),
            Err(err) => {
                error!("registration: could not fetch participants: {err}");
                None
            }
        }
    }

    pub async fn delete_participant(&self, id: ParticipantId) -> Result<(), ScoreboardError> {
        self.store
            .api()
            .delete_participant(id)
            .await
            .inspect_err(|err| error!(%id, "registration: could not delete participant: {err}"))?;
        info!(%id, "registration: participant deleted");
        self.store.emit(ScoreboardEvent::ParticipantDeleted(id));
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Form submission: never fails, always yields a message to show.
    pub async fn submit(&self, name: &str, project_id: &str) -> FormMessage {
        match self.add_participant(name, project_id).await {
            Ok(_) => FormMessage::Success(REGISTERED_MESSAGE.to_string()),
            Err(err) => FormMessage::Failure(failure_text(&err)),
        }
    }

    async fn refresh_after_mutation(&self) {
        // The mutation already happened; a failed read only leaves the old board up.
        if let Err(err) = self.store.fetch_scores().await {
            warn!("registration: board refresh after mutation failed: {err}");
        }
    }
}

#[cfg(test)]
#[path = "tests/registration_tests.rs"]
mod tests;
