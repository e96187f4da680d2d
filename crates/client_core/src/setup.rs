//! Participant management area behind a shared-secret prompt.
//!
//! The gate is a UX deterrent only and protects nothing.

use std::sync::Arc;

use shared::{
    domain::{Participant, ParticipantId},
    error::ScoreboardError,
};
use tracing::warn;

use crate::registration::{failure_text, FormMessage, RegistrationController};

pub const INCORRECT_PASSWORD_MESSAGE: &str = "Incorrect password. Please try again.";
pub const DELETED_MESSAGE: &str = "Participant deleted.";

#[derive(Debug, Clone)]
pub struct SetupGate {
    secret: String,
}

/// Proof that the prompt was passed; required to open a [`SetupPage`].
#[derive(Debug)]
pub struct SetupAccess(());

impl SetupGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn unlock(&self, attempt: &str) -> Result<SetupAccess, ScoreboardError> {
        if attempt == self.secret {
            Ok(SetupAccess(()))
        } else {
            warn!("setup: rejected password attempt");
            Err(ScoreboardError::validation(INCORRECT_PASSWORD_MESSAGE))
        }
    }
}

pub struct SetupPage {
    registration: Arc<RegistrationController>,
    participants: Vec<Participant>,
    message: Option<FormMessage>,
}

impl SetupPage {
    pub fn new(_access: SetupAccess, registration: Arc<RegistrationController>) -> Self {
        Self {
            registration,
            participants: Vec::new(),
            message: None,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    /// Reloads the list; a failed load keeps what was shown before.
    pub async fn reload(&mut self) -> bool {
        match self.registration.list_participants().await {
            Some(participants) => {
                self.participants = participants;
                true
            }
            None => false,
        }
    }

    pub async fn delete(&mut self, id: ParticipantId) -> &FormMessage {
        let message = match self.registration.delete_participant(id).await {
            Ok(()) => {
                self.reload().await;
                FormMessage::Success(DELETED_MESSAGE.to_string())
            }
            Err(err) => FormMessage::Failure(failure_text(&err)),
        };
        self.message.insert(message)
    }
}

#[cfg(test)]
#[path = "tests/setup_tests.rs"]
mod tests;
