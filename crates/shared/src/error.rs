use thiserror::Error;

/// Failures surfaced by every remote call site.
///
/// None of these are fatal to the board: callers render them as inline text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreboardError {
    /// Transport failure, or a non-2xx status without a usable `{message}` body.
    #[error("{0}")]
    Network(String),
    /// A required field was empty; raised before any request is sent.
    #[error("{0}")]
    Validation(String),
    /// The server rejected the request and said why.
    #[error("{message}")]
    Conflict { status: u16, message: String },
}

impl ScoreboardError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Text shown to the user; for conflicts this is the server message verbatim.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(message) | Self::Validation(message) => message,
            Self::Conflict { message, .. } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Conflict { status, .. } => Some(*status),
            _ => None,
        }
    }
}
