//! Error types for lesson automation.

use std::time::Duration;

/// All errors that can occur while driving a lesson.
#[derive(thiserror::Error, Debug)]
pub enum PilotError {
    #[error("Timed out after {}ms waiting for {what}", after.as_millis())]
    Timeout { what: String, after: Duration },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed lesson data: {0}")]
    MalformedLesson(String),

    #[error("Challenge {kind} has no answer to give: {reason}")]
    MissingAnswer { kind: &'static str, reason: String },

    /// The exercise catalog has grown beyond what the dispatcher handles.
    #[error("Unrecognized challenge type: {0}")]
    UnrecognizedChallenge(String),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

impl PilotError {
    /// Whether the session must halt instead of abandoning the current lesson.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PilotError::UnrecognizedChallenge(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PilotError::Timeout { .. })
    }

    pub fn timeout(what: impl Into<String>, after: Duration) -> Self {
        PilotError::Timeout {
            what: what.into(),
            after,
        }
    }
}

/// Convenience result type.
pub type PilotResult<T> = Result<T, PilotError>;
