//! Session recorder errors

use dhamma_core::SessionId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("Session {0} already exists for this clock second")]
    SessionCollision(SessionId),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session {id} is corrupt: {reason}")]
    SessionCorrupt { id: String, reason: String },

    #[error("Assessment not found: {0}")]
    AssessmentNotFound(String),

    #[error("Assessment {id} is corrupt: {reason}")]
    AssessmentCorrupt { id: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for recorder operations
pub type RecorderResult<T> = Result<T, RecorderError>;
