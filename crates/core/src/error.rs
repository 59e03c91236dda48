//! Core domain errors

use thiserror::Error;

/// Errors raised when constructing core domain values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Metric {metric} out of range [0.0, 1.0]: {value}")]
    MetricOutOfRange { metric: &'static str, value: f64 },

    #[error("Invalid session id '{0}': expected YYYYMMDD_HHMMSS")]
    InvalidSessionId(String),

    #[error("Unknown assessment question: {0}")]
    UnknownQuestion(String),

    #[error("Invalid answer '{answer}' for {question_id}: expected an integer from 1 to 5")]
    InvalidAnswer { question_id: String, answer: String },

    #[error("Question {0} does not take follow-ups")]
    NotOpenEnded(String),

    #[error("Assessment {0} has no responses")]
    NoResponses(String),
}
