//! Aggregator errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Recorder error: {0}")]
    Recorder(#[from] dhamma_recorder::RecorderError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
