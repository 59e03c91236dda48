//! Analyzer errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
