//! Compliance errors

use thiserror::Error;

/// Errors from loading a rule catalogue
#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("Invalid catalogue: {0}")]
    InvalidCatalogue(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type for catalogue operations
pub type CatalogueResult<T> = Result<T, ComplianceError>;
