//! Audit errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Invalid audit category: {0}")]
    InvalidCategory(String),

    #[error("Signature mismatch: {0}")]
    SignatureMismatch(String),

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Malformed report: {0}")]
    MalformedReport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AuditResult<T> = Result<T, AuditError>;
