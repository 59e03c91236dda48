//! DhammaShell Audit Trail Signer
//!
//! - [`AuditTrail`]: per-invocation event log with strictly increasing sequence numbers
//! - [`ReportSigner`]: renders the compliance report body and signs its exact bytes
//! - [`SignedReport`]: immutable rendered report, verifiable and persistable

pub mod error;
pub mod report;
pub mod signer;
pub mod trail;

pub use error::AuditError;
pub use report::{ReportMetadata, ReportSigner, SignedReport};
pub use signer::{verify_signature, Signer, SystemSigner};
pub use trail::{AuditCategory, AuditEvent, AuditTrail};
