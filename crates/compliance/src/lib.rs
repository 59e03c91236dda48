//! DhammaShell Compliance Auditor
//!
//! Scores a [`SecurityStateSnapshot`] against a declarative catalogue of jurisdictional
//! requirements. Every requirement names the control that satisfies it; a requirement is
//! compliant exactly when that control's flag is set.
//!
//! The built-in catalogue covers US (HIPAA, GDPR) and THAI (PDPA, MOH) standards.

pub mod auditor;
pub mod catalogue;
pub mod error;
pub mod result;
pub mod snapshot;

pub use auditor::{data_protection_checks, run_audit, security_checks, DEFAULT_RECOMMENDATIONS};
pub use catalogue::{ComplianceRule, Requirement, RuleCatalogue};
pub use error::{CatalogueResult, ComplianceError};
pub use result::{CheckStatus, ComplianceResult, ControlCheck, RequirementResult, RequirementStatus};
pub use snapshot::{Control, SecurityStateSnapshot};
