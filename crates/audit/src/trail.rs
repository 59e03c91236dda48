//! Audit trail - ordered events for one report invocation

use crate::error::{AuditError, AuditResult};
use chrono::{DateTime, Utc};
use dhamma_compliance::{CheckStatus, ComplianceResult, ControlCheck};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum AuditCategory {
    SecurityCheck,
    DataProtectionCheck,
    ComplianceRun,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub category: AuditCategory,
    pub description: String,
    pub verified: bool,
}

/// Event log owned by a single report invocation.
///
/// Sequence numbers start at 1 and increase by one per event.
#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    events: Vec<AuditEvent>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a verified event by category name (e.g. `"security-check"`)
    pub fn log_event(&mut self, category: &str, description: &str) -> AuditResult<&AuditEvent> {
        let category: AuditCategory = category
            .parse()
            .map_err(|_| AuditError::InvalidCategory(category.to_string()))?;
        Ok(self.log(category, description))
    }

    pub fn log(&mut self, category: AuditCategory, description: &str) -> &AuditEvent {
        self.log_outcome(category, description, true)
    }

    pub fn log_outcome(
        &mut self,
        category: AuditCategory,
        description: &str,
        verified: bool,
    ) -> &AuditEvent {
        let sequence = self.events.len() as u64 + 1;
        self.events.push(AuditEvent {
            sequence,
            timestamp: Utc::now(),
            category,
            description: description.to_string(),
            verified,
        });
        tracing::debug!(sequence, category = %category, verified, "Audit event logged");
        &self.events[self.events.len() - 1]
    }

    /// One event per check row; verified when the control is in place
    pub fn log_checks(&mut self, category: AuditCategory, checks: &[ControlCheck]) {
        for check in checks {
            let description = format!("{}: {}", check.name, check.details);
            self.log_outcome(category, &description, check.status == CheckStatus::Verified);
        }
    }

    /// One event per jurisdiction; verified when every requirement is compliant
    pub fn log_compliance(&mut self, results: &[ComplianceResult]) {
        for result in results {
            let description = format!(
                "{} {} scored {}%",
                result.region, result.jurisdiction, result.score
            );
            self.log_outcome(
                AuditCategory::ComplianceRun,
                &description,
                result.is_fully_compliant(),
            );
        }
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn verified_count(&self) -> usize {
        self.events.iter().filter(|e| e.verified).count()
    }
}
