//! Audit outcome types

use crate::snapshot::Control;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    #[strum(serialize = "compliant")]
    Compliant,
    #[strum(serialize = "non-compliant")]
    NonCompliant,
}

impl RequirementStatus {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            Self::Compliant
        } else {
            Self::NonCompliant
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementResult {
    pub requirement: String,
    pub control: Control,
    pub status: RequirementStatus,
}

/// Outcome for one jurisdiction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub region: String,
    pub jurisdiction: String,
    pub name: String,
    pub requirements: Vec<RequirementResult>,
    /// Percentage of compliant requirements, two decimal places
    pub score: Decimal,
    pub recommendations: Vec<String>,
}

impl ComplianceResult {
    pub fn non_compliant(&self) -> impl Iterator<Item = &RequirementResult> {
        self.requirements
            .iter()
            .filter(|r| r.status == RequirementStatus::NonCompliant)
    }

    pub fn is_fully_compliant(&self) -> bool {
        self.non_compliant().next().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    #[strum(serialize = "verified")]
    Verified,
    #[strum(serialize = "not verified")]
    NotVerified,
}

/// One row of the security / data-protection sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlCheck {
    pub name: String,
    pub control: Control,
    pub status: CheckStatus,
    pub details: String,
}
