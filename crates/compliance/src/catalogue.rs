//! Rule catalogue - jurisdictional standards and their requirements
//!
//! Loaded once from a declarative JSON document. Order in the document is the order of
//! audit results and of the rendered report.

use crate::error::{CatalogueResult, ComplianceError};
use crate::snapshot::Control;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_CATALOGUE: &str = include_str!("../catalogue/default.json");

/// One requirement and the control that satisfies it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub control: Control,
    /// Remediation advice shown when the requirement fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// One standard (e.g. HIPAA) within a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRule {
    /// Region grouping, e.g. "US" or "THAI"
    pub region: String,
    /// Short identifier, e.g. "HIPAA"
    pub jurisdiction: String,
    /// Full name of the standard
    pub name: String,
    pub requirements: Vec<Requirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCatalogue {
    rules: Vec<ComplianceRule>,
}

impl RuleCatalogue {
    pub fn new(rules: Vec<ComplianceRule>) -> CatalogueResult<Self> {
        let catalogue = Self { rules };
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// The embedded US / THAI catalogue
    pub fn builtin() -> CatalogueResult<Self> {
        Self::from_json(BUILTIN_CATALOGUE)
    }

    pub fn from_json(json: &str) -> CatalogueResult<Self> {
        let catalogue: Self = serde_json::from_str(json)?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// Load an operator-supplied catalogue
    pub fn from_file(path: impl AsRef<Path>) -> CatalogueResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let catalogue = Self::from_json(&content)?;
        tracing::info!(
            path = %path.as_ref().display(),
            rules = catalogue.rules.len(),
            "Rule catalogue loaded"
        );
        Ok(catalogue)
    }

    pub fn rules(&self) -> &[ComplianceRule] {
        &self.rules
    }

    fn validate(&self) -> CatalogueResult<()> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.region.trim().is_empty() || rule.jurisdiction.trim().is_empty() {
                return Err(ComplianceError::InvalidCatalogue(format!(
                    "rule '{}' needs a region and a jurisdiction",
                    rule.name
                )));
            }
            if !seen.insert((rule.region.as_str(), rule.jurisdiction.as_str())) {
                return Err(ComplianceError::InvalidCatalogue(format!(
                    "duplicate jurisdiction {} in region {}",
                    rule.jurisdiction, rule.region
                )));
            }
            if let Some(blank) = rule.requirements.iter().find(|r| r.name.trim().is_empty()) {
                return Err(ComplianceError::InvalidCatalogue(format!(
                    "{} has an unnamed requirement for control {}",
                    rule.jurisdiction, blank.control
                )));
            }
        }
        Ok(())
    }
}
