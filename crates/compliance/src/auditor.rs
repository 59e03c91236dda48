//! Compliance scoring
//!
//! Pure functions of (catalogue, snapshot): running them twice on the same inputs yields
//! identical results.

use crate::catalogue::{ComplianceRule, RuleCatalogue};
use crate::result::{
    CheckStatus, ComplianceResult, ControlCheck, RequirementResult, RequirementStatus,
};
use crate::snapshot::{Control, SecurityStateSnapshot};
use rust_decimal::Decimal;

/// Maintenance recommendations included in every result
pub const DEFAULT_RECOMMENDATIONS: [&str; 3] = [
    "Maintain current security controls",
    "Continue regular security assessments",
    "Update documentation as needed",
];

/// Score every rule of the catalogue against the snapshot, in catalogue order
pub fn run_audit(
    catalogue: &RuleCatalogue,
    snapshot: &SecurityStateSnapshot,
) -> Vec<ComplianceResult> {
    let results: Vec<ComplianceResult> = catalogue
        .rules()
        .iter()
        .map(|rule| evaluate_rule(rule, snapshot))
        .collect();

    for result in &results {
        tracing::debug!(
            region = %result.region,
            jurisdiction = %result.jurisdiction,
            score = %result.score,
            "Jurisdiction scored"
        );
    }

    results
}

fn evaluate_rule(rule: &ComplianceRule, snapshot: &SecurityStateSnapshot) -> ComplianceResult {
    let requirements: Vec<RequirementResult> = rule
        .requirements
        .iter()
        .map(|req| RequirementResult {
            requirement: req.name.clone(),
            control: req.control,
            status: RequirementStatus::from_flag(snapshot.flag(req.control)),
        })
        .collect();

    let compliant = requirements
        .iter()
        .filter(|r| r.status == RequirementStatus::Compliant)
        .count();

    let mut recommendations: Vec<String> =
        DEFAULT_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect();
    recommendations.extend(
        rule.requirements
            .iter()
            .zip(&requirements)
            .filter(|(_, result)| result.status == RequirementStatus::NonCompliant)
            .map(|(req, _)| failing_control(&req.name, req.control, req.recommendation.as_deref())),
    );

    ComplianceResult {
        region: rule.region.clone(),
        jurisdiction: rule.jurisdiction.clone(),
        name: rule.name.clone(),
        score: score(compliant, requirements.len()),
        requirements,
        recommendations,
    }
}

fn failing_control(name: &str, control: Control, advice: Option<&str>) -> String {
    match advice {
        Some(advice) => format!("Address failing control: {} ({}). {}", name, control, advice),
        None => format!("Address failing control: {} ({})", name, control),
    }
}

/// `100 * compliant / total` at two decimal places; an empty list is fully compliant
fn score(compliant: usize, total: usize) -> Decimal {
    let mut score = if total == 0 {
        Decimal::ONE_HUNDRED
    } else {
        (Decimal::from(compliant as u64) * Decimal::ONE_HUNDRED / Decimal::from(total as u64))
            .round_dp(2)
    };
    score.rescale(2);
    score
}

/// Security rows: Encryption, Authentication, Access Logging
pub fn security_checks(snapshot: &SecurityStateSnapshot) -> Vec<ControlCheck> {
    vec![
        check(
            snapshot,
            "Encryption",
            Control::EncryptionAtRest,
            "Session data encrypted at rest",
            "Session data stored without encryption at rest",
        ),
        check(
            snapshot,
            "Authentication",
            Control::AuthenticationEnforced,
            "Authentication enforced for data access",
            "Authentication not enforced for data access",
        ),
        check(
            snapshot,
            "Access Logging",
            Control::AccessLogging,
            "Access to research data is logged",
            "Access to research data is not logged",
        ),
    ]
}

/// Data protection rows: Data Minimization, Retention Policy, Privacy Controls
pub fn data_protection_checks(snapshot: &SecurityStateSnapshot) -> Vec<ControlCheck> {
    vec![
        check(
            snapshot,
            "Data Minimization",
            Control::DataMinimization,
            "Only necessary data collected and processed",
            "Data collection exceeds stated research purpose",
        ),
        check(
            snapshot,
            "Retention Policy",
            Control::RetentionPolicy,
            "Data retention policy implemented",
            "No data retention policy in place",
        ),
        check(
            snapshot,
            "Privacy Controls",
            Control::ConsentManagement,
            "Privacy controls and consent management in place",
            "Consent management missing",
        ),
    ]
}

fn check(
    snapshot: &SecurityStateSnapshot,
    name: &str,
    control: Control,
    verified: &str,
    missing: &str,
) -> ControlCheck {
    let (status, details) = if snapshot.flag(control) {
        (CheckStatus::Verified, verified)
    } else {
        (CheckStatus::NotVerified, missing)
    };
    ControlCheck {
        name: name.to_string(),
        control,
        status,
        details: details.to_string(),
    }
}
