//! Signed compliance audit report
//!
//! The body is rendered in a fixed layout and signed byte-for-byte. The saved document is
//! the body, a blank line, then `Digital Signature: <hex>`.

use crate::error::{AuditError, AuditResult};
use crate::signer::{verify_signature, Signer};
use crate::trail::AuditTrail;
use chrono::{DateTime, NaiveDateTime, Utc};
use dhamma_compliance::{ComplianceResult, ControlCheck};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const TITLE: &str = "DhammaShell Compliance Audit Report";
const SIGNATURE_MARKER: &str = "\n\nDigital Signature: ";
const GENERATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Static report metadata from configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub confidence_level: f64,
    pub sigma_level: u32,
}

impl ReportMetadata {
    pub fn new(confidence_level: f64, sigma_level: u32) -> Self {
        Self {
            generated_at: Utc::now(),
            confidence_level,
            sigma_level,
        }
    }
}

/// A rendered, signed report. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedReport {
    /// `None` when a parsed document has no readable `Generated:` line
    generated_at: Option<DateTime<Utc>>,
    body: String,
    signature: String,
}

impl SignedReport {
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
    }

    /// SHA-256 of the body, hex-encoded
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.body.as_bytes()))
    }

    /// Full document: body, blank line, signature line
    pub fn render(&self) -> String {
        format!("{}{}{}", self.body, SIGNATURE_MARKER, self.signature)
    }

    /// Recover body and signature from a saved document.
    ///
    /// Only a missing signature line is an error. A damaged body still parses so that
    /// verification can reject it.
    pub fn parse(text: &str) -> AuditResult<Self> {
        let (body, signature) = text
            .rsplit_once(SIGNATURE_MARKER)
            .ok_or_else(|| AuditError::MalformedReport("missing digital signature".to_string()))?;

        let generated_at = body
            .lines()
            .find_map(|line| line.strip_prefix("Generated: "))
            .and_then(|generated| NaiveDateTime::parse_from_str(generated, GENERATED_FORMAT).ok())
            .map(|at| at.and_utc());

        Ok(Self {
            generated_at,
            body: body.to_string(),
            signature: signature.trim_end().to_string(),
        })
    }

    /// File name under which the report is saved
    pub fn file_name(&self) -> String {
        match self.generated_at {
            Some(at) => format!("audit_report_{}.txt", at.format("%Y%m%d_%H%M%S")),
            None => format!("audit_report_{}.txt", &self.digest()[..16]),
        }
    }

    /// Write the rendered document into `dir` atomically
    pub fn save(&self, dir: impl AsRef<Path>) -> AuditResult<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(self.file_name());
        let tmp_path = dir.join(format!(".{}.tmp", self.file_name()));

        let write_result = (|| -> std::io::Result<()> {
            let mut tmp_file = File::create(&tmp_path)?;
            tmp_file.write_all(self.render().as_bytes())?;
            tmp_file.sync_all()?;
            drop(tmp_file);
            fs::rename(&tmp_path, &path)
        })();

        if let Err(e) = write_result {
            let _ = fs::remove_file(&tmp_path);
            return Err(AuditError::Io(e));
        }

        tracing::info!(path = %path.display(), digest = %self.digest(), "Audit report saved");
        Ok(path)
    }

    /// Check the signature against a hex public key
    pub fn verify_with(&self, public_key_hex: &str) -> bool {
        verify_signature(public_key_hex, self.body.as_bytes(), &self.signature).is_ok()
    }
}

/// Renders and signs audit reports with one key
pub struct ReportSigner<S: Signer> {
    signer: S,
}

impl<S: Signer> ReportSigner<S> {
    pub fn new(signer: S) -> Self {
        Self { signer }
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Render the report body and sign its exact bytes
    pub fn finalize(
        &self,
        metadata: &ReportMetadata,
        security_checks: &[ControlCheck],
        data_protection_checks: &[ControlCheck],
        compliance_results: &[ComplianceResult],
        trail: &AuditTrail,
    ) -> SignedReport {
        let body = render_body(
            metadata,
            security_checks,
            data_protection_checks,
            compliance_results,
            trail,
        );
        let signature = self.signer.sign(body.as_bytes());

        tracing::info!(
            signer = self.signer.signer_id(),
            events = trail.len(),
            jurisdictions = compliance_results.len(),
            "Audit report signed"
        );

        SignedReport {
            // Stored at the rendered second so save/parse agree on the file name
            generated_at: Some(truncate_to_second(metadata.generated_at)),
            body,
            signature,
        }
    }

    pub fn verify(&self, report: &SignedReport) -> bool {
        self.verify_strict(report).is_ok()
    }

    pub fn verify_strict(&self, report: &SignedReport) -> AuditResult<()> {
        self.signer.verify(report.body.as_bytes(), &report.signature)
    }
}

fn truncate_to_second(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(at.timestamp(), 0).unwrap_or(at)
}

/// `0.99999` -> `"99.999%"`
fn percentage(fraction: f64) -> String {
    match Decimal::try_from(fraction) {
        Ok(value) => format!("{}%", (value * Decimal::ONE_HUNDRED).round_dp(4).normalize()),
        Err(_) => format!("{}%", fraction * 100.0),
    }
}

fn render_body(
    metadata: &ReportMetadata,
    security_checks: &[ControlCheck],
    data_protection_checks: &[ControlCheck],
    compliance_results: &[ComplianceResult],
    trail: &AuditTrail,
) -> String {
    let mut lines: Vec<String> = vec![
        TITLE.to_string(),
        "=".repeat(50),
        format!("Generated: {}", metadata.generated_at.format(GENERATED_FORMAT)),
        format!("Confidence Level: {}", percentage(metadata.confidence_level)),
        format!("Sigma Level: {}", metadata.sigma_level),
        String::new(),
    ];

    push_checks(&mut lines, "Security Checks", security_checks);
    lines.push(String::new());
    push_checks(&mut lines, "Data Protection Assessment", data_protection_checks);

    lines.push(String::new());
    lines.push("Compliance Results".to_string());
    lines.push("-".repeat(20));

    let mut regions: Vec<&str> = Vec::new();
    for result in compliance_results {
        if !regions.contains(&result.region.as_str()) {
            regions.push(&result.region);
        }
    }
    for region in regions {
        lines.push(String::new());
        lines.push(format!("{} Standards:", region));
        for result in compliance_results.iter().filter(|r| r.region == region) {
            lines.push(String::new());
            lines.push(format!("  {} ({}):", result.name, result.jurisdiction));
            lines.push(format!("    Compliance Score: {:.2}%", result.score));
            lines.push("    Requirements:".to_string());
            for req in &result.requirements {
                lines.push(format!("      • {}: {}", req.requirement, req.status));
            }
            lines.push("    Recommendations:".to_string());
            for rec in &result.recommendations {
                lines.push(format!("      • {}", rec));
            }
        }
    }

    lines.push(String::new());
    lines.push("Audit Trail Summary".to_string());
    lines.push("-".repeat(20));
    lines.push(format!("Total Events: {}", trail.len()));
    let verified = trail.verified_count();
    if verified == trail.len() {
        lines.push("All events logged and verified".to_string());
    } else {
        lines.push(format!("{} of {} events verified", verified, trail.len()));
    }

    lines.join("\n")
}

fn push_checks(lines: &mut Vec<String>, title: &str, checks: &[ControlCheck]) {
    lines.push(title.to_string());
    lines.push("-".repeat(20));
    for check in checks {
        lines.push(String::new());
        lines.push(format!("{}:", check.name));
        lines.push(format!("  Status: {}", check.status));
        lines.push(format!("  Details: {}", check.details));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::SystemSigner;
    use crate::trail::AuditCategory;
    use chrono::TimeZone;
    use dhamma_compliance::{
        data_protection_checks, run_audit, security_checks, RuleCatalogue, SecurityStateSnapshot,
    };
    use tempfile::tempdir;

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            generated_at: Utc.with_ymd_and_hms(2025, 5, 6, 7, 8, 9).unwrap(),
            confidence_level: 0.99999,
            sigma_level: 6,
        }
    }

    fn build(snapshot: &SecurityStateSnapshot) -> (ReportSigner<SystemSigner>, SignedReport) {
        let security = security_checks(snapshot);
        let protection = data_protection_checks(snapshot);
        let results = run_audit(&RuleCatalogue::builtin().unwrap(), snapshot);

        let mut trail = AuditTrail::new();
        trail.log_checks(AuditCategory::SecurityCheck, &security);
        trail.log_checks(AuditCategory::DataProtectionCheck, &protection);
        trail.log_compliance(&results);

        let signer = ReportSigner::new(SystemSigner::generate());
        let report = signer.finalize(&metadata(), &security, &protection, &results, &trail);
        (signer, report)
    }

    #[test]
    fn test_body_layout() {
        let (_, report) = build(&SecurityStateSnapshot::all_enabled());
        let body = report.body();

        let expected_head = "DhammaShell Compliance Audit Report\n\
            ==================================================\n\
            Generated: 2025-05-06 07:08:09\n\
            Confidence Level: 99.999%\n\
            Sigma Level: 6\n\
            \n\
            Security Checks\n\
            --------------------\n\
            \n\
            Encryption:\n  Status: verified\n";
        assert!(body.starts_with(expected_head), "unexpected head:\n{body}");

        assert!(body.contains("\n\nData Protection Assessment\n--------------------\n\nData Minimization:\n"));
        assert!(body.contains("\nPrivacy Controls:\n  Status: verified\n"));
        assert!(body.contains(
            "\n\nUS Standards:\n\n  Health Insurance Portability and Accountability Act (HIPAA):\n    Compliance Score: 100.00%\n    Requirements:\n      • Data encryption in transit and at rest: compliant\n"
        ));
        assert!(body.contains("\n\nTHAI Standards:\n\n  Personal Data Protection Act (PDPA):\n"));
        assert!(body.find("US Standards").unwrap() < body.find("THAI Standards").unwrap());
        assert!(body.ends_with("Audit Trail Summary\n--------------------\nTotal Events: 10\nAll events logged and verified"));
    }

    #[test]
    fn test_partial_snapshot_summary() {
        let (_, report) = build(&SecurityStateSnapshot {
            encryption_at_rest: true,
            ..Default::default()
        });
        assert!(report.body().contains("Authentication:\n  Status: not verified\n"));
        assert!(report.body().contains("Compliance Score: 20.00%"));
        assert!(report.body().contains("      • Address failing control:"));
        assert!(report.body().ends_with("Total Events: 10\n1 of 10 events verified"));
    }

    #[test]
    fn test_verify_fresh_report() {
        let (signer, report) = build(&SecurityStateSnapshot::all_enabled());
        assert!(signer.verify(&report));
        assert!(report.verify_with(&signer.signer().public_key_hex()));
    }

    #[test]
    fn test_any_byte_flip_fails_verification() {
        let (signer, report) = build(&SecurityStateSnapshot::all_enabled());
        let bytes = report.body().as_bytes();
        let ascii: Vec<usize> = (0..bytes.len()).filter(|&i| bytes[i].is_ascii()).collect();

        for index in [ascii[0], ascii[ascii.len() / 2], ascii[ascii.len() - 1]] {
            let mut tampered = bytes.to_vec();
            // Stay within ASCII so the body remains valid UTF-8
            tampered[index] = if tampered[index] == b'a' { b'b' } else { b'a' };
            let forged = SignedReport {
                generated_at: report.generated_at,
                body: String::from_utf8(tampered).unwrap(),
                signature: report.signature().to_string(),
            };
            assert!(!signer.verify(&forged), "flip at {index} not detected");
            assert!(matches!(
                signer.verify_strict(&forged),
                Err(AuditError::SignatureMismatch(_))
            ));
        }
    }

    #[test]
    fn test_render_parse_roundtrip() {
        let (signer, report) = build(&SecurityStateSnapshot::all_enabled());
        let text = report.render();
        assert!(text.contains("All events logged and verified\n\nDigital Signature: "));

        let parsed = SignedReport::parse(&text).unwrap();
        assert_eq!(parsed, report);
        assert!(signer.verify(&parsed));
    }

    #[test]
    fn test_parse_keeps_damaged_timestamp() {
        let (signer, report) = build(&SecurityStateSnapshot::all_enabled());
        let text = report
            .render()
            .replacen("Generated: 2025", "Generated: X025", 1);

        let parsed = SignedReport::parse(&text).unwrap();
        assert_eq!(parsed.generated_at(), None);
        assert_eq!(parsed.signature(), report.signature());
        assert!(!signer.verify(&parsed));
        assert!(parsed.file_name().starts_with("audit_report_"));
    }

    #[test]
    fn test_parse_rejects_unsigned_document() {
        assert!(matches!(
            SignedReport::parse("DhammaShell Compliance Audit Report\nGenerated: 2025-01-01 00:00:00"),
            Err(AuditError::MalformedReport(_))
        ));
    }

    #[test]
    fn test_save_writes_named_file() {
        let dir = tempdir().unwrap();
        let (signer, report) = build(&SecurityStateSnapshot::all_enabled());

        let path = report.save(dir.path()).unwrap();
        assert!(path.ends_with("audit_report_20250506_070809.txt"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

        let saved = SignedReport::parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(signer.verify(&saved));
        assert_eq!(saved.digest(), report.digest());
    }

    #[test]
    fn test_reports_are_independent() {
        let (signer, first) = build(&SecurityStateSnapshot::all_enabled());
        let (_, second) = build(&SecurityStateSnapshot::default());
        assert_ne!(first.body(), second.body());
        assert!(signer.verify(&first));
        assert!(!signer.verify(&second));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0.99999), "99.999%");
        assert_eq!(percentage(0.95), "95%");
        assert_eq!(percentage(1.0), "100%");
    }
}
