//! Application context - wires everything together

use crate::config::AppConfig;
use dhamma_aggregate::{AggregateStats, Aggregator};
use dhamma_audit::{
    AuditCategory, AuditTrail, ReportMetadata, ReportSigner, SignedReport, SystemSigner,
};
use dhamma_compliance::{
    data_protection_checks, run_audit, security_checks, CheckStatus, RuleCatalogue,
};
use dhamma_core::{
    Assessment, AssessmentAnalysis, AssessmentKind, Interaction, QuestionFormat, SessionId,
};
use dhamma_recorder::{AssessmentStore, SessionRecorder};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const ENV_AUDIT_KEY: &str = "DHAMMA_AUDIT_KEY";

/// Application context - wires together all components
pub struct AppContext {
    pub config: AppConfig,
    pub recorder: SessionRecorder,
    pub assessments: AssessmentStore,
    pub catalogue: RuleCatalogue,
    signer: Option<ReportSigner<SystemSigner>>,
}

impl AppContext {
    /// Create a context; the signing key comes from `key_file` or `DHAMMA_AUDIT_KEY`
    pub fn new(config: AppConfig, key_file: Option<&Path>) -> anyhow::Result<Self> {
        let signer = match key_file {
            Some(path) => {
                let seed = std::fs::read_to_string(path)?;
                Some(SystemSigner::from_hex(&seed)?)
            }
            None => std::env::var(ENV_AUDIT_KEY)
                .ok()
                .map(|key| SystemSigner::from_hex(&key))
                .transpose()?,
        };
        Self::with_signer(config, signer)
    }

    pub fn with_signer(config: AppConfig, signer: Option<SystemSigner>) -> anyhow::Result<Self> {
        let recorder = SessionRecorder::new(&config.data_dir)?;
        let assessments = AssessmentStore::new(&config.data_dir)?;
        let catalogue = match &config.catalogue_path {
            Some(path) => RuleCatalogue::from_file(path)?,
            None => RuleCatalogue::builtin()?,
        };

        Ok(Self {
            config,
            recorder,
            assessments,
            catalogue,
            signer: signer.map(ReportSigner::new),
        })
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    fn require_research_mode(&self) -> anyhow::Result<()> {
        if !self.config.research_mode {
            anyhow::bail!(
                "Research mode is disabled. Enable it with `dhamma research on` or DHAMMA_RESEARCH_MODE=1"
            );
        }
        Ok(())
    }

    fn signer(&self) -> anyhow::Result<&ReportSigner<SystemSigner>> {
        match &self.signer {
            Some(signer) => Ok(signer),
            None => anyhow::bail!(
                "No audit signing key. Set {} or pass --key-file (create one with `dhamma keygen`)",
                ENV_AUDIT_KEY
            ),
        }
    }

    /// Record one interaction, starting a new session when none is given
    pub fn record(
        &self,
        session: Option<&SessionId>,
        user_input: &str,
        system_response: &str,
    ) -> anyhow::Result<(SessionId, Interaction)> {
        self.require_research_mode()?;

        let session_id = match session {
            Some(id) => id.clone(),
            None => self.recorder.start_session()?,
        };
        let interaction = self.recorder.record(&session_id, user_input, system_response)?;
        Ok((session_id, interaction))
    }

    /// Run one pre/post questionnaire from collected answers and save it.
    ///
    /// Follow-ups are answers to an open-ended question's follow-up prompt.
    pub fn assess(
        &self,
        kind: AssessmentKind,
        user_id: Option<String>,
        answers: &[(String, String)],
        follow_ups: &[(String, String)],
    ) -> anyhow::Result<(PathBuf, AssessmentAnalysis)> {
        self.require_research_mode()?;

        let now = chrono::Utc::now();
        let mut assessment = Assessment::start(kind, user_id, now);
        for (question_id, answer) in answers {
            assessment.record_response(question_id, answer, now)?;
        }
        for (question_id, answer) in follow_ups {
            let prompt = match &assessment.question(question_id)?.format {
                QuestionFormat::OpenEnded { follow_up_prompt } => follow_up_prompt.clone(),
                QuestionFormat::Scale { .. } => anyhow::bail!("{} does not take follow-ups", question_id),
            };
            assessment.record_follow_up(question_id, &prompt, answer, now)?;
        }

        let analysis = assessment.analyze(now)?;
        let path = self.assessments.save(&assessment)?;
        Ok((path, analysis))
    }

    /// Statistics over the given sessions, or over all sessions when empty
    pub fn summarize(&self, session_ids: &[SessionId]) -> anyhow::Result<AggregateStats> {
        let aggregator = Aggregator::new(&self.recorder);
        let stats = if session_ids.is_empty() {
            aggregator.summarize_all()?
        } else {
            let ids: BTreeSet<SessionId> = session_ids.iter().cloned().collect();
            aggregator.summarize(&ids)?
        };
        Ok(stats)
    }

    /// Run the compliance audit against the configured snapshot and sign the report
    pub fn audit(&self) -> anyhow::Result<SignedReport> {
        let signer = self.signer()?;
        let snapshot = &self.config.snapshot;

        let security = security_checks(snapshot);
        let protection = data_protection_checks(snapshot);
        let results = run_audit(&self.catalogue, snapshot);

        for check in security.iter().chain(&protection) {
            if check.status == CheckStatus::NotVerified {
                tracing::warn!(control = %check.control, "{}", check.details);
            }
        }

        let mut trail = AuditTrail::new();
        trail.log_checks(AuditCategory::SecurityCheck, &security);
        trail.log_checks(AuditCategory::DataProtectionCheck, &protection);
        trail.log_compliance(&results);

        let metadata = ReportMetadata::new(self.config.confidence_level, self.config.sigma_level);
        let report = signer.finalize(&metadata, &security, &protection, &results, &trail);

        tracing::info!(
            events = trail.len(),
            verified = trail.verified_count(),
            "Compliance audit completed"
        );
        Ok(report)
    }

    /// Verify a saved report file against the configured key
    pub fn verify_report(&self, path: &Path) -> anyhow::Result<bool> {
        let signer = self.signer()?;
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        let report = SignedReport::parse(&text)?;
        if let Cow::Owned(_) = text {
            tracing::warn!(path = %path.display(), "Report is not valid UTF-8");
            return Ok(false);
        }

        match signer.verify_strict(&report) {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Report signature mismatch");
                Ok(false)
            }
        }
    }
}
