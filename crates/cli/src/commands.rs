//! CLI commands

use crate::config::AppConfig;
use crate::context::{AppContext, ENV_AUDIT_KEY};
use dhamma_aggregate::ResearchReport;
use dhamma_audit::{Signer, SystemSigner};
use dhamma_core::{standard_questions, AssessmentKind, MetricKind, QuestionFormat, SessionId};
use serde_json::json;
use std::path::Path;

/// Record one interaction
pub fn record(
    ctx: &AppContext,
    session: Option<&SessionId>,
    input: &str,
    response: &str,
) -> Result<(), anyhow::Error> {
    let (session_id, interaction) = ctx.record(session, input, response)?;
    let metrics = interaction.metrics();

    println!("✅ Interaction recorded in session {}", session_id);
    for kind in MetricKind::ALL {
        let value = metrics.get(kind);
        println!("   {}: {:.2} ({})", kind.title(), value, kind.describe(value));
    }
    Ok(())
}

/// List all sessions
pub fn sessions(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let ids = ctx.recorder.list_sessions()?;
    if ids.is_empty() {
        println!("No sessions recorded in {}", ctx.config.data_dir.display());
        return Ok(());
    }

    println!("📋 {} session(s):", ids.len());
    for id in ids {
        match ctx.recorder.session_summary(&id) {
            Ok(summary) => {
                let last = summary
                    .last_interaction
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "   {}  interactions: {}  last: {}",
                    id, summary.total_interactions, last
                );
            }
            Err(e) => println!("   {}  ❌ {}", id, e),
        }
    }
    Ok(())
}

/// Print one session as stored
pub fn show(ctx: &AppContext, session_id: &SessionId) -> Result<(), anyhow::Error> {
    let session = ctx.recorder.load(session_id)?;
    println!("{}", serde_json::to_string_pretty(&session)?);
    Ok(())
}

/// Run a pre/post empathy assessment, or print the questionnaire when no answers are given
pub fn assess(
    ctx: &AppContext,
    kind: AssessmentKind,
    user_id: Option<String>,
    answers: &[(String, String)],
    follow_ups: &[(String, String)],
) -> Result<(), anyhow::Error> {
    if answers.is_empty() {
        println!("📋 {} assessment questions:", kind);
        for question in standard_questions() {
            match question.format {
                QuestionFormat::Scale { min, max, description } => {
                    println!("   {} [{}-{}] {}", question.id, min, max, question.question);
                    println!("      {}", description);
                }
                QuestionFormat::OpenEnded { follow_up_prompt } => {
                    println!("   {} [open] {}", question.id, question.question);
                    println!("      Follow-up: {}", follow_up_prompt);
                }
            }
        }
        println!();
        println!("Answer with --answer <id>=<value> and --follow-up <id>=<text>");
        return Ok(());
    }

    let (path, analysis) = ctx.assess(kind, user_id, answers, follow_ups)?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    println!();
    println!("✅ Assessment saved to {}", path.display());
    Ok(())
}

/// List saved assessments
pub fn assessments(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let ids = ctx.assessments.list()?;
    if ids.is_empty() {
        println!("No assessments saved in {}", ctx.config.data_dir.display());
        return Ok(());
    }

    println!("📋 {} assessment(s):", ids.len());
    for id in ids {
        match ctx.assessments.load(&id).map(|a| a.analyze(a.start_time())) {
            Ok(Ok(analysis)) => match analysis.scores {
                Some(scores) => println!(
                    "   {}  average: {:.2}  range: {}-{}",
                    id, scores.average, scores.min, scores.max
                ),
                None => println!("   {}  open-ended only", id),
            },
            Ok(Err(e)) => println!("   {}  {}", id, e),
            Err(e) => println!("   {}  ❌ {}", id, e),
        }
    }
    Ok(())
}

/// Research report over sessions (all when none given)
pub fn summarize(ctx: &AppContext, session_ids: &[SessionId], as_json: bool) -> Result<(), anyhow::Error> {
    let stats = ctx.summarize(session_ids)?;
    let report = ResearchReport::new(stats);

    if as_json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.render());
    }
    Ok(())
}

/// Run the compliance audit and save the signed report
pub fn audit(ctx: &AppContext, out_dir: Option<&Path>) -> Result<(), anyhow::Error> {
    let report = ctx.audit()?;
    let dir = out_dir.unwrap_or(ctx.config.reports_dir.as_path());
    let path = report.save(dir)?;

    println!("{}", report.render());
    println!();
    println!("✅ Audit report saved to {}", path.display());
    println!("   SHA-256: {}", report.digest());
    Ok(())
}

/// Verify a saved report's signature
pub fn verify(ctx: &AppContext, path: &Path) -> Result<(), anyhow::Error> {
    if ctx.verify_report(path)? {
        println!("✅ Signature valid: {}", path.display());
        Ok(())
    } else {
        anyhow::bail!("Signature mismatch: {} has been modified or was signed with another key", path.display())
    }
}

/// Generate a new audit signing key
pub fn keygen(output: &Path) -> Result<(), anyhow::Error> {
    if output.exists() {
        anyhow::bail!("{} already exists; refusing to overwrite a key", output.display());
    }

    let signer = SystemSigner::generate();
    let seed = signer.seed_hex();
    std::fs::write(output, &seed)?;

    println!("✅ Generated audit signing key");
    println!("   Private key saved to: {}", output.display());
    println!("   Public key: {}", signer.public_key_hex());
    println!();
    println!("To use: export {}=$(cat {})", ENV_AUDIT_KEY, output.display());
    Ok(())
}

/// Show effective configuration
pub fn config(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let settings = ctx.config.get_config();
    let view = json!({
        "api_key": settings.api_key,
        "research_mode": settings.research_mode,
        "data_dir": ctx.config.data_dir,
        "reports_dir": ctx.config.reports_dir,
        "confidence_level": ctx.config.confidence_level,
        "sigma_level": ctx.config.sigma_level,
        "catalogue": ctx.config.catalogue_path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "built-in".to_string()),
        "signing_key": if ctx.has_signer() { "loaded" } else { "missing" },
    });
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

/// Persist the research mode setting
pub fn set_research_mode(config_path: &Path, enabled: bool) -> Result<(), anyhow::Error> {
    let mut config = AppConfig::load(config_path)?;
    config.research_mode = enabled;
    config.save(config_path)?;

    let status = if enabled { "enabled" } else { "disabled" };
    println!("✅ Research mode {}", status);
    Ok(())
}
