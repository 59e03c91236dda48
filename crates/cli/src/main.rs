//! DhammaShell CLI - Main entry point

use clap::{Parser, Subcommand, ValueEnum};
use dhamma_cli::{commands, config, AppConfig, AppContext};
use dhamma_core::{AssessmentKind, SessionId};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dhamma")]
#[command(about = "DhammaShell - Research telemetry and compliance audit", long_about = None)]
struct Cli {
    /// Config file path (default: ~/.dhammashell/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Audit signing key file (hex seed); overrides DHAMMA_AUDIT_KEY
    #[arg(long)]
    key_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Clone, Copy, ValueEnum)]
enum Phase {
    Pre,
    Post,
}

impl From<Phase> for AssessmentKind {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Pre => AssessmentKind::Pre,
            Phase::Post => AssessmentKind::Post,
        }
    }
}

/// Parse `question_id=text`
fn parse_answer(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(id, text)| (id.trim().to_string(), text.to_string()))
        .filter(|(id, _)| !id.is_empty())
        .ok_or_else(|| format!("expected <question_id>=<answer>, got '{}'", raw))
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze and record one interaction
    Record {
        /// Existing session ID (YYYYMMDD_HHMMSS); a new session is started if omitted
        #[arg(long)]
        session: Option<SessionId>,
        /// User input text
        #[arg(long)]
        input: String,
        /// System response text
        #[arg(long)]
        response: String,
    },

    /// List recorded sessions
    Sessions,

    /// Print one session as stored
    Show {
        /// Session ID
        session: SessionId,
    },

    /// Research report over sessions (all sessions if none given)
    Summarize {
        /// Session IDs
        sessions: Vec<SessionId>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Pre/post empathy assessment (prints the questions when no answers are given)
    Assess {
        #[arg(value_enum)]
        phase: Phase,
        /// Participant identifier
        #[arg(long)]
        user: Option<String>,
        /// Answer as <question_id>=<value>, repeatable
        #[arg(long = "answer", value_parser = parse_answer)]
        answers: Vec<(String, String)>,
        /// Follow-up answer for an open-ended question as <question_id>=<text>, repeatable
        #[arg(long = "follow-up", value_parser = parse_answer)]
        follow_ups: Vec<(String, String)>,
    },

    /// List saved assessments
    Assessments,

    /// Run the compliance audit and save a signed report
    Audit {
        /// Output directory (default: configured reports_dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Verify the signature of a saved audit report
    Verify {
        /// Report file
        report: PathBuf,
    },

    /// Generate a new audit signing key
    Keygen {
        /// Output file path
        #[arg(long, default_value = "audit.key")]
        output: PathBuf,
    },

    /// Show effective configuration
    Config,

    /// Enable or disable research mode
    Research {
        #[arg(value_enum)]
        mode: Toggle,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let key_file = cli.key_file.clone();

    // Keygen and Research do not need the session store
    let context = || -> anyhow::Result<AppContext> {
        let app_config = AppConfig::load_with_env(&config_path)?;
        AppContext::new(app_config, key_file.as_deref())
    };

    match cli.command {
        Commands::Record {
            session,
            input,
            response,
        } => {
            commands::record(&context()?, session.as_ref(), &input, &response)?;
        }

        Commands::Sessions => {
            commands::sessions(&context()?)?;
        }

        Commands::Show { session } => {
            commands::show(&context()?, &session)?;
        }

        Commands::Summarize { sessions, json } => {
            commands::summarize(&context()?, &sessions, json)?;
        }

        Commands::Assess {
            phase,
            user,
            answers,
            follow_ups,
        } => {
            commands::assess(&context()?, phase.into(), user, &answers, &follow_ups)?;
        }

        Commands::Assessments => {
            commands::assessments(&context()?)?;
        }

        Commands::Audit { out } => {
            commands::audit(&context()?, out.as_deref())?;
        }

        Commands::Verify { report } => {
            commands::verify(&context()?, &report)?;
        }

        Commands::Keygen { output } => {
            commands::keygen(&output)?;
        }

        Commands::Config => {
            commands::config(&context()?)?;
        }

        Commands::Research { mode } => {
            commands::set_research_mode(&config_path, matches!(mode, Toggle::On))?;
        }
    }

    Ok(())
}
