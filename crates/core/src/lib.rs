//! DhammaShell Core - Domain types
//!
//! This crate contains the fundamental types shared by the research telemetry crates:
//! - `MetricSample`: Three bounded [0, 1] empathy scores
//! - `SessionId`: Timestamp-derived session identifier (`YYYYMMDD_HHMMSS`)
//! - `Session` / `Interaction`: The persisted conversation log
//! - `Assessment`: Pre/post empathy questionnaire

pub mod assessment;
pub mod error;
pub mod metrics;
pub mod session;

pub use assessment::{
    standard_questions, Assessment, AssessmentAnalysis, AssessmentKind, AssessmentResponse,
    FollowUp, Insight, Question, QuestionFormat, ScoreSummary,
};
pub use error::CoreError;
pub use metrics::{Band, MetricKind, MetricSample};
pub use session::{Interaction, InteractionAnalysis, Session, SessionId};
