//! DhammaShell Session Recorder
//!
//! Persists every chat interaction into one JSON file per session.
//! The session file is the Source of Truth; it is rewritten in full on every append
//! through a temp file + atomic rename, so readers only ever see complete versions.
//! Completed pre/post assessments are stored alongside as `<kind>_<id>.json`.

pub mod assessments;
pub mod error;
pub mod recorder;
pub mod store;

pub use assessments::AssessmentStore;
pub use error::RecorderError;
pub use recorder::{SessionRecorder, SessionSummary};
pub use store::SessionStore;
