//! Session Recorder - append-only interaction log with per-session locking
//!
//! Concurrency:
//! - `record` on different sessions runs in parallel
//! - `record` on the same session is serialized by that session's mutex, and the file
//!   write happens while the mutex is held
//! - every `record` re-reads the persisted file under that mutex, so the file stays the
//!   source of truth even when another recorder shares the directory
//! - `load` reads the persisted file directly; atomic rename means it sees either the
//!   previous or the new version, never a partial one

use crate::error::{RecorderError, RecorderResult};
use crate::store::SessionStore;
use chrono::{DateTime, Utc};
use dhamma_analyzer::MetricAnalyzer;
use dhamma_core::{Interaction, Session, SessionId};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Per-session write lock
type SessionLock = Arc<Mutex<()>>;

/// Summary of a persisted session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub start_time: DateTime<Utc>,
    pub total_interactions: usize,
    pub last_interaction: Option<DateTime<Utc>>,
}

/// Owner of all session logs in one data directory
pub struct SessionRecorder {
    store: SessionStore,
    analyzer: MetricAnalyzer,
    locks: Mutex<HashMap<SessionId, SessionLock>>,
}

impl SessionRecorder {
    /// Create a recorder over `data_dir` with the default analyzer
    pub fn new(data_dir: impl AsRef<Path>) -> RecorderResult<Self> {
        Ok(Self::with_analyzer(
            SessionStore::new(data_dir)?,
            MetricAnalyzer::default(),
        ))
    }

    pub fn with_analyzer(store: SessionStore, analyzer: MetricAnalyzer) -> Self {
        Self {
            store,
            analyzer,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a new session stamped with the current time
    pub fn start_session(&self) -> RecorderResult<SessionId> {
        self.start_session_at(Utc::now())
    }

    /// Start a new session stamped with `now`.
    ///
    /// Fails with `SessionCollision` if a session already exists for the same second.
    pub fn start_session_at(&self, now: DateTime<Utc>) -> RecorderResult<SessionId> {
        let id = SessionId::from_time(now);

        // Registry lock held across check + create so two callers cannot both win
        let _registry = self.locks.lock();
        if self.store.exists(&id) {
            return Err(RecorderError::SessionCollision(id));
        }

        self.store.save(&Session::new(id.clone(), now))?;

        tracing::info!(session_id = %id, "Research session started");
        Ok(id)
    }

    /// Analyze and append one interaction, persisting the full session before returning.
    ///
    /// All-or-nothing: if the write fails, the persisted session is unchanged.
    pub fn record(
        &self,
        session_id: &SessionId,
        user_input: &str,
        system_response: &str,
    ) -> RecorderResult<Interaction> {
        let metrics = self.analyzer.analyze_interaction(user_input, system_response);

        let lock = self.lock_for(session_id);
        let _guard = lock.lock();

        let mut session = self.store.load(session_id)?;
        let interaction = Interaction::new(Utc::now(), user_input, system_response, metrics);
        session.append(interaction.clone());
        self.store.save(&session)?;
        let total = session.len();

        tracing::debug!(
            session_id = %session_id,
            interactions = total,
            emotional_recognition = metrics.emotional_recognition(),
            compassion_score = metrics.compassion_score(),
            mindfulness_level = metrics.mindfulness_level(),
            "Interaction recorded"
        );

        Ok(interaction)
    }

    /// Load the persisted state of a session
    pub fn load(&self, session_id: &SessionId) -> RecorderResult<Session> {
        self.store.load(session_id).inspect_err(|e| {
            if let RecorderError::SessionCorrupt { reason, .. } = e {
                tracing::warn!(session_id = %session_id, reason = %reason, "Corrupt session file");
            }
        })
    }

    /// All persisted sessions in chronological order
    pub fn list_sessions(&self) -> RecorderResult<Vec<SessionId>> {
        self.store.list()
    }

    pub fn session_summary(&self, session_id: &SessionId) -> RecorderResult<SessionSummary> {
        let session = self.load(session_id)?;
        Ok(SessionSummary {
            session_id: session.id().clone(),
            start_time: session.start_time(),
            total_interactions: session.len(),
            last_interaction: session.last_interaction(),
        })
    }

    fn lock_for(&self, session_id: &SessionId) -> SessionLock {
        self.locks
            .lock()
            .entry(session_id.clone())
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_start_session_persists_empty_session() {
        let dir = tempdir().unwrap();
        let recorder = SessionRecorder::new(dir.path()).unwrap();

        let id = recorder.start_session_at(noon()).unwrap();
        assert_eq!(id.as_str(), "20250601_120000");

        let session = recorder.load(&id).unwrap();
        assert!(session.is_empty());
        assert_eq!(session.start_time(), noon());
    }

    #[test]
    fn test_start_session_collision() {
        let dir = tempdir().unwrap();
        let recorder = SessionRecorder::new(dir.path()).unwrap();

        recorder.start_session_at(noon()).unwrap();
        let result = recorder.start_session_at(noon());
        assert!(matches!(result, Err(RecorderError::SessionCollision(_))));
    }

    #[test]
    fn test_collision_with_session_from_previous_process() {
        let dir = tempdir().unwrap();
        SessionRecorder::new(dir.path())
            .unwrap()
            .start_session_at(noon())
            .unwrap();

        let recorder = SessionRecorder::new(dir.path()).unwrap();
        let result = recorder.start_session_at(noon());
        assert!(matches!(result, Err(RecorderError::SessionCollision(_))));
    }

    #[test]
    fn test_record_appends_and_persists() {
        let dir = tempdir().unwrap();
        let recorder = SessionRecorder::new(dir.path()).unwrap();
        let id = recorder.start_session_at(noon()).unwrap();

        let interaction = recorder
            .record(
                &id,
                "I'm feeling really happy and grateful for this opportunity.",
                "I understand. Let's take a moment to breathe.",
            )
            .unwrap();
        assert!(interaction.metrics().emotional_recognition() > 0.5);

        recorder.record(&id, "second", "reply").unwrap();

        let fresh = SessionRecorder::new(dir.path()).unwrap();
        let session = fresh.load(&id).unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(session.interactions()[0], interaction);
        assert_eq!(session.interactions()[1].user_input(), "second");
    }

    #[test]
    fn test_record_on_session_from_previous_process() {
        let dir = tempdir().unwrap();
        let id = {
            let recorder = SessionRecorder::new(dir.path()).unwrap();
            let id = recorder.start_session_at(noon()).unwrap();
            recorder.record(&id, "one", "1").unwrap();
            id
        };

        let recorder = SessionRecorder::new(dir.path()).unwrap();
        recorder.record(&id, "two", "2").unwrap();
        assert_eq!(recorder.load(&id).unwrap().len(), 2);
    }

    #[test]
    fn test_two_recorders_share_a_session() {
        let dir = tempdir().unwrap();
        let first = SessionRecorder::new(dir.path()).unwrap();
        let second = SessionRecorder::new(dir.path()).unwrap();
        let id = first.start_session_at(noon()).unwrap();

        first.record(&id, "a1", "reply").unwrap();
        second.record(&id, "b1", "reply").unwrap();
        first.record(&id, "a2", "reply").unwrap();

        let session = SessionRecorder::new(dir.path()).unwrap().load(&id).unwrap();
        let inputs: Vec<&str> = session.interactions().iter().map(|i| i.user_input()).collect();
        assert_eq!(inputs, vec!["a1", "b1", "a2"]);
    }

    #[test]
    fn test_record_unknown_session() {
        let dir = tempdir().unwrap();
        let recorder = SessionRecorder::new(dir.path()).unwrap();
        let id = SessionId::from_time(noon());

        let result = recorder.record(&id, "hello", "hi");
        assert!(matches!(result, Err(RecorderError::SessionNotFound(_))));
        assert!(recorder.list_sessions().unwrap().is_empty());

        // A failed record must not block starting that session later
        assert_eq!(recorder.start_session_at(noon()).unwrap(), id);
    }

    #[test]
    fn test_corrupt_session_is_reported_not_repaired() {
        let dir = tempdir().unwrap();
        let recorder = SessionRecorder::new(dir.path()).unwrap();
        let id = SessionId::from_time(noon());

        let path = recorder.store().path_for(&id);
        let corrupt = r#"{"session_id": "20250601_120000", "start_time": "2025-06-01T12:00:00Z"}"#;
        fs::write(&path, corrupt).unwrap();

        assert!(matches!(
            recorder.load(&id),
            Err(RecorderError::SessionCorrupt { .. })
        ));
        assert!(matches!(
            recorder.record(&id, "hello", "hi"),
            Err(RecorderError::SessionCorrupt { .. })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), corrupt);
    }

    #[test]
    fn test_session_summary() {
        let dir = tempdir().unwrap();
        let recorder = SessionRecorder::new(dir.path()).unwrap();
        let id = recorder.start_session_at(noon()).unwrap();

        let empty = recorder.session_summary(&id).unwrap();
        assert_eq!(empty.total_interactions, 0);
        assert_eq!(empty.last_interaction, None);

        let last = recorder.record(&id, "a", "b").unwrap();
        let summary = recorder.session_summary(&id).unwrap();
        assert_eq!(summary.total_interactions, 1);
        assert_eq!(summary.last_interaction, Some(last.timestamp()));
    }

    #[test]
    fn test_list_sessions_chronological() {
        let dir = tempdir().unwrap();
        let recorder = SessionRecorder::new(dir.path()).unwrap();

        let later = recorder
            .start_session_at(noon() + chrono::Duration::seconds(5))
            .unwrap();
        let earlier = recorder.start_session_at(noon()).unwrap();

        assert_eq!(recorder.list_sessions().unwrap(), vec![earlier, later]);
    }
}
