//! Session file store - one JSON document per session
//!
//! Writes go to a hidden temp file in the same directory, are fsynced, then renamed over
//! the live file. A crash mid-write leaves the previous version intact.

use crate::error::{RecorderError, RecorderResult};
use dhamma_core::{Session, SessionId};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "session_";
const FILE_SUFFIX: &str = ".json";

/// Directory of `session_<id>.json` files
#[derive(Debug, Clone)]
pub struct SessionStore {
    base_path: PathBuf,
}

impl SessionStore {
    /// Open (and create if needed) a store rooted at `base_path`
    pub fn new(base_path: impl AsRef<Path>) -> RecorderResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the live file for a session
    pub fn path_for(&self, id: &SessionId) -> PathBuf {
        self.base_path
            .join(format!("{}{}{}", FILE_PREFIX, id, FILE_SUFFIX))
    }

    fn temp_path_for(&self, id: &SessionId) -> PathBuf {
        self.base_path
            .join(format!(".{}{}{}.tmp", FILE_PREFIX, id, FILE_SUFFIX))
    }

    pub fn exists(&self, id: &SessionId) -> bool {
        self.path_for(id).exists()
    }

    /// Persist the full session atomically
    pub fn save(&self, session: &Session) -> RecorderResult<PathBuf> {
        let json = serde_json::to_string_pretty(session)?;

        let tmp_path = self.temp_path_for(session.id());
        let path = self.path_for(session.id());

        write_atomic(&path, &tmp_path, json.as_bytes())?;
        Ok(path)
    }

    /// Load and validate a session.
    ///
    /// Any schema violation (missing field, metric outside [0, 1], bad timestamp, id not
    /// matching the file name) is reported as `SessionCorrupt`; nothing is repaired.
    pub fn load(&self, id: &SessionId) -> RecorderResult<Session> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(RecorderError::SessionNotFound(id.to_string()));
        }

        let content = fs::read_to_string(&path)?;
        let session: Session =
            serde_json::from_str(&content).map_err(|e| RecorderError::SessionCorrupt {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        if session.id() != id {
            return Err(RecorderError::SessionCorrupt {
                id: id.to_string(),
                reason: format!("file contains session_id '{}'", session.id()),
            });
        }

        Ok(session)
    }

    /// All session ids in the store, in chronological order
    pub fn list(&self) -> RecorderResult<Vec<SessionId>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };

            let Some(raw_id) = name
                .strip_prefix(FILE_PREFIX)
                .and_then(|rest| rest.strip_suffix(FILE_SUFFIX))
            else {
                continue;
            };

            match raw_id.parse::<SessionId>() {
                Ok(id) => ids.push(id),
                Err(e) => tracing::warn!(file = name, error = %e, "Skipping unrecognized session file"),
            }
        }

        ids.sort();
        Ok(ids)
    }
}

/// Write `bytes` to `tmp_path`, fsync, then rename over `path`
pub(crate) fn write_atomic(path: &Path, tmp_path: &Path, bytes: &[u8]) -> RecorderResult<()> {
    let write_result = (|| -> std::io::Result<()> {
        let mut tmp_file = File::create(tmp_path)?;
        tmp_file.write_all(bytes)?;
        tmp_file.sync_all()?;
        drop(tmp_file);
        fs::rename(tmp_path, path)
    })();

    if let Err(e) = write_result {
        let _ = fs::remove_file(tmp_path);
        return Err(RecorderError::Io(e));
    }
    Ok(())
}
