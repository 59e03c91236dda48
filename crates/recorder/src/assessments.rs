//! Assessment file store - one JSON document per completed pre/post questionnaire

use crate::error::{RecorderError, RecorderResult};
use crate::store::write_atomic;
use dhamma_core::{Assessment, AssessmentKind, SessionId};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const FILE_SUFFIX: &str = ".json";

/// Directory of `<kind>_<YYYYMMDD_HHMMSS>.json` files
#[derive(Debug, Clone)]
pub struct AssessmentStore {
    base_path: PathBuf,
}

/// `pre_20250101_120000` style ids only
fn is_test_id(id: &str) -> bool {
    id.split_once('_').is_some_and(|(kind, stamp)| {
        AssessmentKind::from_str(kind).is_ok() && stamp.parse::<SessionId>().is_ok()
    })
}

impl AssessmentStore {
    pub fn new(base_path: impl AsRef<Path>) -> RecorderResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn path_for(&self, test_id: &str) -> PathBuf {
        self.base_path.join(format!("{}{}", test_id, FILE_SUFFIX))
    }

    /// Persist a completed assessment atomically; saving again replaces the file
    pub fn save(&self, assessment: &Assessment) -> RecorderResult<PathBuf> {
        let json = serde_json::to_string_pretty(assessment)?;
        let path = self.path_for(assessment.test_id());
        let tmp_path = self
            .base_path
            .join(format!(".{}{}.tmp", assessment.test_id(), FILE_SUFFIX));

        write_atomic(&path, &tmp_path, json.as_bytes())?;
        tracing::info!(test_id = assessment.test_id(), path = %path.display(), "Assessment saved");
        Ok(path)
    }

    pub fn load(&self, test_id: &str) -> RecorderResult<Assessment> {
        let path = self.path_for(test_id);
        if !is_test_id(test_id) || !path.exists() {
            return Err(RecorderError::AssessmentNotFound(test_id.to_string()));
        }

        let content = fs::read_to_string(&path)?;
        let assessment: Assessment =
            serde_json::from_str(&content).map_err(|e| RecorderError::AssessmentCorrupt {
                id: test_id.to_string(),
                reason: e.to_string(),
            })?;

        if assessment.test_id() != test_id {
            return Err(RecorderError::AssessmentCorrupt {
                id: test_id.to_string(),
                reason: format!("file contains test_id '{}'", assessment.test_id()),
            });
        }
        Ok(assessment)
    }

    /// All stored test ids, sorted
    pub fn list(&self) -> RecorderResult<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            if let Some(id) = file_name
                .to_str()
                .and_then(|name| name.strip_suffix(FILE_SUFFIX))
                .filter(|id| is_test_id(id))
            {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SessionStore;
    use chrono::{TimeZone, Utc};
    use dhamma_core::Session;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_and_list() {
        let dir = tempdir().unwrap();
        let store = AssessmentStore::new(dir.path()).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 9, 30, 0).unwrap();

        let mut pre = Assessment::start(AssessmentKind::Pre, Some("p-7".to_string()), now);
        pre.record_response("empathy_1", "3", now).unwrap();
        let path = store.save(&pre).unwrap();
        assert!(path.ends_with("pre_20250701_093000.json"));

        let post = Assessment::start(AssessmentKind::Post, None, now);
        store.save(&post).unwrap();

        // Session files in the same directory are not assessments
        SessionStore::new(dir.path())
            .unwrap()
            .save(&Session::new(SessionId::from_time(now), now))
            .unwrap();

        assert_eq!(store.load("pre_20250701_093000").unwrap(), pre);
        assert_eq!(
            store.list().unwrap(),
            vec!["post_20250701_093000".to_string(), "pre_20250701_093000".to_string()]
        );
    }

    #[test]
    fn test_load_missing_or_corrupt() {
        let dir = tempdir().unwrap();
        let store = AssessmentStore::new(dir.path()).unwrap();

        assert!(matches!(
            store.load("pre_20250101_000000"),
            Err(RecorderError::AssessmentNotFound(_))
        ));
        assert!(matches!(
            store.load("../secret"),
            Err(RecorderError::AssessmentNotFound(_))
        ));

        fs::write(store.path_for("post_20250101_000000"), "{\"test_id\": 1}").unwrap();
        assert!(matches!(
            store.load("post_20250101_000000"),
            Err(RecorderError::AssessmentCorrupt { .. })
        ));
    }
}
