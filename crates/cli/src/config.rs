//! Application configuration
//!
//! Read from `~/.dhammashell/config.json` (or `--config`). A missing file means defaults;
//! a present but unreadable file is an error. Environment variables override the file.

use anyhow::Context;
use dhamma_compliance::SecurityStateSnapshot;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const ENV_API_KEY: &str = "DHAMMA_API_KEY";
pub const ENV_RESEARCH_MODE: &str = "DHAMMA_RESEARCH_MODE";
pub const ENV_DATA_DIR: &str = "DHAMMA_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model provider key; only stored and displayed masked
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_research_mode")]
    pub research_mode: bool,

    /// Session files (`session_<id>.json`)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Signed audit reports
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,

    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,

    #[serde(default = "default_sigma_level")]
    pub sigma_level: u32,

    /// Operator catalogue replacing the built-in one
    #[serde(default)]
    pub catalogue_path: Option<PathBuf>,

    /// Control flags the audit is scored against
    #[serde(default)]
    pub snapshot: SecurityStateSnapshot,
}

/// Displayable subset of the configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSettings {
    pub api_key: Option<String>,
    pub research_mode: bool,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".dhammashell"))
        .unwrap_or_else(|| PathBuf::from(".dhammashell"))
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.json")
}

fn default_research_mode() -> bool {
    false
}

fn default_data_dir() -> PathBuf {
    config_dir().join("research_data")
}

fn default_reports_dir() -> PathBuf {
    config_dir().join("audit_reports")
}

fn default_confidence_level() -> f64 {
    0.99999
}

fn default_sigma_level() -> u32 {
    6
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            research_mode: default_research_mode(),
            data_dir: default_data_dir(),
            reports_dir: default_reports_dir(),
            confidence_level: default_confidence_level(),
            sigma_level: default_sigma_level(),
            catalogue_path: None,
            snapshot: SecurityStateSnapshot::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` and apply process environment overrides
    pub fn load_with_env(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `DHAMMA_*` overrides from a variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }

        if let Some(raw) = lookup(ENV_RESEARCH_MODE) {
            match parse_flag(&raw) {
                Some(enabled) => self.research_mode = enabled,
                None => tracing::warn!(value = %raw, "Ignoring unrecognized {}", ENV_RESEARCH_MODE),
            }
        }

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
    }

    /// Write atomically to `path`
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp_path = path.with_extension("json.tmp");

        let write_result = (|| -> std::io::Result<()> {
            let mut tmp_file = File::create(&tmp_path)?;
            tmp_file.write_all(json.as_bytes())?;
            tmp_file.sync_all()?;
            drop(tmp_file);
            fs::rename(&tmp_path, path)
        })();

        if let Err(e) = write_result {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).with_context(|| format!("Failed to write config {}", path.display()));
        }
        Ok(())
    }

    /// Settings for display, with the API key masked
    pub fn get_config(&self) -> ConfigSettings {
        ConfigSettings {
            api_key: self.api_key.as_ref().map(|_| "****".to_string()),
            research_mode: self.research_mode,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!config.research_mode);
        assert_eq!(config.confidence_level, 0.99999);
        assert_eq!(config.sigma_level, 6);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"research_mode": true, "sigma_level": 4, "snapshot": {"access_logging": true}}"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert!(config.research_mode);
        assert_eq!(config.sigma_level, 4);
        assert_eq!(config.confidence_level, 0.99999);
        assert!(config.snapshot.access_logging);
        assert!(!config.snapshot.encryption_at_rest);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_RESEARCH_MODE, "on"),
            (ENV_DATA_DIR, "/tmp/dhamma"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert!(config.research_mode);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/dhamma"));

        config.apply_overrides(env(&[(ENV_RESEARCH_MODE, "maybe")]));
        assert!(config.research_mode);
    }

    #[test]
    fn test_get_config_masks_key() {
        let mut config = AppConfig::default();
        assert_eq!(config.get_config().api_key, None);

        config.api_key = Some("sk-secret".to_string());
        let settings = config.get_config();
        assert_eq!(settings.api_key.as_deref(), Some("****"));
        assert!(!serde_json::to_string(&settings).unwrap().contains("sk-secret"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = AppConfig {
            research_mode: true,
            data_dir: dir.path().join("data"),
            ..AppConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }
}
