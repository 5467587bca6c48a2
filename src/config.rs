//! Pipeline configuration.
//!
//! Loaded from stepgate.yml, ~/.config/stepgate/stepgate.yml or an explicit path.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GateError, Result};
use crate::validation::output::{MIN_DOCUMENT_CHARS, MIN_STRUCTURED_CHARS, ValidationPolicy};
use crate::validation::traits::OutputMap;

/// Top-level configuration for one pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Directory output paths are resolved against.
    pub project_root: PathBuf,

    /// Last step of the pipeline; no auto-continue is sent after it.
    pub final_step: u32,

    /// Declared output artifact per step.
    pub outputs: BTreeMap<u32, PathBuf>,

    /// Validation thresholds.
    pub validation: ValidationConfig,

    /// Notification settings.
    pub notify: NotifyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            final_step: 7,
            outputs: BTreeMap::new(),
            validation: ValidationConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. stepgate.yml in current directory
    /// 3. ~/.config/stepgate/stepgate.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let project_name = env!("CARGO_PKG_NAME");
        let project_config = PathBuf::from(format!("{}.yml", project_name));
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load {}: {}", project_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .map_err(|e| GateError::Config(format!("Failed to read {}: {}", path.as_ref().display(), e)))?;
        let config = Self::from_yaml(&content)?;
        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.final_step == 0 {
            return Err(GateError::Config("final-step must be > 0".to_string()));
        }
        if self.outputs.contains_key(&0) {
            return Err(GateError::Config("outputs: steps are numbered from 1".to_string()));
        }
        if self.validation.min_structured_chars == 0 {
            return Err(GateError::Config("validation.min-structured-chars must be > 0".to_string()));
        }
        if self.validation.min_document_chars == 0 {
            return Err(GateError::Config("validation.min-document-chars must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn output_map(&self) -> OutputMap {
        self.outputs.clone()
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            min_structured_chars: self.validation.min_structured_chars,
            min_document_chars: self.validation.min_document_chars,
            allow_empty: self.validation.allow_empty.clone(),
        }
    }
}

/// Validation thresholds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ValidationConfig {
    /// Structured artifacts below this size get a warning.
    pub min_structured_chars: usize,

    /// Rendered documents below this size are rejected.
    pub min_document_chars: usize,

    /// Steps whose empty structured output is only a warning.
    pub allow_empty: BTreeSet<u32>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_structured_chars: MIN_STRUCTURED_CHARS,
            min_document_chars: MIN_DOCUMENT_CHARS,
            allow_empty: BTreeSet::new(),
        }
    }
}

/// Notification settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NotifyConfig {
    /// Channel to post to; notifications stay local without one.
    pub channel_id: Option<String>,

    /// Bound on a single delivery attempt in milliseconds.
    pub timeout_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            channel_id: None,
            timeout_ms: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
project-root: /srv/pipeline
final-step: 5
outputs:
  1: out/step1.json
  2: out/step2.yaml
  5: out/report.html
validation:
  min-structured-chars: 80
  allow-empty: [2]
notify:
  channel-id: C0PIPELINE
  timeout-ms: 1500
"#;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.project_root, PathBuf::from("."));
        assert_eq!(config.final_step, 7);
        assert!(config.outputs.is_empty());
        assert_eq!(config.validation.min_structured_chars, 50);
        assert_eq!(config.validation.min_document_chars, 100);
        assert!(config.notify.channel_id.is_none());
        assert_eq!(config.notify.timeout_ms, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.project_root, PathBuf::from("/srv/pipeline"));
        assert_eq!(config.final_step, 5);
        assert_eq!(config.outputs.len(), 3);
        assert_eq!(config.outputs[&2], PathBuf::from("out/step2.yaml"));
        assert_eq!(config.validation.min_structured_chars, 80);
        // Unset fields keep their defaults
        assert_eq!(config.validation.min_document_chars, 100);
        assert!(config.validation.allow_empty.contains(&2));
        assert_eq!(config.notify.channel_id.as_deref(), Some("C0PIPELINE"));
        assert_eq!(config.notify.timeout_ms, 1500);
    }

    #[test]
    fn test_validation_policy() {
        let policy = Config::from_yaml(SAMPLE).unwrap().validation_policy();
        assert_eq!(policy.min_structured_chars, 80);
        assert!(policy.allow_empty.contains(&2));
    }

    #[test]
    fn test_rejects_zero_final_step() {
        let err = Config::from_yaml("final-step: 0").unwrap_err();
        assert!(matches!(err, GateError::Config(_)));
    }

    #[test]
    fn test_rejects_step_zero_output() {
        let err = Config::from_yaml("outputs:\n  0: out.json\n").unwrap_err();
        assert!(err.to_string().contains("numbered from 1"));
    }

    #[test]
    fn test_rejects_zero_thresholds() {
        assert!(Config::from_yaml("validation:\n  min-document-chars: 0\n").is_err());
        assert!(Config::from_yaml("validation:\n  min-structured-chars: 0\n").is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = Config::from_yaml("outputs: [").unwrap_err();
        assert!(matches!(err, GateError::Yaml(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.yml");
        fs::write(&path, SAMPLE).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.final_step, 5);
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.yml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, GateError::Config(_)));
    }
}
