//! Configuration types for ConditionEngine

use crate::error::{Result, SdkError};
use conval_parser::ReleaseFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Release file path(s), `.json`, `.yaml` or `.yml`
    #[serde(default)]
    pub release_files: Vec<PathBuf>,

    /// Release contents (format, content) - alternative to file paths
    #[serde(skip)]
    pub release_contents: Vec<(ReleaseFormat, String)>,

    /// Refuse to activate a release that defines no conditions
    #[serde(default)]
    pub fail_on_empty_release: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load engine configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse engine configuration from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| SdkError::Config(format!("Invalid engine configuration: {}", e)))
    }

    /// Add a release file
    pub fn with_release_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.release_files.push(path.into());
        self
    }

    /// Add release content
    pub fn with_release_content(mut self, format: ReleaseFormat, content: impl Into<String>) -> Self {
        self.release_contents.push((format, content.into()));
        self
    }

    /// Set whether empty releases are rejected
    pub fn with_fail_on_empty_release(mut self, fail: bool) -> Self {
        self.fail_on_empty_release = fail;
        self
    }

    /// Whether any release source is configured
    pub fn has_releases(&self) -> bool {
        !self.release_files.is_empty() || !self.release_contents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::new();
        assert!(config.release_files.is_empty());
        assert!(!config.fail_on_empty_release);
        assert!(!config.has_releases());
    }

    #[test]
    fn test_engine_config_from_yaml() {
        let config = EngineConfig::from_yaml(
            r#"
release_files:
  - releases/motor.yaml
  - releases/home.json
fail_on_empty_release: true
"#,
        )
        .unwrap();

        assert_eq!(config.release_files.len(), 2);
        assert!(config.fail_on_empty_release);
        assert!(config.has_releases());
    }

    #[test]
    fn test_engine_config_rejects_invalid_yaml() {
        let result = EngineConfig::from_yaml("release_files: 3");
        assert!(matches!(result, Err(SdkError::Config(_))));
    }
}
