//! Release documents
//!
//! A release groups the named conditions of one automation configuration
//! version. It is authored as YAML or JSON:
//!
//! ```yaml
//! release:
//!   id: motor-claims
//!   version: 3
//! conditions:
//!   requires_manual_review:
//!     or:
//!       - number: { path: claim.amount }
//!         isGreaterThan: 10000
//!       - ipAddress: { path: request.ip }
//!         isInRange: 10.0.0.0/8
//! ```

use crate::error::{ParseError, Result};
use crate::model::ConditionConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Release identification
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseMetadata {
    pub id: String,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A parsed release
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Release {
    pub release: ReleaseMetadata,
    #[serde(default)]
    pub conditions: BTreeMap<String, ConditionConfig>,
}

impl Release {
    /// `id@version`, or just the id for unversioned releases
    pub fn label(&self) -> String {
        match self.release.version {
            Some(version) => format!("{}@{}", self.release.id, version),
            None => self.release.id.clone(),
        }
    }
}

/// Source format of a release document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseFormat {
    Json,
    Yaml,
}

impl ReleaseFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ReleaseFormat::Json),
            Some("yaml") | Some("yml") => Ok(ReleaseFormat::Yaml),
            _ => Err(ParseError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Release document parser
pub struct ReleaseParser;

impl ReleaseParser {
    /// Parse a release in the given format
    pub fn parse(content: &str, format: ReleaseFormat) -> Result<Release> {
        let release = match format {
            ReleaseFormat::Json => Self::parse_json(content)?,
            ReleaseFormat::Yaml => Self::parse_yaml(content)?,
        };
        tracing::debug!(
            "Parsed release '{}' with {} condition(s)",
            release.label(),
            release.conditions.len()
        );
        Ok(release)
    }

    pub fn parse_json(content: &str) -> Result<Release> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn parse_yaml(content: &str) -> Result<Release> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a release file, detecting the format from its extension
    pub fn parse_file(path: &Path) -> Result<Release> {
        let format = ReleaseFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }
}
