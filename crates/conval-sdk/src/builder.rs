//! Builder pattern for ConditionEngine

use crate::config::EngineConfig;
use crate::engine::ConditionEngine;
use crate::error::Result;
use conval_parser::ReleaseFormat;
use conval_runtime::{BuildContext, Clock, SystemClock, ValueService};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for ConditionEngine
///
/// # Example
///
/// ```rust,ignore
/// use conval_sdk::{ConditionEngineBuilder, ReleaseFormat};
///
/// // From release files
/// let engine = ConditionEngineBuilder::new()
///     .add_release_file("releases/motor-claims.yaml")
///     .with_service("fraud-score", Arc::new(FraudScoreService::new(client)))
///     .build()
///     .await?;
///
/// // Inline content (for testing)
/// let engine = ConditionEngineBuilder::new()
///     .add_release_content(ReleaseFormat::Yaml, yaml_content)
///     .build()
///     .await?;
/// ```
pub struct ConditionEngineBuilder {
    config: EngineConfig,
    build_context: BuildContext,
    clock: Arc<dyn Clock>,
}

impl ConditionEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            build_context: BuildContext::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a release file
    pub fn add_release_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.release_files.push(path.into());
        self
    }

    /// Add multiple release files
    pub fn add_release_files(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.release_files.extend(paths);
        self
    }

    /// Add release content directly (alternative to file path)
    pub fn add_release_content(mut self, format: ReleaseFormat, content: impl Into<String>) -> Self {
        self.config.release_contents.push((format, content.into()));
        self
    }

    /// Register a value service available to `{service: name}` providers
    pub fn with_service(mut self, name: impl Into<String>, service: Arc<dyn ValueService>) -> Self {
        self.build_context.register_service(name, service);
        self
    }

    /// Set the clock used by `{now: ...}` providers
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Reject releases that define no conditions
    pub fn fail_on_empty_release(mut self, fail: bool) -> Self {
        self.config.fail_on_empty_release = fail;
        self
    }

    /// Activate all configured releases
    pub async fn build(self) -> Result<ConditionEngine> {
        ConditionEngine::with_context(self.config, self.build_context, self.clock).await
    }
}

impl Default for ConditionEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
