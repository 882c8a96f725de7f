//! Condition engine
//!
//! The engine activates releases: every condition of every configured
//! release is parsed and built into a provider tree up front. Activation is
//! all-or-nothing; a single configuration error rejects the whole set.
//!
//! Evaluation only reads the activated trees, so one engine can serve any
//! number of concurrent evaluations.

use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use conval_core::{ProviderError, ProviderResult, Value};
use conval_parser::{Release, ReleaseFormat, ReleaseParser};
use conval_runtime::{
    BoxedProvider, BuildContext, Buildable, Clock, ResolveContext, SystemClock,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Activated conditions of one or more releases
pub struct ConditionEngine {
    conditions: HashMap<String, BoxedProvider<bool>>,
    releases: Vec<String>,
    build_context: BuildContext,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl ConditionEngine {
    /// Create an engine from configuration, without services and with the system clock
    pub async fn new(config: EngineConfig) -> Result<Self> {
        Self::with_context(config, BuildContext::new(), Arc::new(SystemClock)).await
    }

    /// Create an engine with registered services and a custom clock
    pub async fn with_context(
        config: EngineConfig,
        build_context: BuildContext,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let (conditions, releases) = activate(&config, &build_context).await?;
        Ok(Self {
            conditions,
            releases,
            build_context,
            clock,
            config,
        })
    }

    /// Labels (`id@version`) of the activated releases
    pub fn releases(&self) -> &[String] {
        &self.releases
    }

    /// Names of all activated conditions, sorted
    pub fn condition_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.conditions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.conditions.contains_key(name)
    }

    /// Get the provider tree of a condition
    pub fn condition(&self, name: &str) -> Result<BoxedProvider<bool>> {
        if self.releases.is_empty() {
            return Err(SdkError::NotActivated);
        }
        self.conditions
            .get(name)
            .cloned()
            .ok_or_else(|| SdkError::ConditionNotFound(name.to_string()))
    }

    /// Resolve a condition against a caller-supplied context
    pub async fn resolve(&self, name: &str, ctx: &ResolveContext) -> ProviderResult<bool> {
        let provider = self
            .conditions
            .get(name)
            .ok_or_else(|| ProviderError::MissingProvider {
                name: name.to_string(),
            })?;
        provider.resolve(ctx).await
    }

    /// Evaluate a condition against runtime data using the engine clock.
    ///
    /// `Ok(None)` is a null result: the condition resolved without a value.
    pub async fn evaluate(&self, name: &str, data: Value) -> Result<Option<bool>> {
        let provider = self.condition(name)?;
        let ctx = ResolveContext::new(data).with_clock(self.clock.clone());
        let result = provider.resolve(&ctx).await?;
        tracing::debug!("Condition '{}' resolved to {:?}", name, result.value());
        Ok(result.into_value())
    }

    /// Evaluate a condition, giving up when the token is cancelled.
    ///
    /// Cancellation is observed at this boundary only; the provider tree
    /// itself runs to completion or is dropped.
    pub async fn evaluate_with_cancellation(
        &self,
        name: &str,
        data: Value,
        token: &CancellationToken,
    ) -> Result<Option<bool>> {
        if token.is_cancelled() {
            return Err(SdkError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Evaluation of condition '{}' cancelled", name);
                Err(SdkError::Cancelled)
            }
            result = self.evaluate(name, data) => result,
        }
    }

    /// Re-read and re-activate all configured releases.
    ///
    /// On failure the engine keeps its current conditions.
    pub async fn reload(&mut self) -> Result<()> {
        tracing::info!("Reloading releases...");
        let (conditions, releases) = activate(&self.config, &self.build_context).await?;
        self.conditions = conditions;
        self.releases = releases;
        Ok(())
    }

    /// Get configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl fmt::Debug for ConditionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionEngine")
            .field("releases", &self.releases)
            .field("conditions", &self.condition_names())
            .finish()
    }
}

type Activation = (HashMap<String, BoxedProvider<bool>>, Vec<String>);

/// Parse every configured release and build all of their conditions
async fn activate(config: &EngineConfig, build_context: &BuildContext) -> Result<Activation> {
    let mut releases = Vec::new();

    for path in &config.release_files {
        let format = ReleaseFormat::from_path(path)?;
        let content = tokio::fs::read_to_string(path).await?;
        releases.push(ReleaseParser::parse(&content, format)?);
    }
    for (format, content) in &config.release_contents {
        releases.push(ReleaseParser::parse(content, *format)?);
    }

    let mut conditions = HashMap::new();
    let mut labels = Vec::with_capacity(releases.len());

    for release in releases {
        let label = release.label();
        if release.conditions.is_empty() {
            if config.fail_on_empty_release {
                return Err(SdkError::Config(format!(
                    "Release '{}' defines no conditions",
                    label
                )));
            }
            tracing::warn!("Release '{}' defines no conditions", label);
        }

        let count = release.conditions.len();
        build_release(release, build_context, &mut conditions)?;
        tracing::info!("✓ Activated release '{}': {} condition(s)", label, count);
        labels.push(label);
    }

    Ok((conditions, labels))
}

fn build_release(
    release: Release,
    build_context: &BuildContext,
    conditions: &mut HashMap<String, BoxedProvider<bool>>,
) -> Result<()> {
    let label = release.label();
    for (name, config) in release.conditions {
        let provider = config
            .build(build_context)
            .map_err(|source| SdkError::Build {
                condition: name.clone(),
                source,
            })?;
        if conditions.insert(name.clone(), provider).is_some() {
            tracing::warn!(
                "Condition '{}' redefined by release '{}', replacing earlier definition",
                name,
                label
            );
        }
    }
    Ok(())
}
