//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use conval_sdk::{
    Clock, ConditionEngine, ConditionEngineBuilder, ReleaseFormat, Value, ValueService,
};
use std::sync::Arc;

/// Test helper to create a ConditionEngine from inline YAML releases
pub struct TestEngine {
    builder: ConditionEngineBuilder,
}

impl TestEngine {
    pub fn new() -> Self {
        Self {
            builder: ConditionEngineBuilder::new(),
        }
    }

    /// Load a release from YAML string
    pub fn with_release(mut self, release_yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_release_content(ReleaseFormat::Yaml, release_yaml.trim());
        self
    }

    pub fn with_service(mut self, name: &str, service: Arc<dyn ValueService>) -> Self {
        self.builder = self.builder.with_service(name, service);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.builder = self.builder.with_clock(clock);
        self
    }

    /// Activate the releases, panicking on configuration errors
    pub async fn build(self) -> ConditionEngine {
        self.builder.build().await.expect("releases should activate")
    }
}

/// Convert JSON test data to a `Value`
pub fn data(json: serde_json::Value) -> Value {
    Value::from(json)
}
