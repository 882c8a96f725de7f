//! Conval SDK
//!
//! High-level API for activating releases of authored conditions and
//! evaluating them against runtime data.

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;

// Re-export main types
pub use builder::ConditionEngineBuilder;
pub use config::EngineConfig;
pub use engine::ConditionEngine;
pub use error::{Result, SdkError};

// Re-export commonly used types from dependencies
pub use conval_core::{Data, ProviderError, ProviderResult, Value};
pub use conval_parser::ReleaseFormat;
pub use conval_runtime::{Clock, FixedClock, ResolveContext, SystemClock, ValueService};
pub use tokio_util::sync::CancellationToken;
