//! Conval Core - Core types for the condition & value provider engine
//!
//! This crate provides the fundamental types used across the Conval crates:
//! - Value types for the runtime data graph
//! - The typed `Data` wrapper and `ProviderResult`
//! - `DataType` conversions for every provider output type
//! - Path expressions
//! - Structured resolution errors

pub mod error;
pub mod path;
pub mod types;

// Re-export commonly used types
pub use error::ProviderError;
pub use path::{Lookup, PathError, PathExpression};
pub use types::{deep_equals, Data, DataType, Interval, Map, ProviderResult, Value};
