//! Conval Runtime - Provider graph and condition evaluation
//!
//! This crate turns configuration (see `conval-parser`) into immutable
//! provider trees and resolves them against runtime data:
//! - `Provider<T>` and the concrete condition and value providers
//! - `Buildable<T>` implementations for every configuration structure
//! - The resolution context (data graph and clock)
//! - Injected value services

pub mod build;
pub mod context;
pub mod error;
pub mod provider;
pub mod service;

// Re-export main types
pub use build::{BuildContext, Buildable};
pub use context::{Clock, FixedClock, ResolveContext, SystemClock};
pub use error::{BuildError, Result};
pub use provider::{
    AndProvider, BoxedProvider, ComparisonProvider, ConstantProvider, FallbackPolicy,
    NotProvider, OrProvider, PathLookupProvider, Provider, TextProvider, XorProvider,
};
pub use service::{StaticService, ValueService};
