//! Conval Parser - configuration model and discriminator resolver
//!
//! This crate turns authored (JSON or YAML) condition configuration into the
//! typed configuration model the runtime builds providers from:
//! - `model`: per-shape configuration structures
//! - `discriminator`: shape-based selection of the configuration type
//! - `release`: release documents grouping named conditions

pub mod discriminator;
pub mod error;
pub mod model;
pub mod release;

// Re-export main parser types
pub use discriminator::{resolve_condition, resolve_value};
pub use error::{ParseError, Result};
pub use model::{
    ComparisonConfig, ComparisonOperator, ConditionConfig, DataKind, IpRangeConfig,
    ListContainsConfig, LogicalConfig, NotConfig, ObjectPropertyConfig, PathLookupConfig,
    PeriodConfig, RegexConfig, ServiceConfig, TextConfig, TextOperation, ValueConfig, XorConfig,
};
pub use release::{Release, ReleaseFormat, ReleaseMetadata, ReleaseParser};
