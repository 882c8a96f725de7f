//! Type system for Conval
//!
//! This module contains the runtime type system including:
//! - Value types for the data graph
//! - The typed `Data` wrapper and `ProviderResult`
//! - `DataType` conversions
//! - Periods (`Interval`)

pub mod data;
pub mod data_type;
pub mod interval;
pub mod value;

pub use data::{Data, ProviderResult};
pub use data_type::DataType;
pub use interval::Interval;
pub use value::{deep_equals, Map, Value};
