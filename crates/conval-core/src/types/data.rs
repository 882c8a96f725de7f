//! Typed data wrapper and provider results

use crate::error::ProviderError;

/// Immutable typed box around a resolved value.
///
/// A `Data` may be null: a successful resolution that carries no value.
/// Only the path lookup fallback policy produces null data on purpose.
#[derive(Debug, Clone, PartialEq)]
pub struct Data<T> {
    value: Option<T>,
}

impl<T> Data<T> {
    /// Wrap a resolved value
    pub fn new(value: T) -> Self {
        Self { value: Some(value) }
    }

    /// A successful resolution with no value
    pub fn null() -> Self {
        Self { value: None }
    }

    pub fn from_option(value: Option<T>) -> Self {
        Self { value }
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Transform the wrapped value, keeping null as null
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Data<U> {
        Data {
            value: self.value.map(f),
        }
    }
}

impl<T> From<T> for Data<T> {
    fn from(value: T) -> Self {
        Data::new(value)
    }
}

/// Outcome of a single resolve operation
pub type ProviderResult<T> = std::result::Result<Data<T>, ProviderError>;
