//! Resolution-time error types

use crate::types::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Structured error raised while resolving a provider.
///
/// Each variant carries a machine-readable [`code`](ProviderError::code),
/// a human-readable message (`Display`) and a contextual
/// [`data`](ProviderError::data) map for the orchestrator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("Value at path '{path}' is null")]
    NullValue { path: String },

    #[error("Value at path '{path}' is of type {actual}, expected {expected}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid IP address: '{value}'")]
    InvalidIpAddress { value: String },

    #[error("Invalid IP range '{range}': {reason}")]
    InvalidIpRange { range: String, reason: String },

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    /// A required sub-provider is absent
    #[error("Missing provider: {name}")]
    MissingProvider { name: String },

    #[error("Service '{service}' failed: {message}")]
    Service { service: String, message: String },
}

impl ProviderError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ProviderError::PathNotFound { .. } => "path_not_found",
            ProviderError::NullValue { .. } => "null_value",
            ProviderError::TypeMismatch { .. } => "type_mismatch",
            ProviderError::InvalidIpAddress { .. } => "invalid_ip_address",
            ProviderError::InvalidIpRange { .. } => "invalid_ip_range",
            ProviderError::InvalidRegex { .. } => "invalid_regex",
            ProviderError::MissingProvider { .. } => "missing_provider",
            ProviderError::Service { .. } => "service_error",
        }
    }

    /// Contextual data describing the failure
    pub fn data(&self) -> BTreeMap<String, Value> {
        let entries: Vec<(&str, &String)> = match self {
            ProviderError::PathNotFound { path } | ProviderError::NullValue { path } => {
                vec![("path", path)]
            }
            ProviderError::TypeMismatch {
                path,
                expected,
                actual,
            } => vec![("path", path), ("expected", expected), ("actual", actual)],
            ProviderError::InvalidIpAddress { value } => vec![("value", value)],
            ProviderError::InvalidIpRange { range, reason } => {
                vec![("range", range), ("reason", reason)]
            }
            ProviderError::InvalidRegex { pattern, reason } => {
                vec![("pattern", pattern), ("reason", reason)]
            }
            ProviderError::MissingProvider { name } => vec![("name", name)],
            ProviderError::Service { service, message } => {
                vec![("service", service), ("message", message)]
            }
        };

        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.clone())))
            .collect()
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_is_structured() {
        let error = ProviderError::TypeMismatch {
            path: "claim.approved".to_string(),
            expected: "boolean".to_string(),
            actual: "string".to_string(),
        };

        assert_eq!(error.code(), "type_mismatch");
        assert!(error.to_string().contains("claim.approved"));
        assert!(error.to_string().contains("expected boolean"));

        let data = error.data();
        assert_eq!(data.get("actual"), Some(&Value::from("string")));
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_codes_are_distinct() {
        let errors = vec![
            ProviderError::PathNotFound { path: "a".to_string() },
            ProviderError::NullValue { path: "a".to_string() },
            ProviderError::InvalidIpAddress { value: "x".to_string() },
            ProviderError::InvalidIpRange {
                range: "x".to_string(),
                reason: "y".to_string(),
            },
            ProviderError::InvalidRegex {
                pattern: "(".to_string(),
                reason: "unclosed".to_string(),
            },
            ProviderError::MissingProvider { name: "text".to_string() },
        ];

        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
