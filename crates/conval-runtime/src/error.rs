//! Build error types

use conval_core::PathError;
use thiserror::Error;

/// Error raised while building a provider graph from configuration.
///
/// Build errors are configuration errors: a release that raises one must not
/// activate.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A shape was selected but a sub-builder it requires is absent
    #[error("Missing required '{field}' for {condition} condition")]
    MissingBuilder { condition: String, field: String },

    /// A literal cannot be read as the type its position requires
    #[error("Invalid {expected} literal: {value}")]
    InvalidLiteral { expected: String, value: String },

    /// No service with this name was registered
    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// `now` used where the clock cannot produce a value
    #[error("'now' cannot produce a {0} value")]
    UnsupportedClockTarget(String),

    /// Malformed path expression
    #[error("{0}")]
    InvalidPath(#[from] PathError),
}

/// Result type for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_builder_message() {
        let error = BuildError::MissingBuilder {
            condition: "listContainsValue".to_string(),
            field: "list".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Missing required 'list' for listContainsValue condition"
        );
    }

    #[test]
    fn test_path_error_conversion() {
        let path_error = conval_core::PathExpression::parse("a..b").unwrap_err();
        let error: BuildError = path_error.into();
        assert!(error.to_string().contains("a..b"));
    }
}
