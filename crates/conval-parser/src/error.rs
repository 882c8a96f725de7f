//! Parser error types

use thiserror::Error;

/// Configuration error raised while reading authored conditions.
///
/// These errors are detected when a release is parsed and must prevent the
/// release from activating.
#[derive(Error, Debug)]
pub enum ParseError {
    /// JSON parsing error (also raised for fields a shape does not accept)
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// No registered shape accepts the object's keys
    #[error("No {target} shape matches keys [{}]", keys.join(", "))]
    UnresolvableShape { target: String, keys: Vec<String> },

    /// More than one operator key in a single shape
    #[error("Ambiguous {target} shape: only one of [{}] may be given", keys.join(", "))]
    AmbiguousShape { target: String, keys: Vec<String> },

    /// The shape matched but its content is malformed
    #[error("Invalid {target} configuration: {message}")]
    InvalidShape { target: String, message: String },

    /// Release file with an unknown extension
    #[error("Unsupported release format: {0}")]
    UnsupportedFormat(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
