//! SDK error types

use conval_core::ProviderError;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Release parsing error
    #[error("Parser error: {0}")]
    Parse(#[from] conval_parser::ParseError),

    /// Provider graph build error
    #[error("Build error in condition '{condition}': {source}")]
    Build {
        condition: String,
        #[source]
        source: conval_runtime::BuildError,
    },

    /// Resolution error
    #[error("Resolution error: {0}")]
    Provider(#[from] ProviderError),

    /// No condition with this name in the active releases
    #[error("Condition not found: {0}")]
    ConditionNotFound(String),

    /// Evaluation cancelled by the caller
    #[error("Evaluation cancelled")]
    Cancelled,

    /// No release has been activated
    #[error("No release activated")]
    NotActivated,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
