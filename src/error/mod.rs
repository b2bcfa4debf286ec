//! Error types for token-info.

pub mod unified;

pub use unified::ErrorCategory;

use thiserror::Error;

/// Primary error type for all token record operations.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Type mismatch for `{field}`: expected {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Projection error: {0}")]
    Projection(String),

    #[error("Envelope error: {0}")]
    Envelope(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TokenError {
    /// Create a type mismatch error for a recognized wire key.
    pub fn type_mismatch(field: &'static str, expected: &'static str) -> Self {
        Self::TypeMismatch { field, expected }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Parse(_) => ErrorCategory::Syntax,
            Self::TypeMismatch { .. } => ErrorCategory::Schema,
            Self::Projection(_) => ErrorCategory::Projection,
            Self::Envelope(_) => ErrorCategory::Transfer,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    /// Whether the failure came from the caller's payload rather than this crate.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Syntax | ErrorCategory::Schema | ErrorCategory::Transfer
        )
    }
}

impl From<serde_json::Error> for TokenError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

impl From<base64::DecodeError> for TokenError {
    fn from(error: base64::DecodeError) -> Self {
        Self::Envelope(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TokenError>;
