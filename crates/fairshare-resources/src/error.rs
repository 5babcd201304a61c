//! Error types for resource vector parsing.

use thiserror::Error;

/// Result type alias for resource parsing.
pub type ResourcesResult<T> = Result<T, ResourcesError>;

/// Errors produced while parsing the resource text notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourcesError {
    #[error("missing ':' in resource '{0}'")]
    MissingSeparator(String),

    #[error("empty resource name in '{0}'")]
    EmptyName(String),

    #[error("invalid scalar value for '{name}': {value}")]
    InvalidScalar { name: String, value: String },

    #[error("invalid range for '{name}': {range}")]
    InvalidRange { name: String, range: String },

    #[error("unterminated value for '{name}': {value}")]
    Unterminated { name: String, value: String },
}
