//! Error types for the filter DSL.

use thiserror::Error;

/// Errors raised while rendering filters or assembling search requests.
///
/// All of these are caller-input errors: they are reported at the point of
/// rendering or assignment and are never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DslError {
    /// A key carried an operator suffix outside the recognized set.
    #[error("invalid operator '{operator}' in key '{key}'")]
    InvalidOperator { key: String, operator: String },

    /// A value had the wrong shape for its operator or option slot.
    #[error("invalid value for {target}: expected {expected}, got {actual}")]
    InvalidValueType {
        target: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// An option name is not one of the recognized search options.
    #[error("unknown search option '{0}'")]
    UnknownOption(String),

    /// Structured rendering went past the engine's nesting limit.
    #[error("filter nesting depth {depth} exceeds the supported maximum of {max}")]
    DepthExceeded { depth: usize, max: usize },

    /// Matching strategy name not understood by the engine.
    #[error("invalid matching strategy '{0}' (expected last, all or frequency)")]
    InvalidMatchingStrategy(String),

    /// A rendered request could not be turned into JSON.
    #[error("failed to serialize search request: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DslError {
    fn from(err: serde_json::Error) -> Self {
        DslError::Serialization(err.to_string())
    }
}

/// Result type for DSL operations.
pub type Result<T> = std::result::Result<T, DslError>;
