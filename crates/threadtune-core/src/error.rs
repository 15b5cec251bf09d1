//! Error types for thread parameter validation.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Errors raised when a [`ThreadSpec`](crate::ThreadSpec) violates its invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },
}

impl SpecError {
    pub(crate) fn out_of_range(name: &str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            name: name.to_string(),
            value,
            min,
            max,
        }
    }

    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for spec validation.
pub type SpecResult<T> = Result<T, SpecError>;
