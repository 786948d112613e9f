//! Error types for the bilan workspace.
//!
//! Missing line items and indeterminate arithmetic are not errors here: they
//! are recovered locally and surface as [`Unavailable`](crate::Availability)
//! values. This enum covers the failures that must reach the caller.

use thiserror::Error;

/// The main error type for bilan operations.
#[derive(Debug, Error)]
pub enum BilanError {
    /// A programming-contract violation, such as a malformed threshold pair
    /// or a zero-length RSI window.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input data that violates a structural invariant (ragged rows,
    /// duplicate periods, wrong column types).
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A period label or date that could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The external data provider failed for this invocation.
    #[error("Upstream data unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// A specialized Result type for bilan operations.
pub type Result<T> = std::result::Result<T, BilanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BilanError::InvalidConfiguration("low > high".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: low > high");

        let err = BilanError::UpstreamUnavailable("HTTP 503".to_string());
        assert_eq!(err.to_string(), "Upstream data unavailable: HTTP 503");
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert!(ok_result.is_ok());

        let err_result: Result<i32> = Err(BilanError::InvalidData("ragged".to_string()));
        assert!(matches!(err_result, Err(BilanError::InvalidData(_))));
    }
}
