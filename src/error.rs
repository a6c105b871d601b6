//! Custom error types for the application.
//!
//! This module defines the primary error type, `PipelogError`, for the entire
//! application. Using the `thiserror` crate, it provides a centralized and
//! consistent way to handle the two operator-visible error kinds (input
//! validation and backend failures) alongside the ambient I/O, HTTP, and
//! configuration error sources they fold into.

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, PipelogError>;

#[derive(Error, Debug)]
pub enum PipelogError {
    /// Non-numeric (or non-finite) temperature or pressure input. Recovered
    /// locally; the form is retained and no backend call is made.
    #[error("temperature and pressure must be valid numbers")]
    InvalidNumber,

    /// Any failure reported by the database during a write or query call.
    /// The message is surfaced to the operator verbatim.
    #[error("{0}")]
    Backend(String),

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("configuration validation error: {0}")]
    Configuration(String),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] hyper::http::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelogError {
    /// Whether this error is recovered locally in the form, as opposed to a
    /// failed backend operation.
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelogError::InvalidNumber)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_both_fields() {
        let message = PipelogError::InvalidNumber.to_string();
        assert!(message.contains("temperature and pressure"));
        assert!(PipelogError::InvalidNumber.is_validation());
    }

    #[test]
    fn backend_error_is_surfaced_verbatim() {
        let err = PipelogError::Backend("unauthorized: unauthorized access".to_string());
        assert_eq!(err.to_string(), "unauthorized: unauthorized access");
        assert!(!err.is_validation());
    }
}
