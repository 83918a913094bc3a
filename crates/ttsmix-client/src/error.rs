//! Internal error types for backend HTTP operations.
//!
//! These errors are mapped to core port errors at the boundary; only
//! client construction surfaces them directly.

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success HTTP status.
    #[error("Backend request failed with status {status}: {url}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The backend answered `success=false`.
    #[error("{message}")]
    ApiFailure {
        /// Server-reported error
        message: String,
        /// Optional per-item error lines
        details: Vec<String>,
    },

    /// The backend answered with something other than the expected shape.
    #[error("Invalid response from backend: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON encoding or decoding error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
