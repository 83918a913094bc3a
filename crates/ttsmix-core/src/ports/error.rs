//! Error types for backend port operations.

use thiserror::Error;

/// Errors from backend port operations.
///
/// These are domain-level errors that the orchestrator can act on.
/// Implementation-specific errors (HTTP, JSON) are mapped to these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The backend processed the request and answered `success=false`.
    #[error("{message}")]
    Rejected {
        /// Server-reported error message.
        message: String,
        /// Optional per-item detail lines.
        details: Vec<String>,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("Request to {endpoint} failed with status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Endpoint path that was requested.
        endpoint: String,
    },

    /// Network or connectivity error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
    },

    /// Invalid response from the backend.
    #[error("Invalid backend response: {message}")]
    InvalidResponse {
        /// What was invalid
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Configuration {
        /// What's wrong with the configuration
        message: String,
    },
}

impl BackendError {
    /// Create a rejection without detail lines.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Whether the server understood the request and refused it.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Result type alias for backend port operations.
pub type BackendResult<T> = Result<T, BackendError>;
