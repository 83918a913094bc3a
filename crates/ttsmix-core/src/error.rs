//! Pipeline error taxonomy.
//!
//! `NoInput`, `InvalidParameter` and `AlreadyRunning` are raised before any
//! network activity and returned to the caller. Every other variant is
//! resolved inside the orchestrator and surfaced as a terminal status message.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors and terminal conditions of the synthesis pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// Neither text nor a file was supplied.
    #[error("Enter some text or provide an input file")]
    NoInput,

    /// A parameter is out of range.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name as sent to the backend.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Another synthesis job is still running.
    #[error("Speech synthesis is already in progress; wait for it to finish or cancel it")]
    AlreadyRunning,

    /// The backend answered with `success=false`.
    #[error("{message}")]
    SynthesisRejected {
        /// Server-reported error.
        message: String,
        /// Per-line failure details, if the server supplied them.
        details: Vec<String>,
    },

    /// Transport-level failure (connection, HTTP status, malformed body).
    #[error("Network error or server not responding: {message}")]
    Network {
        /// Description of the failure.
        message: String,
    },

    /// The job was cancelled by the user. Not a failure.
    #[error("Speech synthesis cancelled")]
    Cancelled,

    /// Every noise-mixing request failed or produced nothing.
    #[error("Noise mixing failed for all {attempted} file(s), please retry")]
    NoiseMixFailed {
        /// Number of post-processing requests issued.
        attempted: usize,
    },

    /// Some, but not all, noise-mixing requests failed.
    #[error("Noise mixing failed for {failed} of {attempted} file(s)")]
    PartialNoiseMixFailure {
        /// Number of post-processing requests issued.
        attempted: usize,
        /// Number of requests that failed.
        failed: usize,
    },
}

impl PipelineError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Whether this condition is a user cancellation rather than a failure.
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether the condition was detected before any request was sent.
    pub const fn is_rejected_before_dispatch(&self) -> bool {
        matches!(
            self,
            Self::NoInput | Self::InvalidParameter { .. } | Self::AlreadyRunning
        )
    }

    /// Full human-readable message, including server detail lines.
    pub fn display_message(&self) -> String {
        match self {
            Self::SynthesisRejected { message, details } if !details.is_empty() => {
                format!("{message}\nDetails:\n{}", details.join("\n"))
            }
            other => other.to_string(),
        }
    }
}
