//! CLI-specific error types and mappings.
//!
//! Maps pipeline and backend errors to exit codes and user-facing messages.

use thiserror::Error;
use ttsmix_core::{BackendError, PipelineError};

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The pipeline ended in a failure.
    #[error("{0}")]
    Pipeline(String),

    /// The backend could not be reached or refused a request.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Argument or input error caught before anything was sent.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// A manifest could not be read or written.
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The user interrupted the job.
    #[error("Speech synthesis cancelled")]
    Cancelled,
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions (see sysexits.h); an interrupted
    /// job exits like a process killed by SIGINT.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Pipeline(_) => 1,
            Self::Arguments(_) => 2,  // EX_USAGE
            Self::Manifest(_) => 65,  // EX_DATAERR
            Self::Backend(_) => 69,   // EX_UNAVAILABLE
            Self::Io(_) => 74,        // EX_IOERR
            Self::Config(_) => 78,    // EX_CONFIG
            Self::Cancelled => 130,
        }
    }
}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NoInput | PipelineError::InvalidParameter { .. } => {
                Self::Arguments(err.to_string())
            }
            PipelineError::Network { .. } => Self::Backend(err.to_string()),
            PipelineError::Cancelled => Self::Cancelled,
            other => Self::Pipeline(other.display_message()),
        }
    }
}

impl From<BackendError> for CliError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Configuration { message } => Self::Config(message),
            other => Self::Backend(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Manifest(err.to_string())
    }
}
