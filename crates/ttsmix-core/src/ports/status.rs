//! Status reporter trait for human-readable phase and error messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Work is in flight. Persists until superseded.
    Processing,
    /// A phase finished well. Auto-clears after a delay.
    Success,
    /// A phase failed. Persists until superseded.
    Error,
}

/// One human-readable status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// Severity.
    pub kind: StatusKind,
    /// Message text (may span several lines).
    pub text: String,
}

impl StatusMessage {
    /// An in-progress message.
    pub fn processing(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Processing,
            text: text.into(),
        }
    }

    /// A success message.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    /// An error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    /// Whether this message should disappear on its own.
    pub const fn auto_clears(&self) -> bool {
        matches!(self.kind, StatusKind::Success)
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Sink for status messages.
///
/// Implementations keep at most a "current message"; a new report supersedes
/// the previous one.
///
/// # Implementations
///
/// - [`NoopStatusReporter`] - For tests and contexts without a display
/// - [`StatusBoard`](crate::services::StatusBoard) - Current message with auto-clear
/// - Adapter-specific implementations (terminal output, etc.)
pub trait StatusReporter: Send + Sync {
    /// Replace the current message.
    ///
    /// This method should not block.
    fn report(&self, message: StatusMessage);

    /// Remove the current message.
    fn clear(&self);
}

/// A no-op status reporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStatusReporter;

impl NoopStatusReporter {
    /// Create a new no-op reporter.
    pub const fn new() -> Self {
        Self
    }
}

impl StatusReporter for NoopStatusReporter {
    fn report(&self, _message: StatusMessage) {
        // Intentionally do nothing
    }

    fn clear(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_only_success_auto_clears() {
        assert!(StatusMessage::success("done").auto_clears());
        assert!(!StatusMessage::error("failed").auto_clears());
        assert!(!StatusMessage::processing("working").auto_clears());
    }

    #[test]
    fn test_noop_reporter() {
        let reporter: Arc<dyn StatusReporter> = Arc::new(NoopStatusReporter::new());
        reporter.report(StatusMessage::processing("working"));
        reporter.clear();
    }
}
