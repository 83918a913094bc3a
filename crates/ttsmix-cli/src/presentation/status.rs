//! Status lines on stderr.

use ttsmix_core::{StatusBoard, StatusKind, StatusMessage, StatusReporter};

/// Format one status message for the terminal.
///
/// Continuation lines (server error details) are indented under the first.
pub fn format_status(message: &StatusMessage) -> String {
    let marker = match message.kind {
        StatusKind::Processing => "…",
        StatusKind::Success => "✓",
        StatusKind::Error => "✗",
    };
    let mut lines = message.text.lines();
    let first = lines.next().unwrap_or_default();
    let mut out = format!("{marker} {first}");
    for line in lines {
        out.push_str("\n  ");
        out.push_str(line);
    }
    out
}

/// Prints every status line as it is reported and keeps the board current.
#[derive(Debug, Clone)]
pub struct TerminalReporter {
    board: StatusBoard,
}

impl TerminalReporter {
    /// Wrap a board.
    pub const fn new(board: StatusBoard) -> Self {
        Self { board }
    }

    /// The board holding the current message.
    pub const fn board(&self) -> &StatusBoard {
        &self.board
    }
}

impl StatusReporter for TerminalReporter {
    fn report(&self, message: StatusMessage) {
        eprintln!("{}", format_status(&message));
        self.board.report(message);
    }

    fn clear(&self) {
        self.board.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        assert_eq!(
            format_status(&StatusMessage::processing("Synthesizing speech, please wait...")),
            "… Synthesizing speech, please wait..."
        );
        assert_eq!(
            format_status(&StatusMessage::success("Synthesized 2 audio file(s)")),
            "✓ Synthesized 2 audio file(s)"
        );
    }

    #[test]
    fn test_detail_lines_are_indented() {
        let text = format_status(&StatusMessage::error("bad input\nDetails:\nline 1: empty"));
        assert_eq!(text, "✗ bad input\n  Details:\n  line 1: empty");
    }

    #[tokio::test]
    async fn test_reporter_forwards_to_board() {
        let reporter = TerminalReporter::new(StatusBoard::default());
        reporter.report(StatusMessage::error("down"));
        assert_eq!(reporter.board().current(), Some(StatusMessage::error("down")));

        reporter.clear();
        assert_eq!(reporter.board().current(), None);
    }
}
