//! Terminal output for status lines and run results.
//!
//! Keep this module format-only: it never decides what happened, only how
//! it is shown.

pub mod status;
pub mod summary;

pub use status::{TerminalReporter, format_status};
pub use summary::{format_size, print_run_summary};
