//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;
use ttsmix_client::DEFAULT_BASE_URL;

use crate::commands::Commands;

/// Command-line interface for the text-to-speech pipeline.
///
/// Global options select the backend; subcommands run one pipeline step.
#[derive(Parser)]
#[command(name = "ttsmix")]
#[command(about = "Synthesize speech on a remote TTS backend and mix in noise")]
#[command(version)]
pub struct Cli {
    /// Base URL of the TTS backend
    #[arg(long = "url", env = "TTSMIX_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub url: String,

    /// Request timeout in seconds
    #[arg(long = "timeout", env = "TTSMIX_TIMEOUT_SECS", default_value_t = 300, global = true)]
    pub timeout_secs: u64,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "ttsmix",
            "--verbose",
            "--url",
            "http://gpu-box:5001",
            "fetch-audio",
            "output/run/1.wav",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.url, "http://gpu-box:5001");
        assert!(matches!(cli.command, Some(Commands::FetchAudio { .. })));
    }
}
