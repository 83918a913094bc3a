//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - HTTP backend client (via ttsmix-client)
//! - Job state machine and status board (via ttsmix-core)
//! - Synthesis orchestrator
//!
//! Command handlers receive the composed `CliContext`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ttsmix_client::{DefaultTtsClient, TtsClientConfig};
use ttsmix_core::{
    JobStateMachine, PipelineConfig, StatusBoard, StatusReporter, SynthesisOrchestrator,
    TtsBackendPort,
};

use crate::error::CliError;
use crate::parser::Cli;
use crate::presentation::TerminalReporter;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Base URL of the TTS backend.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Orchestration settings.
    pub pipeline: PipelineConfig,
}

impl CliConfig {
    /// Build the configuration from parsed global options.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            base_url: cli.url.clone(),
            timeout: Duration::from_secs(cli.timeout_secs),
            pipeline: PipelineConfig::default(),
        }
    }

    fn client_config(&self) -> TtsClientConfig {
        TtsClientConfig::new()
            .with_base_url(self.base_url.clone())
            .with_timeout(self.timeout)
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// The backend port.
    pub backend: Arc<dyn TtsBackendPort>,
    /// Terminal status output backed by the status board.
    pub reporter: Arc<TerminalReporter>,
    /// The synthesis pipeline.
    pub orchestrator: Arc<SynthesisOrchestrator>,
}

impl CliContext {
    /// Compose a context around an existing backend.
    pub fn compose(backend: Arc<dyn TtsBackendPort>, pipeline: &PipelineConfig) -> Self {
        let job = JobStateMachine::new();
        let board = StatusBoard::for_job(pipeline.status_clear_delay(), job.clone());
        let reporter = Arc::new(TerminalReporter::new(board));
        let status: Arc<dyn StatusReporter> = reporter.clone();
        let orchestrator = Arc::new(
            SynthesisOrchestrator::new(Arc::clone(&backend), status)
                .with_config(pipeline)
                .with_job(job),
        );

        Self {
            backend,
            reporter,
            orchestrator,
        }
    }

    /// Access the backend port.
    pub fn backend(&self) -> &Arc<dyn TtsBackendPort> {
        &self.backend
    }

    /// Access the status board.
    pub fn board(&self) -> &StatusBoard {
        self.reporter.board()
    }

    /// Access the orchestrator.
    pub fn orchestrator(&self) -> &Arc<SynthesisOrchestrator> {
        &self.orchestrator
    }
}

/// Bootstrap the CLI application.
///
/// Creates the HTTP client and composes the pipeline around it.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext> {
    let client = DefaultTtsClient::new(&config.client_config())
        .map_err(|e| CliError::Config(e.to_string()))?;
    tracing::debug!(base_url = %config.base_url, timeout_secs = config.timeout.as_secs(), "Backend client ready");

    let backend: Arc<dyn TtsBackendPort> = Arc::new(client);
    Ok(CliContext::compose(backend, &config.pipeline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ttsmix_core::JobState;

    #[test]
    fn test_config_from_cli() {
        let cli = Cli::parse_from(["ttsmix", "--url", "http://tts:5001", "--timeout", "42"]);
        let config = CliConfig::from_cli(&cli);
        assert_eq!(config.base_url, "http://tts:5001");
        assert_eq!(config.timeout, Duration::from_secs(42));
    }

    #[test]
    fn test_bootstrap_composes_idle_pipeline() {
        let cli = Cli::parse_from(["ttsmix", "--url", "http://127.0.0.1:5001"]);
        let ctx = bootstrap(&CliConfig::from_cli(&cli)).unwrap();
        assert_eq!(ctx.orchestrator().job().state(), JobState::Idle);
        assert!(ctx.board().current().is_none());
    }

    #[test]
    fn test_bootstrap_rejects_bad_url() {
        let cli = Cli::parse_from(["ttsmix", "--url", "::not a url::"]);
        let err = bootstrap(&CliConfig::from_cli(&cli)).err().unwrap();
        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(cli_err.exit_code(), 78);
    }
}
