//! Pipeline services.
//!
//! These orchestrate between the backend port, the job state machine and the
//! status reporter. They never see a concrete HTTP client.

mod noise_mix;
mod status_board;
mod synthesis;

use std::time::Duration;

pub use noise_mix::{
    DEFAULT_RANDOM_NOISE_DIR, NoiseMixCoordinator, NoiseMixReport, normalize_random_reply,
};
pub use status_board::StatusBoard;
pub use synthesis::{NoiseStage, PipelineRun, RunOutcome, SynthesisJob, SynthesisOrchestrator};

/// How long a success message stays up before it clears itself.
pub const DEFAULT_STATUS_CLEAR_DELAY: Duration = Duration::from_secs(5);

/// Tunables shared by the pipeline services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub(crate) random_noise_dir: String,
    pub(crate) status_clear_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            random_noise_dir: DEFAULT_RANDOM_NOISE_DIR.to_string(),
            status_clear_delay: DEFAULT_STATUS_CLEAR_DELAY,
        }
    }
}

impl PipelineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory used to rebuild paths when a randomized-mix reply only
    /// carries filenames.
    #[must_use]
    pub fn with_random_noise_dir(mut self, dir: impl Into<String>) -> Self {
        self.random_noise_dir = dir.into();
        self
    }

    /// Delay before a success message clears itself.
    #[must_use]
    pub const fn with_status_clear_delay(mut self, delay: Duration) -> Self {
        self.status_clear_delay = delay;
        self
    }

    /// Randomized-mode fallback directory.
    pub fn random_noise_dir(&self) -> &str {
        &self.random_noise_dir
    }

    /// Success-message auto-clear delay.
    pub const fn status_clear_delay(&self) -> Duration {
        self.status_clear_delay
    }
}
