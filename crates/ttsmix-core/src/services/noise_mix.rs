//! Noise-mixing post-processing over synthesized artifacts.

use std::sync::Arc;

use crate::domain::{AudioArtifact, NoiseMode};
use crate::error::PipelineError;
use crate::fanout::{FanOutBarrier, FanOutReport};
use crate::ports::{
    FixedMixRequest, RandomMixReply, RandomMixRequest, StatusMessage, StatusReporter,
    TtsBackendPort,
};

/// Directory the backend writes randomized-mix outputs to.
pub const DEFAULT_RANDOM_NOISE_DIR: &str = "output/tts_with_noise";

/// Turn a randomized-mix reply into artifacts.
///
/// A non-empty `paths` array wins; each path is paired with the filename at
/// the same index, or `file_{n}.wav` when that filename is missing. Failing
/// that, a non-empty `filenames` array is resolved against `fallback_dir`.
/// Anything else yields no artifacts.
pub fn normalize_random_reply(reply: RandomMixReply, fallback_dir: &str) -> Vec<AudioArtifact> {
    let RandomMixReply { paths, filenames } = reply;

    match (paths, filenames) {
        (Some(paths), filenames) if !paths.is_empty() => {
            let filenames = filenames.unwrap_or_default();
            paths
                .into_iter()
                .enumerate()
                .map(|(i, path)| {
                    let filename = filenames
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| format!("file_{}.wav", i + 1));
                    AudioArtifact::new(path, filename)
                })
                .collect()
        }
        (_, Some(filenames)) if !filenames.is_empty() => filenames
            .into_iter()
            .map(|filename| AudioArtifact::in_directory(fallback_dir, filename))
            .collect(),
        _ => {
            tracing::warn!("Randomized noise reply carried no files");
            Vec::new()
        }
    }
}

/// Outcome of a post-processing round that produced at least one artifact,
/// or that had nothing to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseMixReport {
    attempted: usize,
    failed: usize,
    artifacts: Vec<AudioArtifact>,
}

impl NoiseMixReport {
    fn from_fan_out(report: FanOutReport<AudioArtifact>) -> Self {
        Self {
            attempted: report.total(),
            failed: report.failed(),
            artifacts: report.into_results(),
        }
    }

    const fn empty() -> Self {
        Self {
            attempted: 0,
            failed: 0,
            artifacts: Vec::new(),
        }
    }

    /// Number of post-processing requests issued.
    pub const fn attempted(&self) -> usize {
        self.attempted
    }

    /// Number of requests that failed.
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Noise-mixed artifacts, in arrival order.
    pub fn artifacts(&self) -> &[AudioArtifact] {
        &self.artifacts
    }

    /// Consume the report, keeping the artifacts.
    pub fn into_artifacts(self) -> Vec<AudioArtifact> {
        self.artifacts
    }

    /// The partial-failure caveat, if any request failed.
    pub fn caveat(&self) -> Option<PipelineError> {
        if self.failed > 0 {
            Some(PipelineError::PartialNoiseMixFailure {
                attempted: self.attempted,
                failed: self.failed,
            })
        } else {
            None
        }
    }
}

/// Fans noise-mixing requests out over a job's artifacts.
#[derive(Clone)]
pub struct NoiseMixCoordinator {
    backend: Arc<dyn TtsBackendPort>,
    reporter: Arc<dyn StatusReporter>,
    random_noise_dir: String,
}

impl NoiseMixCoordinator {
    /// Create a coordinator writing status lines to `reporter`.
    pub fn new(backend: Arc<dyn TtsBackendPort>, reporter: Arc<dyn StatusReporter>) -> Self {
        Self {
            backend,
            reporter,
            random_noise_dir: DEFAULT_RANDOM_NOISE_DIR.to_string(),
        }
    }

    /// Override the randomized-mode fallback directory.
    #[must_use]
    pub fn with_random_noise_dir(mut self, dir: impl Into<String>) -> Self {
        self.random_noise_dir = dir.into();
        self
    }

    /// Run one post-processing round.
    ///
    /// Returns an empty report without touching the reporter when there is
    /// nothing to do. Fails with [`PipelineError::NoiseMixFailed`] only when
    /// every request failed or produced nothing; partial failure is reported
    /// as success and exposed through [`NoiseMixReport::caveat`].
    pub async fn mix(
        &self,
        artifacts: &[AudioArtifact],
        mode: &NoiseMode,
    ) -> Result<NoiseMixReport, PipelineError> {
        self.mix_reporting_to(artifacts, mode, self.reporter.as_ref())
            .await
    }

    /// [`mix`](Self::mix) with status lines sent to `reporter` instead.
    pub(crate) async fn mix_reporting_to(
        &self,
        artifacts: &[AudioArtifact],
        mode: &NoiseMode,
        reporter: &dyn StatusReporter,
    ) -> Result<NoiseMixReport, PipelineError> {
        if artifacts.is_empty() || !mode.is_enabled() {
            return Ok(NoiseMixReport::empty());
        }

        let paths: Vec<String> = artifacts.iter().map(|a| a.path().to_string()).collect();
        tracing::info!(mode = mode.label(), total = paths.len(), "Starting noise mixing");

        let (report, noun) = match mode {
            NoiseMode::None => return Ok(NoiseMixReport::empty()),
            NoiseMode::FixedType { noise_type, snr_db } => {
                reporter
                    .report(StatusMessage::processing("Adding noise, please wait..."));
                (self.mix_fixed(paths, noise_type, *snr_db).await, "noise")
            }
            NoiseMode::Randomized { count, snr_db } => {
                reporter
                    .report(StatusMessage::processing("Adding random noise, please wait..."));
                (self.mix_random(paths, *count, *snr_db).await, "random noise")
            }
        };

        let report = NoiseMixReport::from_fan_out(report);
        if report.artifacts.is_empty() {
            let err = PipelineError::NoiseMixFailed {
                attempted: report.attempted,
            };
            tracing::warn!(attempted = report.attempted, "Noise mixing produced no files");
            reporter.report(StatusMessage::error(err.to_string()));
            return Err(err);
        }

        let mut text = format!("Added {noun} to {} file(s)", report.artifacts.len());
        if let Some(caveat) = report.caveat() {
            text.push('\n');
            text.push_str(&caveat.to_string());
        }
        reporter.report(StatusMessage::success(text));
        Ok(report)
    }

    async fn mix_fixed(
        &self,
        paths: Vec<String>,
        noise_type: &str,
        snr_db: i32,
    ) -> FanOutReport<AudioArtifact> {
        let backend = &self.backend;
        FanOutBarrier::run(paths, move |audio_path| async move {
            let request = FixedMixRequest {
                audio_path,
                noise_type: noise_type.to_string(),
                snr_db,
            };
            backend.mix_noise(&request).await.map(Some)
        })
        .await
    }

    async fn mix_random(
        &self,
        paths: Vec<String>,
        count: u32,
        snr_db: i32,
    ) -> FanOutReport<AudioArtifact> {
        let backend = &self.backend;
        let fallback_dir = self.random_noise_dir.as_str();
        FanOutBarrier::run(paths, move |audio_path| async move {
            let request = RandomMixRequest {
                audio_path,
                count,
                snr_db,
            };
            backend
                .mix_random_noise(&request)
                .await
                .map(|reply| normalize_random_reply(reply, fallback_dir))
        })
        .await
    }
}

impl std::fmt::Debug for NoiseMixCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseMixCoordinator")
            .field("random_noise_dir", &self.random_noise_dir)
            .finish_non_exhaustive()
    }
}
