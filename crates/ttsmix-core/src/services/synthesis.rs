//! Synthesis orchestrator: submit, interpret, then hand off to noise mixing.

use std::sync::Arc;

use super::PipelineConfig;
use super::noise_mix::{NoiseMixCoordinator, NoiseMixReport};
use crate::domain::{NoiseMode, SynthesisInput, SynthesisParams};
use crate::error::{PipelineError, PipelineResult};
use crate::job::{
    CancellableRequest, JobLease, JobOutcome, JobSnapshot, JobStateMachine, JobTicket,
    RequestError, SynthesisResult,
};
use crate::ports::{
    BackendError, StatusMessage, StatusReporter, SynthesisRequest, TtsBackendPort,
};

/// Everything needed to run one pipeline pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisJob {
    /// Text and/or file to synthesize.
    pub input: SynthesisInput,
    /// Generation parameters.
    pub params: SynthesisParams,
    /// Post-processing to apply on success.
    pub noise: NoiseMode,
}

impl SynthesisJob {
    /// A job with default parameters and no noise mixing.
    pub fn new(input: SynthesisInput) -> Self {
        Self {
            input,
            params: SynthesisParams::default(),
            noise: NoiseMode::None,
        }
    }

    /// Set the generation parameters.
    #[must_use]
    pub fn with_params(mut self, params: SynthesisParams) -> Self {
        self.params = params;
        self
    }

    /// Set the noise mode.
    #[must_use]
    pub fn with_noise(mut self, noise: NoiseMode) -> Self {
        self.noise = noise;
        self
    }

    fn validate(&self) -> PipelineResult<()> {
        self.input.ensure_present()?;
        self.params.validate()?;
        self.noise.validate()
    }
}

/// What happened to the post-processing stage of a successful job.
#[derive(Debug, Clone, PartialEq)]
pub enum NoiseStage {
    /// No noise mode selected, or synthesis produced no artifacts.
    Skipped,
    /// At least one noise-mixed artifact was produced.
    Mixed(NoiseMixReport),
    /// Every noise-mixing request failed or produced nothing.
    Failed(PipelineError),
}

/// Terminal outcome of one pipeline pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Synthesis succeeded. The noise stage never reverts this.
    Succeeded {
        /// Synthesis result as recorded on the job.
        synthesis: SynthesisResult,
        /// Post-processing outcome.
        noise: NoiseStage,
    },
    /// Synthesis was rejected or the transport failed.
    Failed(PipelineError),
    /// The job was cancelled or cleared while in flight.
    Cancelled,
}

impl RunOutcome {
    /// Whether synthesis succeeded.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// One accepted submission and how it ended.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    /// Lease the job ran under.
    pub lease: JobLease,
    /// Terminal outcome.
    pub outcome: RunOutcome,
}

/// Drives a job from submission through optional noise mixing.
///
/// Holds its own [`JobStateMachine`]; separate orchestrators never share a
/// job unless built with the same one via [`with_job`](Self::with_job).
pub struct SynthesisOrchestrator {
    backend: Arc<dyn TtsBackendPort>,
    reporter: Arc<dyn StatusReporter>,
    job: JobStateMachine,
    noise: NoiseMixCoordinator,
}

impl SynthesisOrchestrator {
    /// Create an orchestrator with default settings and a fresh job.
    pub fn new(backend: Arc<dyn TtsBackendPort>, reporter: Arc<dyn StatusReporter>) -> Self {
        let noise = NoiseMixCoordinator::new(Arc::clone(&backend), Arc::clone(&reporter));
        Self {
            backend,
            reporter,
            job: JobStateMachine::new(),
            noise,
        }
    }

    /// Apply pipeline settings.
    #[must_use]
    pub fn with_config(mut self, config: &PipelineConfig) -> Self {
        self.noise = self.noise.with_random_noise_dir(config.random_noise_dir());
        self
    }

    /// Track submissions on an existing job handle.
    #[must_use]
    pub fn with_job(mut self, job: JobStateMachine) -> Self {
        self.job = job;
        self
    }

    /// The job this orchestrator drives.
    pub const fn job(&self) -> &JobStateMachine {
        &self.job
    }

    /// Read-only view of the current job.
    pub fn snapshot(&self) -> JobSnapshot {
        self.job.snapshot()
    }

    /// Run one pipeline pass.
    ///
    /// Returns `Err` only for conditions detected before any request is sent
    /// (`NoInput`, `InvalidParameter`, `AlreadyRunning`); each is also
    /// reported as an error status. Every other ending is an `Ok` run whose
    /// outcome has already been reported.
    pub async fn synthesize(&self, job: SynthesisJob) -> PipelineResult<PipelineRun> {
        if let Err(e) = job.validate() {
            self.reporter.report(StatusMessage::error(e.to_string()));
            return Err(e);
        }

        let ticket = match self.job.submit() {
            Ok(ticket) => ticket,
            Err(e) => {
                self.reporter.report(StatusMessage::error(e.to_string()));
                return Err(e);
            }
        };

        self.reporter
            .report(StatusMessage::processing("Synthesizing speech, please wait..."));

        let SynthesisJob { input, params, noise } = job;
        let request = SynthesisRequest { input, params };

        let reply = CancellableRequest::for_ticket(&ticket)
            .start(self.backend.synthesize(&request))
            .await;

        let outcome = match reply {
            Ok(reply) => self.on_synthesized(&ticket, reply.into(), &noise).await,
            Err(RequestError::Cancelled) => self.on_cancelled(&ticket),
            Err(RequestError::Failed(e)) => self.on_failed(&ticket, e),
        };

        Ok(PipelineRun {
            lease: ticket.lease(),
            outcome,
        })
    }

    /// Cancel the running job.
    ///
    /// The in-flight request settles as cancelled and its `synthesize` call
    /// reports the terminal status. Returns `false` if nothing was running.
    pub fn cancel(&self) -> bool {
        // Announced before the token fires so the terminal status lands last
        self.job.cancel_with(|| {
            self.reporter
                .report(StatusMessage::processing("Cancelling speech synthesis..."));
        })
    }

    /// Clear the job: cancel if running, drop every result and the status.
    pub fn clear(&self) {
        self.job.reset();
        self.reporter.clear();
    }

    async fn on_synthesized(
        &self,
        ticket: &JobTicket,
        result: SynthesisResult,
        noise: &NoiseMode,
    ) -> RunOutcome {
        if !self.job.succeed(ticket, result.clone()) {
            // Cancelled or cleared after the response arrived
            return self.on_cancelled(ticket);
        }
        let status = LeaseReporter {
            inner: self.reporter.as_ref(),
            job: &self.job,
            ticket,
        };

        tracing::info!(
            job = %ticket.lease(),
            files = result.artifacts.len(),
            output_dir = %result.output_dir,
            seconds = result.total_processing_time,
            "Synthesis succeeded"
        );
        status.report(StatusMessage::success(format!(
            "Synthesized {} audio file(s)",
            result.success_count
        )));

        if !noise.is_enabled() || result.artifacts.is_empty() {
            return RunOutcome::Succeeded {
                synthesis: result,
                noise: NoiseStage::Skipped,
            };
        }

        let mixed = self
            .noise
            .mix_reporting_to(&result.artifacts, noise, &status)
            .await;
        let stage = match mixed {
            Ok(report) if self.job.record_noise_results(ticket, report.artifacts().to_vec()) => {
                NoiseStage::Mixed(report)
            }
            Err(e) if self.job.is_current(ticket) => NoiseStage::Failed(e),
            _ => {
                tracing::info!(job = %ticket.lease(), "Job cleared during noise mixing; results dropped");
                return RunOutcome::Cancelled;
            }
        };

        RunOutcome::Succeeded {
            synthesis: result,
            noise: stage,
        }
    }

    fn on_cancelled(&self, ticket: &JobTicket) -> RunOutcome {
        self.job.complete(ticket, JobOutcome::Cancelled);
        // A cleared job has no status to show
        self.job.while_current(ticket, || {
            self.reporter
                .report(StatusMessage::success(PipelineError::Cancelled.to_string()));
        });
        tracing::info!(job = %ticket.lease(), "Synthesis cancelled");
        RunOutcome::Cancelled
    }

    fn on_failed(&self, ticket: &JobTicket, error: BackendError) -> RunOutcome {
        let err = match error {
            BackendError::Rejected { message, details } => {
                PipelineError::SynthesisRejected { message, details }
            }
            other => PipelineError::network(other.to_string()),
        };
        tracing::warn!(job = %ticket.lease(), error = %err, "Synthesis failed");

        if self.job.complete(ticket, JobOutcome::Failed) {
            self.job.while_current(ticket, || {
                self.reporter
                    .report(StatusMessage::error(err.display_message()));
            });
        }
        RunOutcome::Failed(err)
    }
}

/// Forwards status only while the job still holds the ticket's lease.
struct LeaseReporter<'a> {
    inner: &'a dyn StatusReporter,
    job: &'a JobStateMachine,
    ticket: &'a JobTicket,
}

impl StatusReporter for LeaseReporter<'_> {
    fn report(&self, message: StatusMessage) {
        self.job
            .while_current(self.ticket, || self.inner.report(message));
    }

    fn clear(&self) {
        self.job.while_current(self.ticket, || self.inner.clear());
    }
}

impl std::fmt::Debug for SynthesisOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesisOrchestrator")
            .field("job", &self.job)
            .field("noise", &self.noise)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AudioArtifact, InputFile};
    use crate::ports::{
        BackendResult, FixedMixRequest, NoopStatusReporter, RandomMixReply, RandomMixRequest,
        SynthesisReply,
    };
    use async_trait::async_trait;

    struct StaticBackend;

    #[async_trait]
    impl TtsBackendPort for StaticBackend {
        async fn synthesize(&self, request: &SynthesisRequest) -> BackendResult<SynthesisReply> {
            let name = if request.input.input_file().is_some() {
                "file_1.wav"
            } else {
                "text_1.wav"
            };
            Ok(SynthesisReply {
                audio_files: vec![AudioArtifact::in_directory("output/run", name)],
                success_count: 1,
                total_processing_time: 0.4,
                output_dir: "output/run".to_string(),
            })
        }

        async fn mix_noise(&self, _: &FixedMixRequest) -> BackendResult<AudioArtifact> {
            Err(BackendError::network("unused"))
        }

        async fn mix_random_noise(&self, _: &RandomMixRequest) -> BackendResult<RandomMixReply> {
            Err(BackendError::network("unused"))
        }

        async fn request_batch_archive(&self, _: &[AudioArtifact]) -> BackendResult<String> {
            Err(BackendError::network("unused"))
        }

        async fn request_output_dir_archive(&self, _: &str) -> BackendResult<String> {
            Err(BackendError::network("unused"))
        }

        async fn fetch_audio(&self, _: &str) -> BackendResult<Vec<u8>> {
            Err(BackendError::network("unused"))
        }

        async fn fetch_archive(&self, _: &str) -> BackendResult<Vec<u8>> {
            Err(BackendError::network("unused"))
        }
    }

    fn orchestrator() -> SynthesisOrchestrator {
        SynthesisOrchestrator::new(Arc::new(StaticBackend), Arc::new(NoopStatusReporter::new()))
    }

    #[tokio::test]
    async fn test_no_input_is_rejected_before_submission() {
        let orch = orchestrator();
        let err = orch
            .synthesize(SynthesisJob::new(SynthesisInput::text("   ")))
            .await
            .unwrap_err();
        assert_eq!(err, PipelineError::NoInput);
        assert!(orch.snapshot().lease.is_none());
    }

    #[tokio::test]
    async fn test_invalid_params_are_rejected() {
        let orch = orchestrator();
        let params = SynthesisParams::default().with_speed(0.0);
        let err = orch
            .synthesize(SynthesisJob::new(SynthesisInput::text("hi")).with_params(params))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidParameter { name: "speed", .. }));
    }

    #[tokio::test]
    async fn test_file_only_input_is_accepted() {
        let orch = orchestrator();
        let input = SynthesisInput::file(InputFile::new("lines.txt", b"hello\nworld".to_vec()));
        let run = orch.synthesize(SynthesisJob::new(input)).await.unwrap();
        match run.outcome {
            RunOutcome::Succeeded { synthesis, noise } => {
                assert_eq!(synthesis.artifacts[0].filename(), "file_1.wav");
                assert_eq!(noise, NoiseStage::Skipped);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_records_output_dir() {
        let orch = orchestrator();
        let run = orch
            .synthesize(SynthesisJob::new(SynthesisInput::text("hello")))
            .await
            .unwrap();
        assert!(run.outcome.is_success());
        assert_eq!(orch.job().output_dir().as_deref(), Some("output/run"));
    }

    #[tokio::test]
    async fn test_cancel_when_idle_returns_false() {
        let orch = orchestrator();
        assert!(!orch.cancel());
    }

    #[tokio::test]
    async fn test_clear_discards_results() {
        let orch = orchestrator();
        orch.synthesize(SynthesisJob::new(SynthesisInput::text("hello")))
            .await
            .unwrap();
        orch.clear();
        assert!(orch.job().output_dir().is_none());
    }
}
