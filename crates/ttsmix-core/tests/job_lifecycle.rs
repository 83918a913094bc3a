//! Integration tests for the job lifecycle through the orchestrator.
//!
//! # What is tested
//!
//! - A submission while a job is running never reaches the backend
//! - Cancelling a running job ends it as `Cancelled`, never `Failed`
//! - The cancel announcement never lands after the terminal status
//! - Clearing a running job cancels, resets and leaves no stale lease
//! - Server rejections and transport failures map to distinct errors

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{FakeBackend, RecordingReporter, reply_with};
use mockall::mock;
use tokio_test::{assert_err, assert_ok};
use ttsmix_core::{
    AudioArtifact, BackendError, BackendResult, FixedMixRequest, JobOutcome, JobState,
    JobStateMachine, PipelineError, RandomMixReply, RandomMixRequest, RunOutcome, StatusKind,
    StatusMessage, StatusReporter, SynthesisInput, SynthesisJob, SynthesisOrchestrator,
    SynthesisReply, SynthesisRequest, SynthesisResult, TtsBackendPort,
};

mock! {
    pub Backend {}

    #[async_trait]
    impl TtsBackendPort for Backend {
        async fn synthesize(&self, request: &SynthesisRequest) -> BackendResult<SynthesisReply>;
        async fn mix_noise(&self, request: &FixedMixRequest) -> BackendResult<AudioArtifact>;
        async fn mix_random_noise(&self, request: &RandomMixRequest) -> BackendResult<RandomMixReply>;
        async fn request_batch_archive(&self, artifacts: &[AudioArtifact]) -> BackendResult<String>;
        async fn request_output_dir_archive(&self, output_dir: &str) -> BackendResult<String>;
        async fn fetch_audio(&self, path: &str) -> BackendResult<Vec<u8>>;
        async fn fetch_archive(&self, zip_filename: &str) -> BackendResult<Vec<u8>>;
    }
}

fn text_job(text: &str) -> SynthesisJob {
    SynthesisJob::new(SynthesisInput::text(text))
}

async fn wait_until_running(job: &JobStateMachine) {
    while !job.is_running() {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn already_running_never_reaches_backend() {
    let mut backend = MockBackend::new();
    backend.expect_synthesize().never();

    let job = JobStateMachine::new();
    let _held = assert_ok!(job.submit());

    let reporter = Arc::new(RecordingReporter::default());
    let orch = SynthesisOrchestrator::new(Arc::new(backend), reporter.clone()).with_job(job);

    let err = assert_err!(orch.synthesize(text_job("hello")).await);
    assert_eq!(err, PipelineError::AlreadyRunning);
    assert_eq!(reporter.last().unwrap().kind, StatusKind::Error);
    assert_eq!(orch.job().state(), JobState::Running);
}

#[tokio::test]
async fn concurrent_submission_issues_one_request() {
    let backend = Arc::new(FakeBackend::new(reply_with("a", 1)).gated());
    let reporter = Arc::new(RecordingReporter::default());
    let orch = SynthesisOrchestrator::new(backend.clone(), reporter);

    let (first, second) = tokio::join!(orch.synthesize(text_job("first")), async {
        wait_until_running(orch.job()).await;
        let second = orch.synthesize(text_job("second")).await;
        backend.release();
        second
    });

    assert!(assert_ok!(first).outcome.is_success());
    assert_eq!(assert_err!(second), PipelineError::AlreadyRunning);
    assert_eq!(backend.synth_calls(), 1);
}

#[tokio::test]
async fn cancel_while_pending_ends_as_cancelled_not_failed() {
    // The pending reply is a failure; the cancel settles the request first
    let backend = Arc::new(
        FakeBackend::with_result(Err(BackendError::network("AbortError: aborted"))).gated(),
    );
    let reporter = Arc::new(RecordingReporter::default());
    let orch = SynthesisOrchestrator::new(backend.clone(), reporter.clone());

    let (run, cancelled) = tokio::join!(orch.synthesize(text_job("hello")), async {
        wait_until_running(orch.job()).await;
        let cancelled = orch.cancel();
        backend.release();
        cancelled
    });

    assert!(cancelled);
    let run = assert_ok!(run);
    assert_eq!(run.outcome, RunOutcome::Cancelled);
    assert_eq!(orch.job().state(), JobState::Cancelled);

    // Cancellation is reported, but never as an error
    assert_eq!(reporter.count(StatusKind::Error), 0);
    let last = reporter.last().unwrap();
    assert_eq!(last.kind, StatusKind::Success);
    assert_eq!(last.text, "Speech synthesis cancelled");
}

/// Stalls on the cancel announcement, as a preempted caller would.
#[derive(Default)]
struct StallingReporter {
    inner: RecordingReporter,
}

impl StatusReporter for StallingReporter {
    fn report(&self, message: StatusMessage) {
        if message.text.starts_with("Cancelling") {
            std::thread::sleep(Duration::from_millis(50));
        }
        self.inner.report(message);
    }

    fn clear(&self) {
        self.inner.clear();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancel_announcement_precedes_terminal_status() {
    let backend = Arc::new(FakeBackend::new(reply_with("a", 1)).gated());
    let reporter = Arc::new(StallingReporter::default());
    let orch = Arc::new(SynthesisOrchestrator::new(backend, reporter.clone()));

    let running = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.synthesize(text_job("hello")).await }
    });
    wait_until_running(orch.job()).await;

    let canceller = Arc::clone(&orch);
    assert!(assert_ok!(
        tokio::task::spawn_blocking(move || canceller.cancel()).await
    ));

    let run = assert_ok!(assert_ok!(running.await));
    assert_eq!(run.outcome, RunOutcome::Cancelled);

    let texts: Vec<String> = reporter
        .inner
        .messages()
        .into_iter()
        .map(|m| m.text)
        .collect();
    assert_eq!(
        texts,
        [
            "Synthesizing speech, please wait...",
            "Cancelling speech synthesis...",
            "Speech synthesis cancelled",
        ]
    );
    assert_eq!(reporter.inner.last().unwrap().kind, StatusKind::Success);
}

#[tokio::test]
async fn cancelled_job_accepts_new_submission() {
    let backend = Arc::new(FakeBackend::new(reply_with("b", 2)).gated());
    let orch = SynthesisOrchestrator::new(backend.clone(), Arc::new(RecordingReporter::default()));

    let (first, ()) = tokio::join!(orch.synthesize(text_job("one")), async {
        wait_until_running(orch.job()).await;
        orch.cancel();
    });
    assert_eq!(assert_ok!(first).outcome, RunOutcome::Cancelled);

    let (second, ()) = tokio::join!(orch.synthesize(text_job("two")), async {
        wait_until_running(orch.job()).await;
        backend.release();
    });
    let second = assert_ok!(second);
    assert!(second.outcome.is_success());
    assert_eq!(orch.job().state(), JobState::Succeeded);
}

#[tokio::test]
async fn clear_while_running_cancels_and_resets() {
    let backend = Arc::new(FakeBackend::new(reply_with("c", 1)).gated());
    let reporter = Arc::new(RecordingReporter::default());
    let orch = SynthesisOrchestrator::new(backend.clone(), reporter.clone());

    let (run, ()) = tokio::join!(orch.synthesize(text_job("hello")), async {
        wait_until_running(orch.job()).await;
        orch.clear();
        backend.release();
    });

    assert_eq!(assert_ok!(run).outcome, RunOutcome::Cancelled);
    let snapshot = orch.snapshot();
    assert_eq!(snapshot.state, JobState::Idle);
    assert!(snapshot.lease.is_none());
    assert!(snapshot.output_dir().is_none());
    assert_eq!(reporter.clears(), 1);
    // A cleared job shows nothing, not even a cancellation notice
    assert_eq!(reporter.count(StatusKind::Success), 0);
}

#[tokio::test]
async fn stale_lease_cannot_touch_next_job() {
    let job = JobStateMachine::new();
    let stale = assert_ok!(job.submit());
    job.reset();

    let backend = Arc::new(FakeBackend::new(reply_with("fresh", 1)));
    let orch = SynthesisOrchestrator::new(backend, Arc::new(RecordingReporter::default()))
        .with_job(job.clone());
    let run = assert_ok!(orch.synthesize(text_job("hello")).await);
    assert!(run.lease > stale.lease());

    // Late response from the cleared job
    let late = SynthesisResult::from(reply_with("stale", 3));
    assert!(!job.succeed(&stale, late));
    assert!(!job.complete(&stale, JobOutcome::Failed));
    assert!(!job.record_noise_results(&stale, vec![AudioArtifact::new("x", "x")]));

    assert_eq!(job.state(), JobState::Succeeded);
    assert_eq!(job.output_dir().as_deref(), Some("output/fresh"));
}

#[tokio::test]
async fn rejection_carries_server_details() {
    let mut backend = MockBackend::new();
    backend.expect_synthesize().times(1).returning(|_| {
        Err(BackendError::Rejected {
            message: "No successful synthesis results".to_string(),
            details: vec!["line 2: unknown speaker".to_string()],
        })
    });

    let reporter = Arc::new(RecordingReporter::default());
    let orch = SynthesisOrchestrator::new(Arc::new(backend), reporter.clone());
    let run = assert_ok!(orch.synthesize(text_job("hello")).await);

    match run.outcome {
        RunOutcome::Failed(PipelineError::SynthesisRejected { message, details }) => {
            assert_eq!(message, "No successful synthesis results");
            assert_eq!(details, vec!["line 2: unknown speaker".to_string()]);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(orch.job().state(), JobState::Failed);

    let last = reporter.last().unwrap();
    assert_eq!(last.kind, StatusKind::Error);
    assert!(last.text.contains("line 2: unknown speaker"));
}

#[tokio::test]
async fn transport_failure_is_network_error() {
    let mut backend = MockBackend::new();
    backend.expect_synthesize().times(1).returning(|_| {
        Err(BackendError::Http {
            status: 502,
            endpoint: "/api/tts".to_string(),
        })
    });

    let orch = SynthesisOrchestrator::new(Arc::new(backend), Arc::new(RecordingReporter::default()));
    let run = assert_ok!(orch.synthesize(text_job("hello")).await);

    assert!(matches!(run.outcome, RunOutcome::Failed(PipelineError::Network { .. })));
    assert_eq!(orch.job().state(), JobState::Failed);
    assert!(assert_ok!(orch.job().submit()).lease() > run.lease);
}

#[tokio::test]
async fn every_terminal_outcome_reports_one_terminal_message() {
    let backend = Arc::new(FakeBackend::new(reply_with("d", 2)));
    let reporter = Arc::new(RecordingReporter::default());
    let orch = SynthesisOrchestrator::new(backend, reporter.clone());

    assert_ok!(orch.synthesize(text_job("hello")).await);

    let kinds: Vec<_> = reporter.messages().into_iter().map(|m| m.kind).collect();
    assert_eq!(kinds, vec![StatusKind::Processing, StatusKind::Success]);
}
