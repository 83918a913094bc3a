//! Single-job lifecycle tracking.
//!
//! ```text
//!   Idle ──submit──► Running ──complete──► Succeeded | Failed | Cancelled
//!    ▲                  │                              │
//!    │                cancel ──────────► Cancelled     │
//!    └──────────── reset / acknowledge ◄───────────────┘
//! ```
//!
//! Every submission mints a new [`JobLease`]. Completions and result updates
//! carry the lease they were issued with; anything that does not match the
//! current lease is dropped, so a late response from a cancelled or cleared
//! job can never touch a newer one.

mod cancel;

pub use cancel::{CancellableRequest, RequestError};

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::domain::AudioArtifact;
use crate::error::PipelineError;
use crate::ports::SynthesisReply;

/// Lifecycle state of the current job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// No job, ready for a submission.
    Idle,
    /// A synthesis request is in flight.
    Running,
    /// Synthesis finished and produced artifacts.
    Succeeded,
    /// Synthesis was rejected or the transport failed.
    Failed,
    /// The user cancelled the job.
    Cancelled,
}

impl JobState {
    /// Whether the job reached an end state.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    /// Whether a new submission is accepted in this state.
    pub const fn accepts_submission(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Terminal outcome reported by the holder of the active lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobOutcome {
    /// Synthesis produced artifacts.
    Succeeded,
    /// Synthesis was rejected or failed in transport.
    Failed,
    /// The request settled as cancelled.
    Cancelled,
}

impl From<JobOutcome> for JobState {
    fn from(outcome: JobOutcome) -> Self {
        match outcome {
            JobOutcome::Succeeded => Self::Succeeded,
            JobOutcome::Failed => Self::Failed,
            JobOutcome::Cancelled => Self::Cancelled,
        }
    }
}

/// Generation number minted for each accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct JobLease(u64);

impl JobLease {
    /// Raw generation number.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Handed to the submitter of an accepted job.
///
/// The ticket is the only way to complete the job or attach results to it.
#[derive(Debug, Clone)]
pub struct JobTicket {
    lease: JobLease,
    token: CancellationToken,
}

impl JobTicket {
    /// Lease of the job this ticket belongs to.
    pub const fn lease(&self) -> JobLease {
        self.lease
    }

    /// Cancellation token of the job.
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Whether the job's token has been signaled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// What a successful synthesis left behind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisResult {
    /// Synthesized artifacts, one per text unit.
    pub artifacts: Vec<AudioArtifact>,
    /// Server directory holding this job's outputs.
    pub output_dir: String,
    /// Number of units the server synthesized.
    pub success_count: usize,
    /// Server-side wall time in seconds.
    pub total_processing_time: f64,
}

impl From<SynthesisReply> for SynthesisResult {
    fn from(reply: SynthesisReply) -> Self {
        Self {
            artifacts: reply.audio_files,
            output_dir: reply.output_dir,
            success_count: reply.success_count,
            total_processing_time: reply.total_processing_time,
        }
    }
}

/// Read-only view of the current job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSnapshot {
    /// Lifecycle state.
    pub state: JobState,
    /// Lease of the job the state refers to, if any.
    pub lease: Option<JobLease>,
    /// Synthesis result, once the job succeeded.
    pub result: Option<SynthesisResult>,
    /// Noise-mixed artifacts recorded for this job.
    pub noise_artifacts: Vec<AudioArtifact>,
}

impl JobSnapshot {
    /// Output directory reference of the current job.
    pub fn output_dir(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.output_dir.as_str())
    }
}

#[derive(Debug)]
struct JobInner {
    state: JobState,
    /// Lease of the job the current state and results belong to.
    current: Option<JobLease>,
    /// Token of the running job; `Some` only while `Running`.
    token: Option<CancellationToken>,
    next_lease: u64,
    result: Option<SynthesisResult>,
    noise_artifacts: Vec<AudioArtifact>,
}

impl JobInner {
    const fn new() -> Self {
        Self {
            state: JobState::Idle,
            current: None,
            token: None,
            next_lease: 1,
            result: None,
            noise_artifacts: Vec::new(),
        }
    }

    fn holds(&self, lease: JobLease) -> bool {
        self.current == Some(lease)
    }

    fn is_running_under(&self, lease: JobLease) -> bool {
        self.state == JobState::Running && self.holds(lease)
    }

    /// Signal the running job's token and mark it cancelled.
    fn cancel_running(&mut self) -> bool {
        if self.state != JobState::Running {
            return false;
        }
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.state = JobState::Cancelled;
        true
    }
}

/// Owner of the "at most one running job" invariant.
///
/// Cloning yields another handle to the same job; independent instances do
/// not interfere. The lock is never held across an `.await`.
#[derive(Debug, Clone)]
pub struct JobStateMachine {
    inner: Arc<Mutex<JobInner>>,
}

impl Default for JobStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl JobStateMachine {
    /// Create an idle job.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(JobInner::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, JobInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accept a new submission.
    ///
    /// Fails with [`PipelineError::AlreadyRunning`] without side effects if a
    /// job is running. Otherwise discards the previous job's results, moves to
    /// `Running` and returns a ticket carrying a fresh token.
    pub fn submit(&self) -> Result<JobTicket, PipelineError> {
        let mut inner = self.lock();
        if !inner.state.accepts_submission() {
            tracing::debug!(current = ?inner.current, "Submission rejected: job already running");
            return Err(PipelineError::AlreadyRunning);
        }

        let lease = JobLease(inner.next_lease);
        inner.next_lease += 1;

        let token = CancellationToken::new();
        inner.state = JobState::Running;
        inner.current = Some(lease);
        inner.token = Some(token.clone());
        inner.result = None;
        inner.noise_artifacts.clear();

        tracing::info!(job = %lease, "Job started");
        Ok(JobTicket { lease, token })
    }

    /// Cancel the running job.
    ///
    /// Signals the token and moves to `Cancelled` immediately. Returns
    /// `false` (and does nothing) when no job is running.
    pub fn cancel(&self) -> bool {
        self.cancel_with(|| {})
    }

    /// Cancel the running job, calling `announce` before the token fires.
    ///
    /// `announce` runs under the job lock, so whatever the cancelled task
    /// does on wake-up is ordered after it. Not called when nothing runs.
    pub fn cancel_with(&self, announce: impl FnOnce()) -> bool {
        let mut inner = self.lock();
        if inner.state != JobState::Running {
            return false;
        }
        announce();
        inner.cancel_running();
        tracing::info!(job = ?inner.current, "Job cancelled");
        true
    }

    /// Move the running job to a terminal state.
    ///
    /// Ignored (returns `false`) unless the ticket holds the active lease and
    /// the job is still running.
    pub fn complete(&self, ticket: &JobTicket, outcome: JobOutcome) -> bool {
        let mut inner = self.lock();
        if !inner.is_running_under(ticket.lease) {
            tracing::debug!(job = %ticket.lease, ?outcome, "Ignoring stale completion (lease mismatch)");
            return false;
        }
        inner.state = outcome.into();
        inner.token = None;
        tracing::info!(job = %ticket.lease, state = %inner.state, "Job finished");
        true
    }

    /// Record a synthesis result and move the running job to `Succeeded`.
    ///
    /// Same lease rules as [`complete`](Self::complete).
    pub fn succeed(&self, ticket: &JobTicket, result: SynthesisResult) -> bool {
        let mut inner = self.lock();
        if !inner.is_running_under(ticket.lease) {
            tracing::debug!(job = %ticket.lease, "Ignoring stale result (lease mismatch)");
            return false;
        }
        inner.state = JobState::Succeeded;
        inner.token = None;
        inner.result = Some(result);
        tracing::info!(job = %ticket.lease, "Job succeeded");
        true
    }

    /// Attach noise-mixed artifacts to the job that succeeded under `ticket`.
    ///
    /// Dropped if the job has since been cleared or replaced.
    pub fn record_noise_results(&self, ticket: &JobTicket, artifacts: Vec<AudioArtifact>) -> bool {
        let mut inner = self.lock();
        if !inner.holds(ticket.lease) || inner.result.is_none() {
            tracing::debug!(job = %ticket.lease, "Ignoring stale noise results (lease mismatch)");
            return false;
        }
        inner.noise_artifacts = artifacts;
        true
    }

    /// Return a terminal job to `Idle`, keeping its results.
    ///
    /// Used when the terminal status has been seen. No effect while running.
    pub fn acknowledge(&self) -> bool {
        let mut inner = self.lock();
        if !inner.state.is_terminal() {
            return false;
        }
        inner.state = JobState::Idle;
        true
    }

    /// Clear the job entirely.
    ///
    /// Cancels first if running, then returns to `Idle` and discards the
    /// token, the lease and every stored result.
    pub fn reset(&self) {
        let mut inner = self.lock();
        if inner.cancel_running() {
            tracing::info!(job = ?inner.current, "Job cancelled by reset");
        }
        inner.state = JobState::Idle;
        inner.current = None;
        inner.token = None;
        inner.result = None;
        inner.noise_artifacts.clear();
    }

    /// Whether `ticket` still belongs to the current job.
    ///
    /// Stays true after the job reached a terminal state, until the next
    /// submission or a reset.
    pub fn is_current(&self, ticket: &JobTicket) -> bool {
        self.lock().holds(ticket.lease)
    }

    /// Run `f` only while `ticket` still belongs to the current job.
    ///
    /// The lock is held for the call: a concurrent reset lands either before
    /// (and `f` is skipped) or after. `f` must not call back into the job.
    pub fn while_current(&self, ticket: &JobTicket, f: impl FnOnce()) -> bool {
        let inner = self.lock();
        if !inner.holds(ticket.lease) {
            return false;
        }
        f();
        true
    }

    /// Current lifecycle state.
    pub fn state(&self) -> JobState {
        self.lock().state
    }

    /// Whether a job is running.
    pub fn is_running(&self) -> bool {
        self.state() == JobState::Running
    }

    /// Output directory reference of the current job.
    pub fn output_dir(&self) -> Option<String> {
        self.lock().result.as_ref().map(|r| r.output_dir.clone())
    }

    /// Read-only view of the current job.
    pub fn snapshot(&self) -> JobSnapshot {
        let inner = self.lock();
        JobSnapshot {
            state: inner.state,
            lease: inner.current,
            result: inner.result.clone(),
            noise_artifacts: inner.noise_artifacts.clone(),
        }
    }
}
