#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod fanout;
pub mod job;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    AudioArtifact, DEFAULT_RANDOM_COUNT, DEFAULT_SNR_DB, InputFile, NoiseMode, SynthesisInput,
    SynthesisParams,
};
pub use error::{PipelineError, PipelineResult};
pub use fanout::{FanOutBarrier, FanOutReport};
pub use job::{
    CancellableRequest, JobLease, JobOutcome, JobSnapshot, JobState, JobStateMachine, JobTicket,
    RequestError, SynthesisResult,
};
pub use ports::{
    BackendError, BackendResult, FixedMixRequest, NoopStatusReporter, RandomMixReply,
    RandomMixRequest, StatusKind, StatusMessage, StatusReporter, SynthesisReply, SynthesisRequest,
    TtsBackendPort,
};
pub use services::{
    DEFAULT_RANDOM_NOISE_DIR, DEFAULT_STATUS_CLEAR_DELAY, NoiseMixCoordinator, NoiseMixReport,
    NoiseStage, PipelineConfig, PipelineRun, RunOutcome, StatusBoard, SynthesisJob,
    SynthesisOrchestrator, normalize_random_reply,
};

// Silence unused dev-dependency warnings; mocks live in the integration tests
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tokio_test as _;
