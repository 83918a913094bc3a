//! Text-to-speech backend port trait and its DTOs.

use async_trait::async_trait;

use super::error::BackendResult;
use crate::domain::{AudioArtifact, SynthesisInput, SynthesisParams};

/// A synthesis submission: the input plus the full parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    /// Text and/or file to synthesize.
    pub input: SynthesisInput,
    /// Generation parameters.
    pub params: SynthesisParams,
}

/// Successful synthesis answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisReply {
    /// One artifact per successfully synthesized text unit.
    pub audio_files: Vec<AudioArtifact>,
    /// Number of units the server synthesized.
    pub success_count: usize,
    /// Server-side wall time in seconds.
    pub total_processing_time: f64,
    /// Server directory holding this job's outputs.
    pub output_dir: String,
}

/// Fixed-type noise mixing for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedMixRequest {
    /// Server path of the source artifact.
    pub audio_path: String,
    /// Noise-type identifier.
    pub noise_type: String,
    /// Target SNR in dB.
    pub snr_db: i32,
}

/// Randomized noise mixing for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomMixRequest {
    /// Server path of the source artifact.
    pub audio_path: String,
    /// Number of noise-mixed outputs requested.
    pub count: u32,
    /// Target SNR in dB.
    pub snr_db: i32,
}

/// Successful randomized-mix answer, in whichever shape the server chose.
///
/// Either array may be absent. Use
/// [`normalize_random_reply`](crate::services::normalize_random_reply) to turn
/// this into artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RandomMixReply {
    /// Server paths of the generated files.
    pub paths: Option<Vec<String>>,
    /// Filenames of the generated files, parallel to `paths` when both exist.
    pub filenames: Option<Vec<String>>,
}

/// Port trait for the remote text-to-speech service.
///
/// # Design
///
/// - Uses core-owned DTOs, not wire types
/// - Returns [`BackendError`](super::BackendError) for all failures
/// - Dropping a returned future must abort the underlying request
#[async_trait]
pub trait TtsBackendPort: Send + Sync {
    /// Submit text and/or a file for synthesis.
    async fn synthesize(&self, request: &SynthesisRequest) -> BackendResult<SynthesisReply>;

    /// Mix a named noise type into one artifact.
    async fn mix_noise(&self, request: &FixedMixRequest) -> BackendResult<AudioArtifact>;

    /// Mix `count` randomly chosen noises into one artifact.
    async fn mix_random_noise(&self, request: &RandomMixRequest) -> BackendResult<RandomMixReply>;

    /// Ask the server to zip the given artifacts; returns the zip filename.
    async fn request_batch_archive(&self, artifacts: &[AudioArtifact]) -> BackendResult<String>;

    /// Ask the server to zip a whole output directory; returns the zip filename.
    async fn request_output_dir_archive(&self, output_dir: &str) -> BackendResult<String>;

    /// Download the bytes of one audio file.
    async fn fetch_audio(&self, path: &str) -> BackendResult<Vec<u8>>;

    /// Download a zip previously prepared by one of the archive requests.
    async fn fetch_archive(&self, zip_filename: &str) -> BackendResult<Vec<u8>>;
}
