//! Shared fakes for the pipeline integration tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;
use ttsmix_core::{
    AudioArtifact, BackendError, BackendResult, FixedMixRequest, RandomMixReply,
    RandomMixRequest, StatusKind, StatusMessage, StatusReporter, SynthesisReply,
    SynthesisRequest, TtsBackendPort,
};

// ── Backend ────────────────────────────────────────────────────────

/// Backend with canned replies, call counters and an optional gate that
/// holds synthesis in flight until released.
pub struct FakeBackend {
    synth_reply: BackendResult<SynthesisReply>,
    random_reply: RandomMixReply,
    failing_paths: Vec<String>,
    gated: bool,
    gate: Notify,
    mix_gated: bool,
    mix_gate: Notify,
    synth_calls: AtomicUsize,
    mix_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new(reply: SynthesisReply) -> Self {
        Self::with_result(Ok(reply))
    }

    pub fn with_result(result: BackendResult<SynthesisReply>) -> Self {
        Self {
            synth_reply: result,
            random_reply: RandomMixReply::default(),
            failing_paths: Vec::new(),
            gated: false,
            gate: Notify::new(),
            mix_gated: false,
            mix_gate: Notify::new(),
            synth_calls: AtomicUsize::new(0),
            mix_calls: AtomicUsize::new(0),
        }
    }

    /// Hold every synthesis call until [`release`](Self::release).
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    /// Hold every noise-mixing call until [`release_mix`](Self::release_mix).
    pub fn gated_mix(mut self) -> Self {
        self.mix_gated = true;
        self
    }

    /// Make noise mixing of `path` fail with a network error.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing_paths.push(path.to_string());
        self
    }

    pub fn with_random_reply(mut self, reply: RandomMixReply) -> Self {
        self.random_reply = reply;
        self
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn release_mix(&self) {
        self.mix_gate.notify_waiters();
    }

    pub fn synth_calls(&self) -> usize {
        self.synth_calls.load(Ordering::SeqCst)
    }

    pub fn mix_calls(&self) -> usize {
        self.mix_calls.load(Ordering::SeqCst)
    }

    fn check_path(&self, path: &str) -> BackendResult<()> {
        if self.failing_paths.iter().any(|p| p == path) {
            Err(BackendError::network(format!("connection reset while mixing {path}")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TtsBackendPort for FakeBackend {
    async fn synthesize(&self, _request: &SynthesisRequest) -> BackendResult<SynthesisReply> {
        self.synth_calls.fetch_add(1, Ordering::SeqCst);
        if self.gated {
            self.gate.notified().await;
        }
        self.synth_reply.clone()
    }

    async fn mix_noise(&self, request: &FixedMixRequest) -> BackendResult<AudioArtifact> {
        let notified = self.mix_gate.notified();
        self.mix_calls.fetch_add(1, Ordering::SeqCst);
        if self.mix_gated {
            notified.await;
        }
        self.check_path(&request.audio_path)?;
        let stem = request.audio_path.trim_end_matches(".wav");
        let path = format!("{stem}_{}_{}dB.wav", request.noise_type, request.snr_db);
        let filename = path.rsplit('/').next().unwrap_or(&path).to_string();
        Ok(AudioArtifact::new(path, filename))
    }

    async fn mix_random_noise(&self, request: &RandomMixRequest) -> BackendResult<RandomMixReply> {
        self.mix_calls.fetch_add(1, Ordering::SeqCst);
        self.check_path(&request.audio_path)?;
        Ok(self.random_reply.clone())
    }

    async fn request_batch_archive(&self, _artifacts: &[AudioArtifact]) -> BackendResult<String> {
        Ok("batch.zip".to_string())
    }

    async fn request_output_dir_archive(&self, _output_dir: &str) -> BackendResult<String> {
        Ok("output.zip".to_string())
    }

    async fn fetch_audio(&self, _path: &str) -> BackendResult<Vec<u8>> {
        Ok(b"RIFF".to_vec())
    }

    async fn fetch_archive(&self, _zip_filename: &str) -> BackendResult<Vec<u8>> {
        Ok(b"PK".to_vec())
    }
}

// ── Reporter ───────────────────────────────────────────────────────

/// Records every status message in order.
#[derive(Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<StatusMessage>>,
    clears: AtomicUsize,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<StatusMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<StatusMessage> {
        self.messages.lock().unwrap().last().cloned()
    }

    pub fn count(&self, kind: StatusKind) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.kind == kind)
            .count()
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl StatusReporter for RecordingReporter {
    fn report(&self, message: StatusMessage) {
        self.messages.lock().unwrap().push(message);
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// A successful reply with `n` artifacts under `output/<run>`.
pub fn reply_with(run: &str, n: usize) -> SynthesisReply {
    let output_dir = format!("output/{run}");
    SynthesisReply {
        audio_files: (1..=n)
            .map(|i| AudioArtifact::in_directory(&output_dir, format!("{i}.wav")))
            .collect(),
        success_count: n,
        total_processing_time: 2.5,
        output_dir,
    }
}
