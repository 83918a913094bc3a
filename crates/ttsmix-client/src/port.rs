//! Port trait implementation for `TtsClient`.
//!
//! Implements the core-owned `TtsBackendPort` trait, converting between wire
//! types and core DTOs.

use async_trait::async_trait;
use ttsmix_core::{
    AudioArtifact, BackendError, BackendResult, FixedMixRequest, RandomMixReply,
    RandomMixRequest, SynthesisReply, SynthesisRequest, TtsBackendPort,
};

use crate::client::TtsClient;
use crate::error::ClientError;
use crate::http::HttpBackend;
use crate::models::{MixNoiseResponse, MixRandomNoiseResponse, TtsResponse, WireArtifact};

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `ClientError` to core `BackendError`.
fn map_error(err: ClientError) -> BackendError {
    match err {
        ClientError::ApiFailure { message, details } => BackendError::Rejected { message, details },
        ClientError::HttpStatus { status, url } => BackendError::Http {
            status,
            endpoint: endpoint_of(&url),
        },
        ClientError::InvalidResponse { message } => BackendError::InvalidResponse { message },
        ClientError::JsonParse(e) => BackendError::InvalidResponse {
            message: e.to_string(),
        },
        ClientError::Network(e) => BackendError::Network {
            message: e.to_string(),
        },
        ClientError::InvalidUrl(e) => BackendError::Configuration {
            message: e.to_string(),
        },
    }
}

/// Path component of a request URL, falling back to the full string.
fn endpoint_of(url: &str) -> String {
    url::Url::parse(url).map_or_else(|_| url.to_string(), |u| u.path().to_string())
}

// ============================================================================
// Type Conversions
// ============================================================================

fn to_artifact(wire: WireArtifact) -> AudioArtifact {
    AudioArtifact::new(wire.path, wire.filename)
}

fn to_wire(artifact: &AudioArtifact) -> WireArtifact {
    WireArtifact {
        path: artifact.path().to_string(),
        filename: artifact.filename().to_string(),
    }
}

fn to_synthesis_reply(response: TtsResponse) -> SynthesisReply {
    let success_count = response
        .success_count
        .unwrap_or(response.audio_files.len());
    SynthesisReply {
        audio_files: response.audio_files.into_iter().map(to_artifact).collect(),
        success_count,
        total_processing_time: response.total_processing_time,
        output_dir: response.output_dir,
    }
}

fn to_mixed_artifact(response: MixNoiseResponse) -> AudioArtifact {
    AudioArtifact::new(response.noise_mixed_path, response.noise_mixed_filename)
}

fn to_random_reply(response: MixRandomNoiseResponse) -> RandomMixReply {
    RandomMixReply {
        paths: response.noise_mixed_paths,
        filenames: response.noise_mixed_files,
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend> TtsBackendPort for TtsClient<B> {
    async fn synthesize(&self, request: &SynthesisRequest) -> BackendResult<SynthesisReply> {
        self.submit_tts(request)
            .await
            .map(to_synthesis_reply)
            .map_err(map_error)
    }

    async fn mix_noise(&self, request: &FixedMixRequest) -> BackendResult<AudioArtifact> {
        self.submit_mix_noise(&request.audio_path, &request.noise_type, request.snr_db)
            .await
            .map(to_mixed_artifact)
            .map_err(map_error)
    }

    async fn mix_random_noise(&self, request: &RandomMixRequest) -> BackendResult<RandomMixReply> {
        self.submit_mix_random_noise(&request.audio_path, request.count, request.snr_db)
            .await
            .map(to_random_reply)
            .map_err(map_error)
    }

    async fn request_batch_archive(&self, artifacts: &[AudioArtifact]) -> BackendResult<String> {
        let wire = artifacts.iter().map(to_wire).collect();
        self.submit_batch_download(wire)
            .await
            .map(|zip| zip.zip_filename)
            .map_err(map_error)
    }

    async fn request_output_dir_archive(&self, output_dir: &str) -> BackendResult<String> {
        self.submit_output_dir_download(output_dir)
            .await
            .map(|zip| zip.zip_filename)
            .map_err(map_error)
    }

    async fn fetch_audio(&self, path: &str) -> BackendResult<Vec<u8>> {
        self.download_audio(path).await.map_err(map_error)
    }

    async fn fetch_archive(&self, zip_filename: &str) -> BackendResult<Vec<u8>> {
        self.download_archive(zip_filename).await.map_err(map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client;
    use crate::http::testing::FakeBackend;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use ttsmix_core::{SynthesisInput, SynthesisParams};

    fn tts_request() -> SynthesisRequest {
        SynthesisRequest {
            input: SynthesisInput::text("hello"),
            params: SynthesisParams::default(),
        }
    }

    #[test]
    fn test_map_error_api_failure_is_rejection() {
        let err = map_error(ClientError::ApiFailure {
            message: "bad".to_string(),
            details: vec!["line 1".to_string()],
        });
        assert_eq!(
            err,
            BackendError::Rejected {
                message: "bad".to_string(),
                details: vec!["line 1".to_string()]
            }
        );
    }

    #[test]
    fn test_map_error_http_status_keeps_path() {
        let err = map_error(ClientError::HttpStatus {
            status: 500,
            url: "http://127.0.0.1:5001/api/mix-noise".to_string(),
        });
        assert_eq!(
            err,
            BackendError::Http {
                status: 500,
                endpoint: "/api/mix-noise".to_string()
            }
        );
    }

    #[test]
    fn test_map_error_invalid_response() {
        let err = map_error(ClientError::InvalidResponse {
            message: "garbage".to_string(),
        });
        assert!(matches!(err, BackendError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_synthesize_defaults_success_count() {
        let backend = FakeBackend::new().with_json(
            "api/tts",
            json!({
                "success": true,
                "audio_files": [
                    {"path": "output/r/1.wav", "filename": "1.wav"},
                    {"path": "output/r/2.wav", "filename": "2.wav"}
                ],
                "output_dir": "output/r"
            }),
        );
        let client = client(backend);

        let reply = assert_ok!(client.synthesize(&tts_request()).await);
        assert_eq!(reply.success_count, 2);
        assert_eq!(reply.audio_files[1].path(), "output/r/2.wav");
        assert_eq!(reply.output_dir, "output/r");
    }

    #[tokio::test]
    async fn test_synthesize_rejection_carries_details() {
        let backend = FakeBackend::new().with_json(
            "api/tts",
            json!({
                "success": false,
                "error": "No successful synthesis results",
                "error_details": ["line 2: empty"]
            }),
        );
        let client = client(backend);

        let err = assert_err!(client.synthesize(&tts_request()).await);
        assert!(err.is_rejection());
        match err {
            BackendError::Rejected { details, .. } => assert_eq!(details, vec!["line 2: empty"]),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mix_random_noise_passes_both_arrays() {
        let backend = FakeBackend::new().with_json(
            "api/mix-random-noise",
            json!({
                "success": true,
                "noise_mixed_paths": ["output/tts_with_noise/a.wav"],
                "noise_mixed_files": ["a.wav"]
            }),
        );
        let client = client(backend);

        let reply = assert_ok!(
            client
                .mix_random_noise(&RandomMixRequest {
                    audio_path: "output/r/1.wav".to_string(),
                    count: 1,
                    snr_db: 10,
                })
                .await
        );
        assert_eq!(
            reply.paths,
            Some(vec!["output/tts_with_noise/a.wav".to_string()])
        );
        assert_eq!(reply.filenames, Some(vec!["a.wav".to_string()]));
    }

    #[tokio::test]
    async fn test_missing_route_maps_to_http_error() {
        let client = client(FakeBackend::new());

        let err = assert_err!(client.request_output_dir_archive("output/r").await);
        assert_eq!(
            err,
            BackendError::Http {
                status: 404,
                endpoint: "/api/download-output-dir".to_string()
            }
        );
    }
}
