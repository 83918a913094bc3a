//! Wire types for the backend's JSON bodies.
//!
//! Every JSON response carries a `success` flag. [`parse_reply`] checks it
//! before the payload is decoded, so a failure body never has to match the
//! success shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Fields common to every JSON response.
#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_details: Vec<String>,
}

/// Check the `success` flag, then decode the payload.
pub fn parse_reply<T: DeserializeOwned>(value: serde_json::Value) -> ClientResult<T> {
    let status = ApiStatus::deserialize(&value)?;
    if !status.success {
        return Err(ClientError::ApiFailure {
            message: status
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "Backend reported failure without a message".to_string()),
            details: status.error_details,
        });
    }
    Ok(serde_json::from_value(value)?)
}

// ============================================================================
// Responses
// ============================================================================

/// One artifact as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireArtifact {
    pub path: String,
    pub filename: String,
}

/// `POST /api/tts` success body.
#[derive(Debug, Clone, Deserialize)]
pub struct TtsResponse {
    pub audio_files: Vec<WireArtifact>,
    #[serde(default)]
    pub success_count: Option<usize>,
    #[serde(default)]
    pub total_processing_time: f64,
    pub output_dir: String,
}

/// `POST /api/mix-noise` success body.
#[derive(Debug, Clone, Deserialize)]
pub struct MixNoiseResponse {
    pub noise_mixed_path: String,
    pub noise_mixed_filename: String,
}

/// `POST /api/mix-random-noise` success body.
///
/// The backend has shipped both a paths-plus-filenames shape and a
/// filenames-only shape, so both arrays are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MixRandomNoiseResponse {
    #[serde(default)]
    pub noise_mixed_paths: Option<Vec<String>>,
    #[serde(default)]
    pub noise_mixed_files: Option<Vec<String>>,
}

/// Success body of both archive endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ZipResponse {
    pub zip_filename: String,
}

// ============================================================================
// Requests
// ============================================================================

/// `POST /api/mix-noise` body.
#[derive(Debug, Serialize)]
pub struct MixNoiseBody<'a> {
    pub audio_path: &'a str,
    pub noise_type: &'a str,
    pub snr: i32,
}

/// `POST /api/mix-random-noise` body.
#[derive(Debug, Serialize)]
pub struct MixRandomNoiseBody<'a> {
    pub audio_path: &'a str,
    pub count: u32,
    pub snr: i32,
}

/// `POST /api/batch-download` body.
#[derive(Debug, Serialize)]
pub struct BatchDownloadBody {
    pub audio_files: Vec<WireArtifact>,
}

/// `POST /api/download-output-dir` body.
#[derive(Debug, Serialize)]
pub struct OutputDirBody<'a> {
    pub output_dir: &'a str,
}
