//! Synthesis and noise-mixing requests.

use super::TtsClient;
use crate::error::ClientResult;
use crate::http::{FormPayload, HttpBackend};
use crate::models::{
    MixNoiseBody, MixNoiseResponse, MixRandomNoiseBody, MixRandomNoiseResponse, TtsResponse,
    parse_reply,
};
use crate::url::{Endpoint, endpoint_url};
use ttsmix_core::SynthesisRequest;

/// Build the multipart form for `POST /api/tts`.
///
/// Numeric parameters travel as their decimal text, the way a browser form
/// would send them.
pub(crate) fn tts_form(request: &SynthesisRequest) -> FormPayload {
    let mut form = FormPayload::default();
    if let Some(text) = request.input.text_content() {
        form = form.text("text", text);
    }
    if let Some(file) = request.input.input_file() {
        form = form.file("file", file.filename.clone(), file.bytes.clone());
    }

    let params = &request.params;
    form.text("speaker_wav", params.speaker.clone())
        .text("emotion", params.emotion.clone())
        .text("speed", params.speed.to_string())
        .text("temperature", params.temperature.to_string())
        .text("top_k", params.top_k.to_string())
        .text("top_p", params.top_p.to_string())
        .text("length_penalty", params.length_penalty.to_string())
        .text("repetition_penalty", params.repetition_penalty.to_string())
}

impl<B: HttpBackend> TtsClient<B> {
    /// Submit a synthesis job.
    pub(crate) async fn submit_tts(&self, request: &SynthesisRequest) -> ClientResult<TtsResponse> {
        let url = endpoint_url(&self.base_url, Endpoint::Tts);
        let value: serde_json::Value = self.backend.post_form(&url, tts_form(request)).await?;
        let reply: TtsResponse = parse_reply(value)?;
        tracing::debug!(
            files = reply.audio_files.len(),
            output_dir = %reply.output_dir,
            "Synthesis reply received"
        );
        Ok(reply)
    }

    /// Mix one named noise type into an artifact.
    pub(crate) async fn submit_mix_noise(
        &self,
        audio_path: &str,
        noise_type: &str,
        snr: i32,
    ) -> ClientResult<MixNoiseResponse> {
        let url = endpoint_url(&self.base_url, Endpoint::MixNoise);
        let body = serde_json::to_value(MixNoiseBody {
            audio_path,
            noise_type,
            snr,
        })?;
        let value: serde_json::Value = self.backend.post_json(&url, &body).await?;
        parse_reply(value)
    }

    /// Mix `count` random noises into an artifact.
    pub(crate) async fn submit_mix_random_noise(
        &self,
        audio_path: &str,
        count: u32,
        snr: i32,
    ) -> ClientResult<MixRandomNoiseResponse> {
        let url = endpoint_url(&self.base_url, Endpoint::MixRandomNoise);
        let body = serde_json::to_value(MixRandomNoiseBody {
            audio_path,
            count,
            snr,
        })?;
        let value: serde_json::Value = self.backend.post_json(&url, &body).await?;
        parse_reply(value)
    }
}
