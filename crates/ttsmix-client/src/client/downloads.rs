//! Archive preparation and file downloads.

use super::TtsClient;
use crate::error::{ClientError, ClientResult};
use crate::http::{Fetched, HttpBackend};
use crate::models::{BatchDownloadBody, OutputDirBody, WireArtifact, ZipResponse, parse_reply};
use crate::url::{Endpoint, archive_url, audio_url, endpoint_url};

impl<B: HttpBackend> TtsClient<B> {
    /// Ask the server to zip a list of artifacts.
    pub(crate) async fn submit_batch_download(
        &self,
        audio_files: Vec<WireArtifact>,
    ) -> ClientResult<ZipResponse> {
        let url = endpoint_url(&self.base_url, Endpoint::BatchDownload);
        let body = serde_json::to_value(BatchDownloadBody { audio_files })?;
        let value: serde_json::Value = self.backend.post_json(&url, &body).await?;
        parse_reply(value)
    }

    /// Ask the server to zip an output directory.
    pub(crate) async fn submit_output_dir_download(
        &self,
        output_dir: &str,
    ) -> ClientResult<ZipResponse> {
        let url = endpoint_url(&self.base_url, Endpoint::DownloadOutputDir);
        let body = serde_json::to_value(OutputDirBody { output_dir })?;
        let value: serde_json::Value = self.backend.post_json(&url, &body).await?;
        parse_reply(value)
    }

    /// Download one audio file by its server path.
    pub(crate) async fn download_audio(&self, path: &str) -> ClientResult<Vec<u8>> {
        let fetched = self.backend.get_bytes(&audio_url(&self.base_url, path)).await?;
        into_file_bytes(fetched)
    }

    /// Download a zip prepared by one of the archive endpoints.
    pub(crate) async fn download_archive(&self, zip_filename: &str) -> ClientResult<Vec<u8>> {
        let fetched = self
            .backend
            .get_bytes(&archive_url(&self.base_url, zip_filename))
            .await?;
        into_file_bytes(fetched)
    }
}

/// The download routes answer missing files with a JSON failure body and
/// status 200; surface that as an API failure instead of file contents.
fn into_file_bytes(fetched: Fetched) -> ClientResult<Vec<u8>> {
    if !fetched.is_json() {
        return Ok(fetched.bytes);
    }
    let value: serde_json::Value = serde_json::from_slice(&fetched.bytes)?;
    parse_reply::<serde_json::Value>(value)?;
    Err(ClientError::InvalidResponse {
        message: "Expected file contents, got a JSON body".to_string(),
    })
}
