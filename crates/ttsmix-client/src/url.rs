//! URL construction helpers for the backend endpoints.

use url::Url;

/// JSON and multipart endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Tts,
    MixNoise,
    MixRandomNoise,
    BatchDownload,
    DownloadOutputDir,
}

impl Endpoint {
    /// Path relative to the base URL.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Tts => "api/tts",
            Self::MixNoise => "api/mix-noise",
            Self::MixRandomNoise => "api/mix-random-noise",
            Self::BatchDownload => "api/batch-download",
            Self::DownloadOutputDir => "api/download-output-dir",
        }
    }
}

/// Append `tail` to the base URL's path, keeping any prefix it carries.
fn join_path(base: &Url, tail: &str) -> Url {
    let mut url = base.clone();
    let base_path = url.path().trim_end_matches('/');
    let path = format!("{base_path}/{tail}");
    url.set_path(&path);
    url.set_query(None);
    url
}

/// Build the URL of a JSON or multipart endpoint.
pub fn endpoint_url(base: &Url, endpoint: Endpoint) -> Url {
    join_path(base, endpoint.path())
}

/// Build the download URL of one audio file.
///
/// The whole server path is percent-encoded as a single segment, slashes
/// included; the backend decodes it back into a relative path.
pub fn audio_url(base: &Url, path: &str) -> Url {
    join_path(base, &format!("audio/{}", urlencoding::encode(path)))
}

/// Build the download URL of a prepared zip.
pub fn archive_url(base: &Url, zip_filename: &str) -> Url {
    join_path(
        base,
        &format!("api/download-zip/{}", urlencoding::encode(zip_filename)),
    )
}
