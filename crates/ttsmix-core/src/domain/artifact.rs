//! Audio artifact references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One audio file produced by the backend.
///
/// The `path` is the server-side location (relative to the backend's working
/// directory) and is what every follow-up request carries. The `filename` is
/// the display name. Artifacts are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioArtifact {
    path: String,
    filename: String,
}

impl AudioArtifact {
    /// Create an artifact from a server path and a display filename.
    pub fn new(path: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            filename: filename.into(),
        }
    }

    /// Create an artifact that lives in `dir`, joining the two with `/`.
    pub fn in_directory(dir: &str, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let dir = dir.trim_end_matches('/');
        let path = if dir.is_empty() {
            filename.clone()
        } else {
            format!("{dir}/{filename}")
        };
        Self { path, filename }
    }

    /// Server-side path of the audio file.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Display filename of the audio file.
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl fmt::Display for AudioArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.filename, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_directory_joins_with_slash() {
        let artifact = AudioArtifact::in_directory("output/tts_with_noise", "z.wav");
        assert_eq!(artifact.path(), "output/tts_with_noise/z.wav");
        assert_eq!(artifact.filename(), "z.wav");
    }

    #[test]
    fn test_in_directory_trailing_slash() {
        let artifact = AudioArtifact::in_directory("out/", "a.wav");
        assert_eq!(artifact.path(), "out/a.wav");
    }

    #[test]
    fn test_in_directory_empty_dir() {
        let artifact = AudioArtifact::in_directory("", "a.wav");
        assert_eq!(artifact.path(), "a.wav");
    }

    #[test]
    fn test_serializes_as_path_and_filename() {
        let artifact = AudioArtifact::new("output/tts_webui/1/a.wav", "a.wav");
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["path"], "output/tts_webui/1/a.wav");
        assert_eq!(json["filename"], "a.wav");
    }
}
