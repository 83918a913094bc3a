//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that parse CLI input, call the orchestrator or the
//!   backend port, and format output for the terminal

pub mod archive;
pub mod fetch_audio;
pub mod synthesize;

use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Local file name for a server path or zip name: its last segment.
pub(crate) fn default_output(server_name: &str, fallback: &str) -> PathBuf {
    Path::new(server_name)
        .file_name()
        .map_or_else(|| PathBuf::from(fallback), PathBuf::from)
}

/// Write downloaded bytes, creating parent directories as needed.
pub(crate) async fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_takes_last_segment() {
        assert_eq!(
            default_output("output/tts_webui/run/1.wav", "audio.wav"),
            PathBuf::from("1.wav")
        );
        assert_eq!(default_output("", "archive.zip"), PathBuf::from("archive.zip"));
    }

    #[tokio::test]
    async fn test_write_output_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/file.bin");
        write_output(&path, b"abc").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
    }
}
