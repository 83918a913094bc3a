//! Archive handler.
//!
//! Asks the backend to zip a previous run and downloads the zip.

use std::path::{Path, PathBuf};

use anyhow::Result;
use ttsmix_core::TtsBackendPort;

use super::{default_output, write_output};
use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::manifest::Manifest;
use crate::presentation::format_size;

/// Which part of a run to zip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveSource {
    /// The run's whole output directory.
    OutputDir,
    /// Exactly the artifacts listed in the manifest.
    Artifacts,
}

/// Execute the archive command.
pub async fn execute(
    ctx: &CliContext,
    manifest_path: &Path,
    source: ArchiveSource,
    output: Option<PathBuf>,
) -> Result<()> {
    let manifest = Manifest::load(manifest_path).await?;
    let zip_filename = request_archive(ctx.backend().as_ref(), &manifest, source).await?;
    let path = output.unwrap_or_else(|| default_output(&zip_filename, "archive.zip"));
    save_archive(ctx.backend().as_ref(), &zip_filename, &path).await?;
    Ok(())
}

/// Ask the backend to prepare a zip; returns its filename.
pub async fn request_archive(
    backend: &dyn TtsBackendPort,
    manifest: &Manifest,
    source: ArchiveSource,
) -> Result<String, CliError> {
    let zip_filename = match source {
        ArchiveSource::OutputDir => backend.request_output_dir_archive(&manifest.output_dir).await?,
        ArchiveSource::Artifacts => {
            let artifacts = manifest.all_artifacts();
            if artifacts.is_empty() {
                return Err(CliError::Manifest("manifest lists no artifacts".to_string()));
            }
            backend.request_batch_archive(&artifacts).await?
        }
    };
    tracing::debug!(zip = %zip_filename, ?source, "Archive prepared");
    Ok(zip_filename)
}

/// Download a prepared zip to `path`.
pub async fn save_archive(
    backend: &dyn TtsBackendPort,
    zip_filename: &str,
    path: &Path,
) -> Result<(), CliError> {
    let bytes = backend.fetch_archive(zip_filename).await?;
    write_output(path, &bytes).await?;
    println!(
        "✓ Archive saved to {} ({})",
        path.display(),
        format_size(bytes.len())
    );
    Ok(())
}
