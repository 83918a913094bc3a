//! Fetch-audio handler.

use std::path::PathBuf;

use anyhow::Result;

use super::{default_output, write_output};
use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::format_size;

/// Download one audio file by its server path.
pub async fn execute(ctx: &CliContext, server_path: &str, output: Option<PathBuf>) -> Result<()> {
    let bytes = ctx
        .backend()
        .fetch_audio(server_path)
        .await
        .map_err(CliError::from)?;

    let path = output.unwrap_or_else(|| default_output(server_path, "audio.wav"));
    write_output(&path, &bytes).await?;
    println!("✓ Saved {} ({})", path.display(), format_size(bytes.len()));
    Ok(())
}
