//! JSON record of a finished run, used by the `archive` command.

use std::path::Path;

use serde::{Deserialize, Serialize};
use ttsmix_core::{AudioArtifact, JobSnapshot};

use crate::error::CliError;

/// Artifacts of one successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Server directory holding the run's outputs.
    pub output_dir: String,
    /// Synthesized artifacts.
    pub artifacts: Vec<AudioArtifact>,
    /// Noise-mixed artifacts.
    #[serde(default)]
    pub noise_artifacts: Vec<AudioArtifact>,
}

impl Manifest {
    /// Build a manifest from a job snapshot; `None` until the job succeeded.
    pub fn from_snapshot(snapshot: &JobSnapshot) -> Option<Self> {
        let result = snapshot.result.as_ref()?;
        Some(Self {
            output_dir: result.output_dir.clone(),
            artifacts: result.artifacts.clone(),
            noise_artifacts: snapshot.noise_artifacts.clone(),
        })
    }

    /// Every artifact, synthesized first.
    pub fn all_artifacts(&self) -> Vec<AudioArtifact> {
        self.artifacts
            .iter()
            .chain(&self.noise_artifacts)
            .cloned()
            .collect()
    }

    /// Read a manifest file.
    pub async fn load(path: &Path) -> Result<Self, CliError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write the manifest as pretty JSON.
    pub async fn save(&self, path: &Path) -> Result<(), CliError> {
        let json = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
