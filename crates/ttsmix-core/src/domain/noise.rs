//! Noise-mixing modes applied after synthesis.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Default target signal-to-noise ratio in dB.
pub const DEFAULT_SNR_DB: i32 = 10;

/// Default number of random noise injections per artifact.
pub const DEFAULT_RANDOM_COUNT: u32 = 1;

/// Noise-type identifier meaning "do not mix noise".
const NO_NOISE: &str = "none";

/// Post-processing selected for a synthesis job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NoiseMode {
    /// Keep the synthesized audio as-is.
    #[default]
    None,
    /// Mix one named noise type into every artifact.
    FixedType {
        /// Backend noise-type identifier (e.g. `white`, `babble`).
        noise_type: String,
        /// Target SNR in dB.
        snr_db: i32,
    },
    /// Let the backend pick `count` random noises per artifact.
    Randomized {
        /// Number of noise-mixed outputs requested per artifact.
        count: u32,
        /// Target SNR in dB.
        snr_db: i32,
    },
}

impl NoiseMode {
    /// Build a mode from the form-style selection: a noise type, the
    /// randomized toggle and its count.
    ///
    /// The randomized toggle wins over the noise type; a noise type of
    /// `none` disables mixing.
    pub fn from_selection(noise_type: &str, randomized: bool, count: u32, snr_db: i32) -> Self {
        if randomized {
            Self::Randomized { count, snr_db }
        } else if noise_type.trim().is_empty() || noise_type == NO_NOISE {
            Self::None
        } else {
            Self::FixedType {
                noise_type: noise_type.to_string(),
                snr_db,
            }
        }
    }

    /// Whether this mode triggers a post-processing round.
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Short label used in logs and status lines.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FixedType { .. } => "fixed-type",
            Self::Randomized { .. } => "randomized",
        }
    }

    /// Validate the mode's parameters.
    pub fn validate(&self) -> Result<(), PipelineError> {
        match self {
            Self::None => Ok(()),
            Self::FixedType { noise_type, .. } if noise_type.trim().is_empty() => Err(
                PipelineError::invalid_parameter("noise_type", "must not be empty"),
            ),
            Self::FixedType { .. } => Ok(()),
            Self::Randomized { count: 0, .. } => Err(PipelineError::invalid_parameter(
                "count",
                "must request at least one noise-mixed output",
            )),
            Self::Randomized { .. } => Ok(()),
        }
    }
}
