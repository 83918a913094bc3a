//! Domain types for the synthesis pipeline.
//!
//! These types are pure data with no I/O. They are shared between the
//! orchestration services and the adapters.

mod artifact;
mod noise;
mod params;

pub use artifact::AudioArtifact;
pub use noise::{DEFAULT_RANDOM_COUNT, DEFAULT_SNR_DB, NoiseMode};
pub use params::{InputFile, SynthesisInput, SynthesisParams};
