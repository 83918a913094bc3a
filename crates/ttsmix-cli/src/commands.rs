//! Main commands enum and its argument groups.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use ttsmix_core::{DEFAULT_RANDOM_COUNT, DEFAULT_SNR_DB, NoiseMode, SynthesisParams};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize text or a text file, optionally mixing in noise
    Synthesize(SynthesizeArgs),

    /// Request a zip of a previous run and download it
    Archive {
        /// Manifest written by `synthesize --manifest`
        manifest: PathBuf,
        /// Zip the listed artifacts instead of the whole output directory
        #[arg(long)]
        artifacts: bool,
        /// Where to write the zip (defaults to the server's filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download one audio file by its server path
    FetchAudio {
        /// Server path of the audio file (e.g. "output/tts_webui/run/1.wav")
        path: String,
        /// Where to write the file (defaults to the server filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Arguments of the `synthesize` command.
#[derive(Args, Debug, Clone)]
pub struct SynthesizeArgs {
    /// Text to synthesize
    #[arg(short, long)]
    pub text: Option<String>,

    /// Text file to upload (.txt, .csv, .json, ...)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Reference speaker ("random" lets the backend choose)
    #[arg(long, default_value = "random")]
    pub speaker: String,

    /// Emotion label ("neutral" disables emotion conditioning)
    #[arg(long, default_value = "neutral")]
    pub emotion: String,

    /// Speaking rate multiplier
    #[arg(long, default_value_t = 1.0)]
    pub speed: f32,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.85)]
    pub temperature: f32,

    /// Top-k sampling cutoff
    #[arg(long, default_value_t = 50)]
    pub top_k: u32,

    /// Nucleus sampling probability mass
    #[arg(long, default_value_t = 0.8)]
    pub top_p: f32,

    /// Length penalty
    #[arg(long, default_value_t = 1.0)]
    pub length_penalty: f32,

    /// Repetition penalty
    #[arg(long, default_value_t = 2.0)]
    pub repetition_penalty: f32,

    /// Noise type to mix into every file ("none" disables mixing)
    #[arg(long, default_value = "none")]
    pub noise: String,

    /// Let the backend pick random noises instead of --noise
    #[arg(long)]
    pub random_noise: bool,

    /// Number of random noise files per synthesized file
    #[arg(long, default_value_t = DEFAULT_RANDOM_COUNT)]
    pub random_count: u32,

    /// Target signal-to-noise ratio in dB
    #[arg(long, default_value_t = DEFAULT_SNR_DB, allow_hyphen_values = true)]
    pub snr: i32,

    /// Download the output directory as a zip to this path
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Write the run's artifacts as JSON to this path
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

impl SynthesizeArgs {
    /// Generation parameters selected on the command line.
    pub fn params(&self) -> SynthesisParams {
        SynthesisParams {
            speaker: self.speaker.clone(),
            emotion: self.emotion.clone(),
            speed: self.speed,
            temperature: self.temperature,
            top_k: self.top_k,
            top_p: self.top_p,
            length_penalty: self.length_penalty,
            repetition_penalty: self.repetition_penalty,
        }
    }

    /// Post-processing selected on the command line.
    pub fn noise_mode(&self) -> NoiseMode {
        NoiseMode::from_selection(&self.noise, self.random_noise, self.random_count, self.snr)
    }
}
