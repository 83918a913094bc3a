//! Synthesis input and generation parameters.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A text file uploaded alongside (or instead of) inline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Filename sent in the multipart part (the backend uses its extension).
    pub filename: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl InputFile {
    /// Create an input file from a name and its contents.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// What to synthesize: inline text, an uploaded file, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisInput {
    text: Option<String>,
    file: Option<InputFile>,
}

impl SynthesisInput {
    /// Create an input from optional text and an optional file.
    ///
    /// Text is trimmed; whitespace-only text counts as absent.
    pub fn new(text: Option<String>, file: Option<InputFile>) -> Self {
        let text = text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self { text, file }
    }

    /// Input consisting of inline text only.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Some(text.into()), None)
    }

    /// Input consisting of an uploaded file only.
    pub fn file(file: InputFile) -> Self {
        Self::new(None, Some(file))
    }

    /// Trimmed, non-empty inline text.
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The uploaded file, if any.
    pub const fn input_file(&self) -> Option<&InputFile> {
        self.file.as_ref()
    }

    /// Whether there is anything to synthesize.
    pub const fn is_empty(&self) -> bool {
        self.text.is_none() && self.file.is_none()
    }

    /// Fail with [`PipelineError::NoInput`] when there is nothing to send.
    pub fn ensure_present(&self) -> Result<(), PipelineError> {
        if self.is_empty() {
            Err(PipelineError::NoInput)
        } else {
            Ok(())
        }
    }
}

/// Speaker value that lets the backend pick a random reference voice.
pub const RANDOM_SPEAKER: &str = "random";

/// Emotion value that disables emotion conditioning on the backend.
pub const NEUTRAL_EMOTION: &str = "neutral";

/// Generation parameters sent with every synthesis request.
///
/// Defaults match the backend's recommended values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisParams {
    /// Reference speaker identifier (`random` lets the backend choose).
    pub speaker: String,
    /// Emotion label (`neutral` disables emotion conditioning).
    pub emotion: String,
    /// Speaking rate multiplier.
    pub speed: f32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Nucleus sampling probability mass.
    pub top_p: f32,
    /// Length penalty applied during decoding.
    pub length_penalty: f32,
    /// Repetition penalty applied during decoding.
    pub repetition_penalty: f32,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            speaker: RANDOM_SPEAKER.to_string(),
            emotion: NEUTRAL_EMOTION.to_string(),
            speed: 1.0,
            temperature: 0.85,
            top_k: 50,
            top_p: 0.8,
            length_penalty: 1.0,
            repetition_penalty: 2.0,
        }
    }
}

impl SynthesisParams {
    /// Set the speaker.
    #[must_use]
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = speaker.into();
        self
    }

    /// Set the emotion.
    #[must_use]
    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = emotion.into();
        self
    }

    /// Set the speaking rate.
    #[must_use]
    pub const fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Validate parameter ranges before anything is sent.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.speaker.trim().is_empty() {
            return Err(PipelineError::invalid_parameter("speaker", "must not be empty"));
        }
        if self.emotion.trim().is_empty() {
            return Err(PipelineError::invalid_parameter("emotion", "must not be empty"));
        }

        ensure_positive("speed", self.speed)?;
        ensure_positive("temperature", self.temperature)?;
        ensure_positive("top_p", self.top_p)?;
        ensure_positive("length_penalty", self.length_penalty)?;
        ensure_positive("repetition_penalty", self.repetition_penalty)?;

        if self.top_p > 1.0 {
            return Err(PipelineError::invalid_parameter(
                "top_p",
                format!("must be at most 1.0, got {}", self.top_p),
            ));
        }
        if self.top_k == 0 {
            return Err(PipelineError::invalid_parameter("top_k", "must be at least 1"));
        }

        Ok(())
    }
}

fn ensure_positive(name: &'static str, value: f32) -> Result<(), PipelineError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PipelineError::invalid_parameter(
            name,
            format!("must be a positive number, got {value}"),
        ))
    }
}
