//! Compiler configuration. Every tunable of the timeline compiler lives here.

use std::path::Path;

use anyhow::Context as _;

use crate::{
    effects::blur::BlurLevels,
    effects::transitions::TransitionPolicy,
    foundation::core::{Fps, Resolution},
    foundation::error::{StoryreelError, StoryreelResult},
    motion::{MotionEffect, ZoomBounds},
};

/// Encoder settings appended to the render command.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    pub video_codec: String,
    pub preset: String,
    pub crf: u8,
    pub pix_fmt: String,
    pub audio_codec: String,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "fast".to_string(),
            crf: 23,
            pix_fmt: "yuv420p".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

/// Timeline compiler configuration.
///
/// Deserializes from JSON with every field optional:
///
/// ```json
/// { "fps": { "num": 30, "den": 1 }, "overlap_secs": 0.75, "transitions": { "kind": "random", "styles": ["fade"] } }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Output frame rate.
    pub fps: Fps,
    /// Final output resolution.
    pub resolution: Resolution,
    /// Motion and transitions run at `resolution * supersample` before the final downscale.
    pub supersample: u32,
    /// Cross-dissolve length shared by every clip boundary.
    pub overlap_secs: f64,
    pub zoom: ZoomBounds,
    pub blur: BlurLevels,
    pub transitions: TransitionPolicy,
    /// Motion effects randomly chosen from for shots that do not pin one.
    pub effects: Vec<MotionEffect>,
    pub encoder: EncoderSettings,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            resolution: Resolution::FULL_HD,
            supersample: 2,
            overlap_secs: 1.0,
            zoom: ZoomBounds::default(),
            blur: BlurLevels::default(),
            transitions: TransitionPolicy::default(),
            effects: MotionEffect::ALL.to_vec(),
            encoder: EncoderSettings::default(),
        }
    }
}

impl CompilerConfig {
    /// Load overrides from a JSON file; absent fields keep their defaults.
    pub fn from_json_path(path: &Path) -> StoryreelResult<Self> {
        if !path.exists() {
            return Err(StoryreelError::missing(format!(
                "config file '{}' not found",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> StoryreelResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| StoryreelError::serde(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Resolution the per-clip chains and transitions run at.
    pub fn working_resolution(&self) -> StoryreelResult<Resolution> {
        self.resolution.scaled(self.supersample)
    }

    pub fn validate(&self) -> StoryreelResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        Resolution::new(self.resolution.width, self.resolution.height)?;
        if !self.resolution.is_even() {
            return Err(StoryreelError::validation(format!(
                "resolution {} must have even width/height (required for yuv420p output)",
                self.resolution
            )));
        }
        if self.supersample == 0 {
            return Err(StoryreelError::validation("supersample must be >= 1"));
        }
        self.working_resolution()?;
        if !self.overlap_secs.is_finite() || self.overlap_secs <= 0.0 {
            return Err(StoryreelError::validation("overlap_secs must be > 0"));
        }
        self.zoom.validate()?;
        self.blur.validate()?;
        self.transitions.validate()?;
        if self.effects.is_empty() {
            return Err(StoryreelError::validation(
                "at least one motion effect must be enabled",
            ));
        }
        Ok(())
    }
}

/// Speech synthesis settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Target words per synthesis request.
    pub chunk_words: usize,
    /// Allowed deviation from `chunk_words` before a chunk is closed.
    pub chunk_tolerance: usize,
    /// Sample rate of the PCM the synthesizer returns.
    pub sample_rate: u32,
    pub voice: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            chunk_words: 400,
            chunk_tolerance: 30,
            sample_rate: 24_000,
            voice: "Algenib".to_string(),
        }
    }
}

impl SpeechConfig {
    pub fn validate(&self) -> StoryreelResult<()> {
        if self.chunk_words == 0 {
            return Err(StoryreelError::validation("chunk_words must be > 0"));
        }
        if self.chunk_tolerance >= self.chunk_words {
            return Err(StoryreelError::validation(
                "chunk_tolerance must be smaller than chunk_words",
            ));
        }
        if self.sample_rate == 0 {
            return Err(StoryreelError::validation("sample_rate must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
