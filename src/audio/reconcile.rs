use std::path::{Path, PathBuf};

use crate::{
    audio::wav::read_wav_info,
    foundation::error::{StoryreelError, StoryreelResult},
};

/// Differences below this are treated as an exact fit.
pub const FIT_TOLERANCE_SECS: f64 = 1e-3;

/// How a narration track lines up with the composed video.
///
/// The output is always cut to the video length; an under-run therefore ends in silence rather
/// than shortening the video.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioFit {
    Exact,
    /// Audio ends `missing_secs` before the video does.
    Underrun { missing_secs: f64 },
    /// `excess_secs` of audio are cut off.
    Truncated { excess_secs: f64 },
    /// Track length could not be determined without decoding.
    Unknown,
}

/// Audio input bound to a render graph.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AudioTrack {
    pub path: PathBuf,
    pub duration: Option<f64>,
    pub fit: AudioFit,
}

pub fn classify_fit(audio_secs: Option<f64>, video_secs: f64) -> AudioFit {
    match audio_secs {
        None => AudioFit::Unknown,
        Some(a) if a + FIT_TOLERANCE_SECS < video_secs => AudioFit::Underrun {
            missing_secs: video_secs - a,
        },
        Some(a) if a > video_secs + FIT_TOLERANCE_SECS => AudioFit::Truncated {
            excess_secs: a - video_secs,
        },
        Some(_) => AudioFit::Exact,
    }
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

/// Bind the audio file at `path` to a video of `video_secs`.
///
/// A missing file is fatal. WAV durations are read from the header; other containers are
/// accepted with an unknown fit since ffmpeg still trims them to the video length.
#[tracing::instrument(skip_all, fields(audio = %path.display()))]
pub fn reconcile_audio(path: &Path, video_secs: f64) -> StoryreelResult<AudioTrack> {
    if !path.is_file() {
        return Err(StoryreelError::missing(format!(
            "audio file '{}' not found",
            path.display()
        )));
    }

    let duration = if is_wav(path) {
        match read_wav_info(path) {
            Ok(info) => Some(info.duration_secs()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read wav header; audio length unknown");
                None
            }
        }
    } else {
        None
    };

    let fit = classify_fit(duration, video_secs);
    match fit {
        AudioFit::Underrun { missing_secs } => tracing::warn!(
            missing_secs,
            video_secs,
            "audio is shorter than the video; the tail will be silent"
        ),
        AudioFit::Truncated { excess_secs } => {
            tracing::info!(excess_secs, "audio is longer than the video and will be cut")
        }
        AudioFit::Exact | AudioFit::Unknown => {}
    }

    Ok(AudioTrack {
        path: path.to_path_buf(),
        duration,
        fit,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/reconcile.rs"]
mod tests;
