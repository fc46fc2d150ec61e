//! Scenario (shot list) loading and shot resolution.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::core::Resolution,
    foundation::error::{StoryreelError, StoryreelResult},
    motion::{MotionEffect, parse_motion_effect},
    timing::{TimeRange, parse_interval},
};

/// Timing used by records that omit one.
pub const DEFAULT_TIMING: &str = "00:00:00 - 00:00:05";

/// Directory (next to the scenario file) holding generated shot images.
pub const GENERATIONS_DIR: &str = "generations";

/// Scene identifiers appear both as strings and as bare numbers in shot lists.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum SceneId {
    Text(String),
    Number(u64),
}

impl SceneId {
    fn as_string(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// One raw entry of a scenario file. Unknown fields (prompts, subtitles) are ignored.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct ShotRecord {
    #[serde(default)]
    pub scene: Option<SceneId>,
    #[serde(default)]
    pub timing: Option<String>,
    /// Explicit image reference; defaults to `generations/shot_<id>.png`.
    #[serde(default)]
    pub image: Option<PathBuf>,
    /// Pins the motion effect for this shot.
    #[serde(default)]
    pub motion: Option<String>,
    /// Text prompt for the image generator.
    #[serde(default)]
    pub image_prompt: Option<String>,
    /// Comma-separated style reference file names.
    #[serde(default)]
    pub reference_images: Option<String>,
}

impl ShotRecord {
    /// Padded shot id; records without a scene use their 1-based position.
    pub fn shot_id(&self, position: usize) -> String {
        let scene = self
            .scene
            .as_ref()
            .map(SceneId::as_string)
            .unwrap_or_else(|| (position + 1).to_string());
        pad_scene_id(&scene)
    }
}

/// A parsed scenario file.
#[derive(Clone, Debug)]
pub struct Scenario {
    /// Directory the scenario file lives in; relative image paths resolve against it.
    pub root: PathBuf,
    pub records: Vec<ShotRecord>,
}

impl Scenario {
    pub fn from_path(path: &Path) -> StoryreelResult<Self> {
        if !path.exists() {
            return Err(StoryreelError::missing(format!(
                "scenario file '{}' not found",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scenario '{}'", path.display()))?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_json_str(&text, root)
    }

    pub fn from_json_str(text: &str, root: impl Into<PathBuf>) -> StoryreelResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| StoryreelError::serde(format!("invalid scenario json: {e}")))?;
        if !value.is_array() {
            return Err(StoryreelError::validation(
                "scenario root must be a list of shot objects",
            ));
        }
        let records = serde_json::from_value(value)
            .map_err(|e| StoryreelError::serde(format!("invalid shot record: {e}")))?;
        Ok(Self {
            root: root.into(),
            records,
        })
    }

    /// Image a record refers to: its explicit `image` (relative to [`Scenario::root`]) or the
    /// generator's default output `generations/shot_<id>.png`.
    pub fn image_path(&self, record: &ShotRecord, id: &str) -> PathBuf {
        match &record.image {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => self.root.join(p),
            None => self
                .root
                .join(GENERATIONS_DIR)
                .join(format!("shot_{id}.png")),
        }
    }
}

/// A declared shot whose image exists.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Shot {
    /// Zero-padded scene identifier (`"01"`, `"12"`).
    pub id: String,
    pub image: PathBuf,
    /// Pixel size of the source image.
    pub source: Resolution,
    pub range: TimeRange,
    pub motion: Option<MotionEffect>,
}

impl Shot {
    pub fn base_duration(&self) -> f64 {
        self.range.duration()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Missing,
    Unreadable(String),
}

/// A shot dropped during resolution.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SkippedShot {
    pub id: String,
    pub image: PathBuf,
    pub reason: SkipReason,
}

/// Surviving shots in declaration order plus everything that was dropped.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ShotList {
    pub shots: Vec<Shot>,
    pub skipped: Vec<SkippedShot>,
}

/// Zero-pad a scene identifier to two characters (`"1"` -> `"01"`).
pub fn pad_scene_id(scene: &str) -> String {
    format!("{scene:0>2}")
}

/// Resolve the first `limit` records into shots, dropping those whose image is missing.
///
/// Missing or unreadable images are skipped with a warning. Malformed timing and non-positive
/// durations are fatal. Returns a validation error when no shot survives.
#[tracing::instrument(skip(scenario), fields(records = scenario.records.len()))]
pub fn resolve_shots(scenario: &Scenario, limit: Option<usize>) -> StoryreelResult<ShotList> {
    let take = limit.unwrap_or(usize::MAX);
    let mut out = ShotList::default();

    for (i, record) in scenario.records.iter().take(take).enumerate() {
        let id = record.shot_id(i);
        let image = scenario.image_path(record, &id);

        if !image.exists() {
            tracing::warn!(shot = %id, path = %image.display(), "image not found, skipping shot");
            out.skipped.push(SkippedShot {
                id,
                image,
                reason: SkipReason::Missing,
            });
            continue;
        }

        let (width, height) = match image::image_dimensions(&image) {
            Ok(dims) => dims,
            Err(e) => {
                tracing::warn!(
                    shot = %id,
                    path = %image.display(),
                    error = %e,
                    "image unreadable, skipping shot"
                );
                out.skipped.push(SkippedShot {
                    id,
                    image,
                    reason: SkipReason::Unreadable(e.to_string()),
                });
                continue;
            }
        };

        let timing = record.timing.as_deref().unwrap_or(DEFAULT_TIMING);
        let range = parse_interval(timing).map_err(|e| in_shot(&id, e))?;
        if range.duration() <= 0.0 {
            return Err(StoryreelError::format(format!(
                "shot {id}: timing '{timing}' has non-positive duration"
            )));
        }

        let motion = record
            .motion
            .as_deref()
            .map(parse_motion_effect)
            .transpose()
            .map_err(|e| in_shot(&id, e))?;

        out.shots.push(Shot {
            id,
            image,
            source: Resolution::new(width, height)?,
            range,
            motion,
        });
    }

    if out.shots.is_empty() {
        return Err(StoryreelError::validation(format!(
            "no valid shots found ({} skipped)",
            out.skipped.len()
        )));
    }
    tracing::info!(
        shots = out.shots.len(),
        skipped = out.skipped.len(),
        "resolved shot list"
    );
    Ok(out)
}

/// Prefix an error message with the shot it came from, keeping its variant.
fn in_shot(id: &str, err: StoryreelError) -> StoryreelError {
    match err {
        StoryreelError::Format(m) => StoryreelError::format(format!("shot {id}: {m}")),
        StoryreelError::Validation(m) => StoryreelError::validation(format!("shot {id}: {m}")),
        other => other,
    }
}

#[cfg(test)]
#[path = "../tests/unit/scenario/resolve.rs"]
mod tests;
