//! Image generation seam: request planning from a scenario and atomic writes of results.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{
    foundation::error::{GenerationFailure, StoryreelError, StoryreelResult},
    render::write_atomic,
    scenario::{Scenario, pad_scene_id},
};

pub const DEFAULT_MODEL: &str = "gemini-3-pro-image-preview";

/// Reference images live next to the scenario in this directory.
pub const PICTURES_DIR: &str = "pictures";

/// Extensions tried when a reference name does not match a file exactly.
pub const REFERENCE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AspectRatio {
    Square,
    #[default]
    Landscape,
    Standard,
    Portrait,
    PortraitStandard,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Standard => "4:3",
            Self::Portrait => "9:16",
            Self::PortraitStandard => "3:4",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = StoryreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1:1" => Ok(Self::Square),
            "16:9" => Ok(Self::Landscape),
            "4:3" => Ok(Self::Standard),
            "9:16" => Ok(Self::Portrait),
            "3:4" => Ok(Self::PortraitStandard),
            other => Err(StoryreelError::format(format!(
                "unsupported aspect ratio '{other}' (expected 1:1, 16:9, 4:3, 9:16 or 3:4)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub reference_images: Vec<PathBuf>,
    pub aspect_ratio: AspectRatio,
    pub model: String,
}

/// Creative image API.
pub trait ImageGenerator {
    /// Encoded image bytes (PNG) for `req`.
    fn generate(&mut self, req: &ImageRequest) -> StoryreelResult<Vec<u8>>;
}

/// Strip markdown bold markers and turn `<br>` into newlines.
pub fn clean_prompt(prompt: &str) -> String {
    prompt.replace("**", "").replace("<br>", "\n")
}

/// Resolve comma-separated reference names against `pictures_dir`.
///
/// A name that does not exist as given is retried with each of [`REFERENCE_EXTENSIONS`] on
/// its stem. Names that still do not resolve are warned about and dropped.
pub fn resolve_reference_images(names: &str, pictures_dir: &Path) -> Vec<PathBuf> {
    names
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .filter_map(|name| {
            let exact = pictures_dir.join(name);
            if exact.is_file() {
                return Some(exact);
            }
            let stem = Path::new(name).file_stem()?.to_string_lossy().into_owned();
            let found = REFERENCE_EXTENSIONS
                .iter()
                .map(|ext| pictures_dir.join(format!("{stem}.{ext}")))
                .find(|p| p.is_file());
            if found.is_none() {
                tracing::warn!(reference = name, "reference image not found");
            }
            found
        })
        .collect()
}

/// Parse a shot selection like `"1, 3-5"` into padded ids.
pub fn parse_shot_selection(selection: &str) -> StoryreelResult<BTreeSet<String>> {
    let mut out = BTreeSet::new();
    for part in selection.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((a, b)) => {
                let bad =
                    || StoryreelError::format(format!("invalid shot range '{part}' (expected A-B)"));
                let a: u32 = a.trim().parse().map_err(|_| bad())?;
                let b: u32 = b.trim().parse().map_err(|_| bad())?;
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                out.extend((lo..=hi).map(|n| pad_scene_id(&n.to_string())));
            }
            None => {
                out.insert(pad_scene_id(part));
            }
        }
    }
    Ok(out)
}

/// One image the scenario still needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedImage {
    pub shot_id: String,
    pub request: ImageRequest,
    pub output: PathBuf,
}

/// Build generation requests for every record with a prompt, optionally restricted to
/// `selection`. Outputs go where [`crate::scenario::resolve_shots`] will look for them.
pub fn plan_generations(
    scenario: &Scenario,
    selection: Option<&BTreeSet<String>>,
    aspect_ratio: AspectRatio,
    model: &str,
) -> Vec<PlannedImage> {
    let pictures = scenario.root.join(PICTURES_DIR);
    scenario
        .records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| {
            let shot_id = record.shot_id(i);
            if selection.is_some_and(|s| !s.contains(&shot_id)) {
                return None;
            }
            let prompt = clean_prompt(record.image_prompt.as_deref()?);
            let reference_images = record
                .reference_images
                .as_deref()
                .map(|names| resolve_reference_images(names, &pictures))
                .unwrap_or_default();
            Some(PlannedImage {
                output: scenario.image_path(record, &shot_id),
                shot_id,
                request: ImageRequest {
                    prompt,
                    reference_images,
                    aspect_ratio,
                    model: model.to_string(),
                },
            })
        })
        .collect()
}

/// Generate one image and write it atomically to `output`.
///
/// Reference images that no longer exist are dropped with a warning before the call. An empty
/// response is a [`GenerationFailure::EmptyResponse`]; other failures pass through unchanged so
/// safety rejections stay distinguishable from transport errors.
#[tracing::instrument(skip_all, fields(output = %output.display(), model = %req.model))]
pub fn generate_to_file<G: ImageGenerator + ?Sized>(
    generator: &mut G,
    req: &ImageRequest,
    output: &Path,
) -> StoryreelResult<PathBuf> {
    let mut req = req.clone();
    req.reference_images.retain(|p| {
        let keep = p.is_file();
        if !keep {
            tracing::warn!(reference = %p.display(), "dropping missing reference image");
        }
        keep
    });

    let bytes = generator.generate(&req)?;
    if bytes.is_empty() {
        return Err(StoryreelError::generation(GenerationFailure::EmptyResponse));
    }
    write_atomic(output, &bytes)?;
    tracing::info!(bytes = bytes.len(), "image saved");
    Ok(output.to_path_buf())
}

#[cfg(test)]
#[path = "../tests/unit/imagegen/generate.rs"]
mod tests;
