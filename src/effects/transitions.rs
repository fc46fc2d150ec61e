use rand::Rng;
use rand::seq::IndexedRandom;

use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Cross-clip transition styles understood by the renderer's `xfade` filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    Fade,
    SlideLeft,
    SlideRight,
    WipeLeft,
    WipeRight,
}

impl TransitionStyle {
    pub const ALL: [TransitionStyle; 5] = [
        Self::Fade,
        Self::SlideLeft,
        Self::SlideRight,
        Self::WipeLeft,
        Self::WipeRight,
    ];

    /// Name of the `xfade` transition.
    pub fn xfade_name(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::SlideLeft => "slideleft",
            Self::SlideRight => "slideright",
            Self::WipeLeft => "wipeleft",
            Self::WipeRight => "wiperight",
        }
    }
}

pub fn parse_transition_style(kind: &str) -> StoryreelResult<TransitionStyle> {
    let kind = kind.trim().to_ascii_lowercase().replace(['-', '_'], "");
    if kind.is_empty() {
        return Err(StoryreelError::validation("transition style must be non-empty"));
    }

    match kind.as_str() {
        "fade" | "crossfade" | "dissolve" => Ok(TransitionStyle::Fade),
        "slideleft" => Ok(TransitionStyle::SlideLeft),
        "slideright" => Ok(TransitionStyle::SlideRight),
        "wipeleft" => Ok(TransitionStyle::WipeLeft),
        "wiperight" => Ok(TransitionStyle::WipeRight),
        other => Err(StoryreelError::validation(format!(
            "unknown transition style '{other}'"
        ))),
    }
}

/// How transition styles are chosen per clip boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Fixed cross-dissolve, paired with blur ramps on both sides of every boundary.
    #[default]
    BlurDissolve,
    /// A random style from `styles` per boundary; no blur ramps.
    Random { styles: Vec<TransitionStyle> },
}

impl TransitionPolicy {
    pub fn random_all() -> Self {
        Self::Random {
            styles: TransitionStyle::ALL.to_vec(),
        }
    }

    pub fn uses_blur_ramp(&self) -> bool {
        matches!(self, Self::BlurDissolve)
    }

    pub fn validate(&self) -> StoryreelResult<()> {
        match self {
            Self::Random { styles } if styles.is_empty() => Err(StoryreelError::validation(
                "random transition policy needs at least one style",
            )),
            _ => Ok(()),
        }
    }

    /// Choose the style for one boundary. `BlurDissolve` never consumes randomness.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> StoryreelResult<TransitionStyle> {
        match self {
            Self::BlurDissolve => Ok(TransitionStyle::Fade),
            Self::Random { styles } => styles.choose(rng).copied().ok_or_else(|| {
                StoryreelError::validation("random transition policy needs at least one style")
            }),
        }
    }
}

/// Parse `blur`, `random`, or a comma-separated style list such as `fade,wipeleft`.
pub fn parse_transition_policy(s: &str) -> StoryreelResult<TransitionPolicy> {
    match s.trim().to_ascii_lowercase().as_str() {
        "blur" | "blur_dissolve" | "blur-dissolve" => Ok(TransitionPolicy::BlurDissolve),
        "random" => Ok(TransitionPolicy::random_all()),
        list => {
            let styles = list
                .split(',')
                .map(parse_transition_style)
                .collect::<StoryreelResult<Vec<_>>>()?;
            Ok(TransitionPolicy::Random { styles })
        }
    }
}

impl std::str::FromStr for TransitionPolicy {
    type Err = StoryreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_transition_policy(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
