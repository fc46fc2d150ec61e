//! Stepped blur ramps that turn a plain cross-fade into a blur-dissolve.

use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Number of equal steps a ramp is split into.
pub const RAMP_STEPS: usize = 3;

/// Blur radii (Gaussian sigma) for the three ramp steps.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlurLevels {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl Default for BlurLevels {
    fn default() -> Self {
        Self {
            low: 2.0,
            mid: 5.0,
            high: 10.0,
        }
    }
}

impl BlurLevels {
    pub fn validate(self) -> StoryreelResult<()> {
        let all = [self.low, self.mid, self.high];
        if all.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(StoryreelError::validation("blur levels must be finite and > 0"));
        }
        if !(self.low < self.mid && self.mid < self.high) {
            return Err(StoryreelError::validation(
                "blur levels must be strictly increasing (low < mid < high)",
            ));
        }
        Ok(())
    }

    fn ascending(self) -> [f64; RAMP_STEPS] {
        [self.low, self.mid, self.high]
    }
}

/// Which end of a clip a ramp covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RampSide {
    /// Head of an incoming clip: high -> low, starting at clip time 0.
    Incoming,
    /// Tail of an outgoing clip: low -> high, starting at the clip's base duration.
    Outgoing,
}

/// One enable-window `[start, end)` in clip-local seconds with a fixed radius.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BlurWindow {
    pub start: f64,
    pub end: f64,
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BlurRamp {
    pub side: RampSide,
    pub windows: [BlurWindow; RAMP_STEPS],
}

fn ramp(side: RampSide, start: f64, overlap: f64, radii: [f64; RAMP_STEPS]) -> BlurRamp {
    let step = overlap / RAMP_STEPS as f64;
    let windows = std::array::from_fn(|i| BlurWindow {
        start: start + step * i as f64,
        // The last window ends exactly at `start + overlap`, not `start + 3 * step`.
        end: if i + 1 == RAMP_STEPS {
            start + overlap
        } else {
            start + step * (i + 1) as f64
        },
        radius: radii[i],
    });
    BlurRamp { side, windows }
}

/// Ramp over the overlap tail of an outgoing clip, starting at `base_duration`.
pub fn outgoing_tail(base_duration: f64, overlap: f64, levels: BlurLevels) -> BlurRamp {
    ramp(RampSide::Outgoing, base_duration, overlap, levels.ascending())
}

/// Ramp over the head of an incoming clip, starting at clip time 0.
pub fn incoming_head(overlap: f64, levels: BlurLevels) -> BlurRamp {
    let mut radii = levels.ascending();
    radii.reverse();
    ramp(RampSide::Incoming, 0.0, overlap, radii)
}

/// Blur stages attached to one clip.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ClipBlur {
    pub head: Option<BlurRamp>,
    pub tail: Option<BlurRamp>,
}

impl ClipBlur {
    /// Ramps in the order they are applied to the clip stream.
    pub fn stages(&self) -> impl Iterator<Item = &BlurRamp> {
        self.head.iter().chain(self.tail.iter())
    }
}

/// Blur stages for the clip at `position` in a sequence of `count` clips.
///
/// The first clip gets no head and the last clip gets no tail: nothing dissolves into the
/// opening frame, and the final overlap is rendered unblurred even though the stream is still
/// extended by one overlap.
pub fn annotate_clip(
    position: usize,
    count: usize,
    base_duration: f64,
    overlap: f64,
    levels: BlurLevels,
) -> ClipBlur {
    ClipBlur {
        head: (position > 0).then(|| incoming_head(overlap, levels)),
        tail: (position + 1 < count).then(|| outgoing_tail(base_duration, overlap, levels)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
