//! Ken Burns motion paths: a virtual camera (zoom + top-left offset) over a still image.

use crate::{
    expression::{Env, Expr, Var},
    foundation::core::{Fps, Resolution},
    foundation::error::{StoryreelError, StoryreelResult},
};

/// Camera move applied to one clip.
///
/// There is no pan-down: sweeping toward the bottom edge was dropped from the effect set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionEffect {
    ZoomIn,
    ZoomOut,
    PanLeft,
    PanRight,
    PanUp,
    ZoomPanRight,
}

impl MotionEffect {
    pub const ALL: [MotionEffect; 6] = [
        Self::ZoomIn,
        Self::ZoomOut,
        Self::PanLeft,
        Self::PanRight,
        Self::PanUp,
        Self::ZoomPanRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::PanLeft => "pan_left",
            Self::PanRight => "pan_right",
            Self::PanUp => "pan_up",
            Self::ZoomPanRight => "zoom_pan_right",
        }
    }
}

impl std::fmt::Display for MotionEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn parse_motion_effect(kind: &str) -> StoryreelResult<MotionEffect> {
    let kind = kind.trim().to_ascii_lowercase().replace('-', "_");
    if kind.is_empty() {
        return Err(StoryreelError::validation("motion effect must be non-empty"));
    }

    match kind.as_str() {
        "zoom_in" | "zoomin" => Ok(MotionEffect::ZoomIn),
        "zoom_out" | "zoomout" => Ok(MotionEffect::ZoomOut),
        "pan_left" | "panleft" => Ok(MotionEffect::PanLeft),
        "pan_right" | "panright" => Ok(MotionEffect::PanRight),
        "pan_up" | "panup" => Ok(MotionEffect::PanUp),
        "zoom_pan_right" | "zoom_and_pan_right" | "zoom_pan_combo" => {
            Ok(MotionEffect::ZoomPanRight)
        }
        "pan_down" | "pandown" => Err(StoryreelError::validation(
            "pan_down is not part of the motion effect set",
        )),
        other => Err(StoryreelError::validation(format!(
            "unknown motion effect '{other}'"
        ))),
    }
}

/// Allowed magnification range. The design default is 1.0..=1.1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self { min: 1.0, max: 1.1 }
    }
}

impl ZoomBounds {
    pub fn validate(self) -> StoryreelResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(StoryreelError::validation("zoom bounds must be finite"));
        }
        if self.min < 1.0 {
            return Err(StoryreelError::validation("zoom.min must be >= 1.0"));
        }
        if self.max < self.min {
            return Err(StoryreelError::validation("zoom.max must be >= zoom.min"));
        }
        Ok(())
    }
}

/// Closed-form camera path for one clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MotionPath {
    pub effect: MotionEffect,
    /// `floor(duration * fps)`; progress is `frame_index / total_frames`.
    pub total_frames: u64,
    pub zoom: Expr,
    pub x: Expr,
    pub y: Expr,
}

/// Visible window at one frame, in source pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub x: f64,
    pub y: f64,
}

impl Viewport {
    /// Largest valid offset along an axis of length `dim` at this zoom.
    pub fn margin(self, dim: f64) -> f64 {
        dim - dim / self.zoom
    }

    /// `0 <= x <= w - w/zoom` and `0 <= y <= h - h/zoom`.
    pub fn is_within(self, source: Resolution) -> bool {
        let w = f64::from(source.width);
        let h = f64::from(source.height);
        self.zoom >= 1.0
            && (0.0..=self.margin(w)).contains(&self.x)
            && (0.0..=self.margin(h)).contains(&self.y)
    }
}

fn margin(dim: Var) -> Expr {
    Expr::var(dim) - Expr::var(dim) / Expr::var(Var::Zoom)
}

fn centered(dim: Var) -> Expr {
    margin(dim) / Expr::constant(2.0)
}

fn one_minus_progress() -> Expr {
    Expr::constant(1.0) - Expr::progress()
}

/// Build the motion path for `effect` over `duration_secs` at `fps`.
///
/// Pans hold zoom at `bounds.max` so their sweep margin is fixed and non-zero. Every offset is
/// expressed against the zoom of the *current* frame, so centering stays valid while zooming.
pub fn motion_path(
    effect: MotionEffect,
    duration_secs: f64,
    fps: Fps,
    bounds: ZoomBounds,
) -> StoryreelResult<MotionPath> {
    bounds.validate()?;
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(StoryreelError::validation(format!(
            "motion duration must be > 0, got {duration_secs}"
        )));
    }
    let total_frames = fps.secs_to_frames_floor(duration_secs);
    if total_frames == 0 {
        return Err(StoryreelError::validation(format!(
            "motion duration {duration_secs}s is shorter than one frame at {fps} fps"
        )));
    }

    let zmin = || Expr::constant(bounds.min);
    let zmax = || Expr::constant(bounds.max);
    let ramp_up = || zmin() + (zmax() - zmin()) * Expr::progress();
    let ramp_down = || zmax() - (zmax() - zmin()) * Expr::progress();

    let (zoom, x, y) = match effect {
        MotionEffect::ZoomIn => (ramp_up(), centered(Var::InputWidth), centered(Var::InputHeight)),
        MotionEffect::ZoomOut => (
            ramp_down(),
            centered(Var::InputWidth),
            centered(Var::InputHeight),
        ),
        MotionEffect::PanLeft => (
            zmax(),
            margin(Var::InputWidth) * one_minus_progress(),
            centered(Var::InputHeight),
        ),
        MotionEffect::PanRight => (
            zmax(),
            margin(Var::InputWidth) * Expr::progress(),
            centered(Var::InputHeight),
        ),
        MotionEffect::PanUp => (
            zmax(),
            centered(Var::InputWidth),
            margin(Var::InputHeight) * one_minus_progress(),
        ),
        // The margin is 0 at zoom 1.0, so the sweep starts at a valid offset of 0.
        MotionEffect::ZoomPanRight => (
            ramp_up(),
            margin(Var::InputWidth) * Expr::progress(),
            centered(Var::InputHeight),
        ),
    };

    Ok(MotionPath {
        effect,
        total_frames,
        zoom,
        x,
        y,
    })
}

impl MotionPath {
    /// Normalized progress for `frame`, clamped to `[0, 1]`.
    pub fn progress_at(&self, frame: u64) -> f64 {
        frame.min(self.total_frames) as f64 / self.total_frames as f64
    }

    /// Evaluate the camera at `frame` over a source of size `source`.
    pub fn sample(&self, frame: u64, source: Resolution) -> StoryreelResult<Viewport> {
        let mut env = Env {
            progress: self.progress_at(frame),
            input_width: f64::from(source.width),
            input_height: f64::from(source.height),
            zoom: None,
        };
        let zoom = self.zoom.eval(&env)?;
        env.zoom = Some(zoom);
        Ok(Viewport {
            zoom,
            x: self.x.eval(&env)?,
            y: self.y.eval(&env)?,
        })
    }

    /// Sample every frame `0..=total_frames` and fail on the first out-of-bounds viewport.
    pub fn check_bounds(&self, source: Resolution) -> StoryreelResult<()> {
        for frame in 0..=self.total_frames {
            let vp = self.sample(frame, source)?;
            if !vp.is_within(source) {
                return Err(StoryreelError::validation(format!(
                    "{} viewport out of bounds at frame {frame}: zoom={} x={} y={}",
                    self.effect, vp.zoom, vp.x, vp.y
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/motion/path.rs"]
mod tests;
