use std::path::PathBuf;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::{
    compile::schedule::{Transition, schedule_transitions, total_duration},
    config::CompilerConfig,
    effects::blur::{ClipBlur, annotate_clip},
    foundation::error::{StoryreelError, StoryreelResult},
    motion::{MotionEffect, MotionPath, motion_path},
    scenario::Shot,
};

/// A shot placed on the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Clip {
    /// Position among surviving shots; also the ffmpeg input index.
    pub index: usize,
    pub shot_id: String,
    pub image: PathBuf,
    pub base_duration: f64,
    /// `base_duration + overlap`, so the next clip has something to dissolve over.
    pub render_duration: f64,
    pub motion: MotionPath,
    pub blur: ClipBlur,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Timeline {
    pub clips: Vec<Clip>,
    pub transitions: Vec<Transition>,
    pub overlap: f64,
    pub total_duration: f64,
}

fn choose_effect<R: Rng + ?Sized>(
    shot: &Shot,
    cfg: &CompilerConfig,
    rng: &mut R,
) -> StoryreelResult<MotionEffect> {
    match shot.motion {
        Some(effect) => Ok(effect),
        None => cfg
            .effects
            .choose(rng)
            .copied()
            .ok_or_else(|| StoryreelError::validation("no motion effects enabled")),
    }
}

/// Turn resolved shots into clips plus their transition schedule.
///
/// Every motion path is sampled against the working resolution before it is accepted, so an
/// out-of-bounds viewport is a compile error rather than a render artifact.
#[tracing::instrument(skip_all, fields(shots = shots.len()))]
pub fn build_timeline<R: Rng + ?Sized>(
    shots: &[Shot],
    cfg: &CompilerConfig,
    rng: &mut R,
) -> StoryreelResult<Timeline> {
    if shots.is_empty() {
        return Err(StoryreelError::validation("timeline needs at least one shot"));
    }
    cfg.validate()?;

    let overlap = cfg.overlap_secs;
    let working = cfg.working_resolution()?;
    let count = shots.len();

    let mut clips = Vec::with_capacity(count);
    for (index, shot) in shots.iter().enumerate() {
        let base_duration = shot.base_duration();
        let render_duration = base_duration + overlap;
        let effect = choose_effect(shot, cfg, rng)?;
        let motion = motion_path(effect, render_duration, cfg.fps, cfg.zoom)?;
        motion.check_bounds(working)?;

        let blur = if cfg.transitions.uses_blur_ramp() {
            annotate_clip(index, count, base_duration, overlap, cfg.blur)
        } else {
            ClipBlur::default()
        };

        tracing::debug!(
            shot = %shot.id,
            index,
            effect = %effect,
            base_duration,
            frames = motion.total_frames,
            "clip"
        );
        clips.push(Clip {
            index,
            shot_id: shot.id.clone(),
            image: shot.image.clone(),
            base_duration,
            render_duration,
            motion,
            blur,
        });
    }

    let durations: Vec<f64> = clips.iter().map(|c| c.base_duration).collect();
    let transitions = schedule_transitions(&durations, overlap, &cfg.transitions, rng)?;
    let total_duration = total_duration(&durations, overlap);

    Ok(Timeline {
        clips,
        transitions,
        overlap,
        total_duration,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/timeline.rs"]
mod tests;
