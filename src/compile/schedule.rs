use rand::Rng;

use crate::{
    effects::transitions::{TransitionPolicy, TransitionStyle},
    foundation::error::StoryreelResult,
};

/// Cross-dissolve between clip `boundary` and clip `boundary + 1`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Transition {
    /// Index of the outgoing clip.
    pub boundary: usize,
    pub style: TransitionStyle,
    /// Overlap length in seconds.
    pub duration: f64,
    /// Start of the dissolve on the combined stream, in seconds.
    pub offset: f64,
}

/// Cumulative end times of each clip's base duration: `d0, d0+d1, ...`.
pub fn cumulative_offsets(base_durations: &[f64]) -> Vec<f64> {
    base_durations
        .iter()
        .scan(0.0, |acc, d| {
            *acc += d;
            Some(*acc)
        })
        .collect()
}

/// One transition per adjacent pair, starting at `Σ base_duration(0..=i)`.
///
/// Offsets come from declared durations only, never from rendered lengths, so the schedule does
/// not depend on how a backend rounds frames. A single clip yields no transitions.
pub fn schedule_transitions<R: Rng + ?Sized>(
    base_durations: &[f64],
    overlap: f64,
    policy: &TransitionPolicy,
    rng: &mut R,
) -> StoryreelResult<Vec<Transition>> {
    let boundaries = base_durations.len().saturating_sub(1);
    cumulative_offsets(base_durations)
        .into_iter()
        .take(boundaries)
        .enumerate()
        .map(|(boundary, offset)| {
            Ok(Transition {
                boundary,
                style: policy.pick(rng)?,
                duration: overlap,
                offset,
            })
        })
        .collect()
}

/// Length of the composed output: every base duration plus one trailing overlap.
pub fn total_duration(base_durations: &[f64], overlap: f64) -> f64 {
    base_durations.iter().sum::<f64>() + overlap
}

#[cfg(test)]
#[path = "../../tests/unit/compile/schedule.rs"]
mod tests;
