//! Narration audio: WAV container helpers and fitting a track to the composed video length.

pub(crate) mod reconcile;
pub(crate) mod wav;
