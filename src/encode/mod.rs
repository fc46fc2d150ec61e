//! Lowering of render graphs to ffmpeg `-filter_complex` text and argument vectors.

pub(crate) mod ffmpeg;
