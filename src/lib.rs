//! Storyreel compiles a timed list of still images into a single ffmpeg filter graph.
//!
//! Each shot gets a Ken Burns camera move, adjacent shots are joined by a blurred cross-dissolve
//! (or a random xfade style), and an optional narration track is muxed and cut to the composed
//! length. The public API is compile-then-render:
//!
//! - Load a [`Scenario`] and a [`CompilerConfig`]
//! - [`compile`] it into a [`Compiled`] graph (pure, seedable)
//! - Print its [`FfmpegCommand`] or hand it to a [`Renderer`] with [`render`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod audio;
pub(crate) mod compile;
pub(crate) mod config;
pub(crate) mod effects;
pub(crate) mod encode;
pub(crate) mod expression;
pub(crate) mod imagegen;
pub(crate) mod motion;
pub(crate) mod pipeline;
pub(crate) mod render;
pub(crate) mod scenario;
pub(crate) mod speech;
pub(crate) mod timing;

pub use crate::foundation::core::{Fps, Resolution};
pub use crate::foundation::error::{GenerationFailure, StoryreelError, StoryreelResult};
pub use crate::foundation::rng::rng_from_seed;

pub use crate::audio::reconcile::{AudioFit, AudioTrack, classify_fit, reconcile_audio};
pub use crate::audio::wav::{WavInfo, duration_secs, parse_wav_header, wrap_pcm16_mono};
pub use crate::compile::graph::{FINAL_LABEL, Node, Pad, RenderGraph, Stage, assemble_graph};
pub use crate::compile::schedule::{Transition, schedule_transitions, total_duration};
pub use crate::compile::timeline::{Clip, Timeline, build_timeline};
pub use crate::config::{CompilerConfig, EncoderSettings, SpeechConfig};
pub use crate::effects::blur::{BlurLevels, BlurRamp, BlurWindow, ClipBlur, RampSide};
pub use crate::effects::transitions::{TransitionPolicy, TransitionStyle, parse_transition_policy};
pub use crate::encode::ffmpeg::{FfmpegCommand, build_command, filter_complex, shell_quote};
pub use crate::expression::ast::{Expr, Var};
pub use crate::imagegen::{
    AspectRatio, ImageGenerator, ImageRequest, PlannedImage, generate_to_file,
    parse_shot_selection, plan_generations,
};
pub use crate::motion::{MotionEffect, MotionPath, Viewport, ZoomBounds, motion_path};
pub use crate::pipeline::{Compiled, Description, compile, render};
pub use crate::render::{
    FfmpegRenderer, RecordingRenderer, Renderer, STALE_TEMP_AGE, is_ffmpeg_on_path,
    render_atomically, sweep_stale_temps,
};
pub use crate::scenario::{
    Scenario, Shot, ShotList, ShotRecord, SkipReason, SkippedShot, resolve_shots,
};
pub use crate::speech::{
    SpeechChunk, SpeechSynthesizer, SpeechTrack, split_into_chunks, split_sentences,
    synthesize_track,
};
pub use crate::timing::{TimeRange, parse_interval};
