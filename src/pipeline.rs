use std::path::Path;

use rand::Rng;

use crate::{
    audio::reconcile::reconcile_audio,
    compile::{
        graph::{RenderGraph, assemble_graph},
        timeline::{Timeline, build_timeline},
    },
    config::CompilerConfig,
    encode::ffmpeg::{FfmpegCommand, build_command, filter_complex},
    foundation::error::StoryreelResult,
    render::{Renderer, render_atomically},
    scenario::{Scenario, ShotList, resolve_shots},
};

/// Everything produced by one compile, before anything is rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct Compiled {
    pub shots: ShotList,
    pub timeline: Timeline,
    pub graph: RenderGraph,
    pub fingerprint: u64,
}

/// Machine-readable summary printed by `--describe`.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Description<'a> {
    pub fingerprint: String,
    pub total_duration: f64,
    pub shots: &'a ShotList,
    pub timeline: &'a Timeline,
    pub graph: &'a RenderGraph,
    pub filter_complex: String,
}

impl Compiled {
    pub fn fingerprint_hex(&self) -> String {
        format!("{:016x}", self.fingerprint)
    }

    pub fn describe(&self) -> Description<'_> {
        Description {
            fingerprint: self.fingerprint_hex(),
            total_duration: self.graph.total_duration,
            shots: &self.shots,
            timeline: &self.timeline,
            graph: &self.graph,
            filter_complex: filter_complex(&self.graph),
        }
    }

    pub fn command(&self, cfg: &CompilerConfig, output: &Path) -> FfmpegCommand {
        build_command(&self.graph, &cfg.encoder, output)
    }
}

/// Scenario to render graph: resolve shots, lay out the timeline, assemble and bind audio.
///
/// Nothing is rendered; either the whole graph compiles or an error is returned.
#[tracing::instrument(skip_all, fields(root = %scenario.root.display(), limit = ?limit))]
pub fn compile<R: Rng + ?Sized>(
    scenario: &Scenario,
    limit: Option<usize>,
    audio: Option<&Path>,
    cfg: &CompilerConfig,
    rng: &mut R,
) -> StoryreelResult<Compiled> {
    cfg.validate()?;
    let shots = resolve_shots(scenario, limit)?;
    let timeline = build_timeline(&shots.shots, cfg, rng)?;
    let mut graph = assemble_graph(&timeline, cfg)?;
    if let Some(path) = audio {
        graph = graph.with_audio(reconcile_audio(path, timeline.total_duration)?);
    }

    let fingerprint = graph.fingerprint();
    tracing::info!(
        clips = timeline.clips.len(),
        transitions = timeline.transitions.len(),
        total_duration = timeline.total_duration,
        fingerprint = %format!("{fingerprint:016x}"),
        "compiled render graph"
    );
    Ok(Compiled {
        shots,
        timeline,
        graph,
        fingerprint,
    })
}

/// Render a compiled graph into `output` through `renderer`.
pub fn render<Rd: Renderer + ?Sized>(
    compiled: &Compiled,
    cfg: &CompilerConfig,
    renderer: &mut Rd,
    output: &Path,
) -> StoryreelResult<FfmpegCommand> {
    render_atomically(renderer, &compiled.graph, &cfg.encoder, output)
}
