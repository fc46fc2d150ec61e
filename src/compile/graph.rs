use std::fmt;
use std::path::PathBuf;

use crate::{
    audio::reconcile::AudioTrack,
    compile::{
        schedule::Transition,
        timeline::{Clip, Timeline},
    },
    config::CompilerConfig,
    effects::blur::{BlurRamp, RampSide},
    encode::ffmpeg::filter_complex,
    foundation::{
        core::{Fps, Resolution},
        error::{StoryreelError, StoryreelResult},
        math::{Fnv1a64, round_micros},
    },
    motion::MotionPath,
};

/// Label of the stream handed to the encoder.
pub const FINAL_LABEL: &str = "final";

/// Filter input: either the video stream of an input file or a labeled intermediate stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pad {
    Input(usize),
    Label(String),
}

impl Pad {
    pub fn label(name: impl Into<String>) -> Self {
        Self::Label(name.into())
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(i) => write!(f, "[{i}:v]"),
            Self::Label(l) => write!(f, "[{l}]"),
        }
    }
}

/// What a node does to its inputs.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stage {
    /// Pixel format, cover-scale and center-crop to the working resolution.
    Normalize { size: Resolution, pix_fmt: String },
    /// Ken Burns camera at the working resolution.
    Motion {
        path: MotionPath,
        size: Resolution,
        fps: Fps,
    },
    Blur { ramp: BlurRamp },
    Transition { transition: Transition },
    /// Downscale to the delivery resolution.
    Resize { size: Resolution },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Node {
    pub inputs: Vec<Pad>,
    pub stage: Stage,
    pub output: String,
}

/// Acyclic filter graph for one render: every image input flows through its own chain, the
/// chains are folded together by transitions, and the result is resized to [`FINAL_LABEL`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderGraph {
    /// Image inputs, in ffmpeg input order.
    pub inputs: Vec<PathBuf>,
    /// Nodes in topological order.
    pub nodes: Vec<Node>,
    pub output: String,
    pub total_duration: f64,
    pub audio: Option<AudioTrack>,
}

impl RenderGraph {
    pub fn with_audio(mut self, track: AudioTrack) -> Self {
        self.audio = Some(track);
        self
    }

    /// Input index the audio track occupies when present (after every image).
    pub fn audio_input_index(&self) -> usize {
        self.inputs.len()
    }

    pub fn node(&self, output: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.output == output)
    }

    /// Check the wiring: labels are defined before use, every intermediate label is consumed
    /// exactly once, every image input is read exactly once, and only the output dangles.
    pub fn validate(&self) -> StoryreelResult<()> {
        let mut defined: Vec<&str> = Vec::with_capacity(self.nodes.len());
        let mut consumed: Vec<&str> = Vec::new();
        let mut inputs_read = vec![0usize; self.inputs.len()];

        for node in &self.nodes {
            for pad in &node.inputs {
                match pad {
                    Pad::Input(i) => {
                        let slot = inputs_read.get_mut(*i).ok_or_else(|| {
                            StoryreelError::validation(format!(
                                "node '{}' reads missing input {i}",
                                node.output
                            ))
                        })?;
                        *slot += 1;
                    }
                    Pad::Label(l) => {
                        if !defined.contains(&l.as_str()) {
                            return Err(StoryreelError::validation(format!(
                                "node '{}' reads '{l}' before it is defined",
                                node.output
                            )));
                        }
                        if consumed.contains(&l.as_str()) {
                            return Err(StoryreelError::validation(format!(
                                "label '{l}' is consumed more than once"
                            )));
                        }
                        consumed.push(l);
                    }
                }
            }
            if defined.contains(&node.output.as_str()) {
                return Err(StoryreelError::validation(format!(
                    "label '{}' is defined more than once",
                    node.output
                )));
            }
            defined.push(&node.output);
        }

        if let Some(i) = inputs_read.iter().position(|&n| n != 1) {
            return Err(StoryreelError::validation(format!(
                "input {i} is read {} times",
                inputs_read[i]
            )));
        }
        for label in &defined {
            let is_output = *label == self.output;
            if is_output == consumed.contains(label) {
                return Err(StoryreelError::validation(format!(
                    "label '{label}' is left dangling or the output is consumed"
                )));
            }
        }
        Ok(())
    }

    /// Stable hash of everything that determines the rendered bytes except the output path.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        for input in &self.inputs {
            h.write_str(&input.to_string_lossy());
        }
        h.write_str(&filter_complex(self));
        h.write_bytes(&round_micros(self.total_duration).to_bits().to_le_bytes());
        if let Some(audio) = &self.audio {
            h.write_str(&audio.path.to_string_lossy());
        }
        h.finish()
    }
}

fn clip_chain(
    index: usize,
    clip: &Clip,
    working: Resolution,
    cfg: &CompilerConfig,
) -> (Vec<Node>, String) {
    let normalized = format!("sc{index}");
    let moved = format!("kb{index}");
    let mut nodes = vec![
        Node {
            inputs: vec![Pad::Input(index)],
            stage: Stage::Normalize {
                size: working,
                pix_fmt: cfg.encoder.pix_fmt.clone(),
            },
            output: normalized.clone(),
        },
        Node {
            inputs: vec![Pad::label(normalized)],
            stage: Stage::Motion {
                path: clip.motion.clone(),
                size: working,
                fps: cfg.fps,
            },
            output: moved.clone(),
        },
    ];

    let mut current = moved;
    for ramp in clip.blur.stages() {
        let prefix = match ramp.side {
            RampSide::Incoming => "bh",
            RampSide::Outgoing => "bt",
        };
        let out = format!("{prefix}{index}");
        nodes.push(Node {
            inputs: vec![Pad::label(current)],
            stage: Stage::Blur { ramp: ramp.clone() },
            output: out.clone(),
        });
        current = out;
    }
    (nodes, current)
}

/// Lower a timeline into a [`RenderGraph`].
///
/// The transitions are a left fold over the clip outputs: each step consumes the combined stream
/// so far plus the next clip and yields a fresh combined label.
#[tracing::instrument(skip_all, fields(clips = timeline.clips.len()))]
pub fn assemble_graph(timeline: &Timeline, cfg: &CompilerConfig) -> StoryreelResult<RenderGraph> {
    if timeline.clips.is_empty() {
        return Err(StoryreelError::validation("cannot assemble an empty timeline"));
    }
    if timeline.transitions.len() + 1 != timeline.clips.len() {
        return Err(StoryreelError::validation(format!(
            "{} clips need {} transitions, got {}",
            timeline.clips.len(),
            timeline.clips.len() - 1,
            timeline.transitions.len()
        )));
    }

    let working = cfg.working_resolution()?;
    let (mut nodes, clip_outputs) = timeline.clips.iter().enumerate().fold(
        (Vec::new(), Vec::with_capacity(timeline.clips.len())),
        |(mut nodes, mut outs), (i, clip)| {
            let (chain, out) = clip_chain(i, clip, working, cfg);
            nodes.extend(chain);
            outs.push(out);
            (nodes, outs)
        },
    );

    let (combined, xfades) = timeline
        .transitions
        .iter()
        .zip(clip_outputs.iter().skip(1))
        .fold(
            (clip_outputs[0].clone(), Vec::new()),
            |(acc, mut xfades), (t, next)| {
                let out = format!("vt{}", t.boundary + 1);
                xfades.push(Node {
                    inputs: vec![Pad::label(acc), Pad::label(next.as_str())],
                    stage: Stage::Transition {
                        transition: t.clone(),
                    },
                    output: out.clone(),
                });
                (out, xfades)
            },
        );
    nodes.extend(xfades);

    nodes.push(Node {
        inputs: vec![Pad::label(combined)],
        stage: Stage::Resize {
            size: cfg.resolution,
        },
        output: FINAL_LABEL.to_string(),
    });

    let graph = RenderGraph {
        inputs: timeline.clips.iter().map(|c| c.image.clone()).collect(),
        nodes,
        output: FINAL_LABEL.to_string(),
        total_duration: timeline.total_duration,
        audio: None,
    };
    graph.validate()?;
    tracing::debug!(nodes = graph.nodes.len(), "assembled filter graph");
    Ok(graph)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/graph.rs"]
mod tests;
