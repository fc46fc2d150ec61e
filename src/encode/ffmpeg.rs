use std::fmt::Write as _;
use std::path::Path;

use crate::{
    compile::graph::{Node, RenderGraph, Stage},
    config::EncoderSettings,
    effects::blur::BlurRamp,
    expression::lower::LowerCtx,
    foundation::math::round_micros,
};

/// Seconds as ffmpeg option text, rounded to microseconds (`7`, `0.333333`).
pub fn fmt_secs(secs: f64) -> String {
    round_micros(secs).to_string()
}

fn lower_blur(ramp: &BlurRamp) -> String {
    ramp.windows
        .iter()
        .map(|w| {
            // Half-open window: adjacent steps never both apply at a boundary instant.
            format!(
                "gblur=sigma={}:enable='gte(t,{})*lt(t,{})'",
                w.radius,
                fmt_secs(w.start),
                fmt_secs(w.end)
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Filter text for one stage, without pads.
pub fn lower_stage(stage: &Stage) -> String {
    match stage {
        Stage::Normalize { size, pix_fmt } => format!(
            "format={pix_fmt},scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h},setsar=1",
            w = size.width,
            h = size.height
        ),
        Stage::Motion { path, size, fps } => {
            let ctx = LowerCtx {
                total_frames: path.total_frames,
            };
            format!(
                "zoompan=z='{}':d={}:x='{}':y='{}':s={size}:fps={fps}",
                path.zoom.lower(ctx),
                path.total_frames,
                path.x.lower(ctx),
                path.y.lower(ctx),
            )
        }
        Stage::Blur { ramp } => lower_blur(ramp),
        Stage::Transition { transition } => format!(
            "xfade=transition={}:duration={}:offset={}",
            transition.style.xfade_name(),
            fmt_secs(transition.duration),
            fmt_secs(transition.offset)
        ),
        Stage::Resize { size } => format!("scale={}:{}", size.width, size.height),
    }
}

/// `[in...]filter[out]`
pub fn lower_node(node: &Node) -> String {
    let mut out = String::new();
    for pad in &node.inputs {
        let _ = write!(out, "{pad}");
    }
    out.push_str(&lower_stage(&node.stage));
    let _ = write!(out, "[{}]", node.output);
    out
}

/// The whole graph as a `-filter_complex` argument.
pub fn filter_complex(graph: &RenderGraph) -> String {
    graph
        .nodes
        .iter()
        .map(lower_node)
        .collect::<Vec<_>>()
        .join(";")
}

/// A fully lowered ffmpeg invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FfmpegCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl FfmpegCommand {
    /// POSIX-shell rendition, for dry runs and logs.
    pub fn to_shell(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=,+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

fn path_arg(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

/// Build the ffmpeg argv that renders `graph` into `output`.
///
/// Images are inputs `0..n` in clip order; the audio track, when bound, is input `n`. The
/// output is always cut to the composed duration.
pub fn build_command(
    graph: &RenderGraph,
    encoder: &EncoderSettings,
    output: &Path,
) -> FfmpegCommand {
    let mut args: Vec<String> = ["-y", "-hide_banner", "-loglevel", "error"]
        .map(String::from)
        .to_vec();

    for input in &graph.inputs {
        args.push("-i".into());
        args.push(path_arg(input));
    }
    if let Some(audio) = &graph.audio {
        args.push("-i".into());
        args.push(path_arg(&audio.path));
    }

    args.push("-filter_complex".into());
    args.push(filter_complex(graph));
    args.push("-map".into());
    args.push(format!("[{}]", graph.output));

    if graph.audio.is_some() {
        args.push("-map".into());
        args.push(format!("{}:a", graph.audio_input_index()));
        args.push("-c:a".into());
        args.push(encoder.audio_codec.clone());
    }

    args.extend([
        "-c:v".to_string(),
        encoder.video_codec.clone(),
        "-preset".to_string(),
        encoder.preset.clone(),
        "-crf".to_string(),
        encoder.crf.to_string(),
        "-pix_fmt".to_string(),
        encoder.pix_fmt.clone(),
        "-t".to_string(),
        fmt_secs(graph.total_duration),
    ]);
    args.push(path_arg(output));

    FfmpegCommand {
        program: "ffmpeg".to_string(),
        args,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
