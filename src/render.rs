use std::io::Write as _;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, SystemTime};

use anyhow::Context as _;

use crate::{
    compile::graph::RenderGraph,
    config::EncoderSettings,
    encode::ffmpeg::{FfmpegCommand, build_command},
    foundation::error::{StoryreelError, StoryreelResult},
};

/// Executes a lowered ffmpeg invocation.
pub trait Renderer {
    fn render(&mut self, cmd: &FfmpegCommand) -> StoryreelResult<()>;
}

/// Runs the system `ffmpeg` in the foreground.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegRenderer;

impl Renderer for FfmpegRenderer {
    fn render(&mut self, cmd: &FfmpegCommand) -> StoryreelResult<()> {
        tracing::debug!(command = %cmd.to_shell(), "spawning renderer");
        let output = cmd
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| {
                format!(
                    "failed to run '{}' (is it installed and on PATH?)",
                    cmd.program
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StoryreelError::render(
                output.status.code(),
                stderr.trim().to_string(),
            ));
        }
        Ok(())
    }
}

/// Test double: records every command and writes a placeholder file at the output path.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<FfmpegCommand>,
    /// When set, every render fails with this exit code.
    pub fail_with: Option<i32>,
}

impl RecordingRenderer {
    pub fn failing(code: i32) -> Self {
        Self {
            commands: Vec::new(),
            fail_with: Some(code),
        }
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, cmd: &FfmpegCommand) -> StoryreelResult<()> {
        self.commands.push(cmd.clone());
        if let Some(code) = self.fail_with {
            return Err(StoryreelError::render(Some(code), "simulated renderer failure"));
        }
        if let Some(out) = cmd.args.last() {
            std::fs::write(out, b"rendered")
                .with_context(|| format!("failed to write placeholder '{out}'"))?;
        }
        Ok(())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> StoryreelResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

const TEMP_PREFIX: &str = ".storyreel-";

/// Temp files older than this are leftovers from an interrupted run.
pub const STALE_TEMP_AGE: Duration = Duration::from_secs(60 * 60);

/// Remove `.storyreel-*` temp files in `dir` last modified more than `max_age` ago.
///
/// Returns how many were removed. Unreadable entries are skipped.
pub fn sweep_stale_temps(dir: &Path, max_age: Duration) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    let now = SystemTime::now();
    let mut removed = 0;
    for entry in entries.flatten() {
        if !entry.file_name().to_string_lossy().starts_with(TEMP_PREFIX) {
            continue;
        }
        let stale = entry
            .metadata()
            .ok()
            .filter(|m| m.is_file())
            .and_then(|m| m.modified().ok())
            .and_then(|t| now.duration_since(t).ok())
            .is_some_and(|age| age > max_age);
        if stale && std::fs::remove_file(entry.path()).is_ok() {
            tracing::warn!(path = %entry.path().display(), "removed stale temp file");
            removed += 1;
        }
    }
    removed
}

fn temp_beside(path: &Path) -> StoryreelResult<tempfile::NamedTempFile> {
    ensure_parent_dir(path)?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    // ffmpeg picks the muxer from the extension, so the temp file keeps it.
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(&suffix)
        .tempfile_in(dir)
        .with_context(|| format!("failed to create temp file in '{}'", dir.display()))?;
    Ok(temp)
}

/// Render `graph` into a temp file next to `output`, then move it into place.
///
/// On failure the temp file is removed and `output` is left as it was. A process killed by a
/// signal cannot remove its temp file; such leftovers are swept from the output directory once
/// they are older than [`STALE_TEMP_AGE`].
#[tracing::instrument(skip_all, fields(output = %output.display()))]
pub fn render_atomically<R: Renderer + ?Sized>(
    renderer: &mut R,
    graph: &RenderGraph,
    encoder: &EncoderSettings,
    output: &Path,
) -> StoryreelResult<FfmpegCommand> {
    let temp = temp_beside(output)?;
    if let Some(dir) = temp.path().parent() {
        sweep_stale_temps(dir, STALE_TEMP_AGE);
    }
    let cmd = build_command(graph, encoder, temp.path());
    renderer.render(&cmd)?;
    temp.persist(output)
        .with_context(|| format!("failed to move render into '{}'", output.display()))?;
    tracing::info!(duration = graph.total_duration, "render complete");
    Ok(cmd)
}

/// Write `bytes` to `path` through a temp file in the same directory.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> StoryreelResult<()> {
    let mut temp = temp_beside(path)?;
    temp.write_all(bytes)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    temp.persist(path)
        .with_context(|| format!("failed to move file into '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/render/atomic.rs"]
mod tests;
