//! Narration synthesis: sentence-aligned chunking and a synthesizer seam.
//!
//! Providers return raw 16-bit mono PCM per request. Chunks are synthesized in order and the
//! PCM is concatenated before the WAV header is written, so the full track has exactly one
//! header regardless of how many requests it took.

use std::path::{Path, PathBuf};

use crate::{
    audio::wav::wrap_pcm16_mono,
    config::SpeechConfig,
    foundation::error::{GenerationFailure, StoryreelError, StoryreelResult},
    render::write_atomic,
};

fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Split into sentences ending in `.`, `!` or `?` followed by whitespace or end of text.
///
/// Trailing whitespace stays attached to its sentence; text after the last terminator is a
/// final sentence of its own.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        match chars.peek() {
            None => {
                out.push(&text[start..]);
                start = text.len();
            }
            Some((_, next)) if next.is_whitespace() => {
                let mut end = i + c.len_utf8();
                while let Some(&(j, w)) = chars.peek() {
                    if !w.is_whitespace() {
                        break;
                    }
                    end = j + w.len_utf8();
                    chars.next();
                }
                out.push(&text[start..end]);
                start = end;
            }
            Some(_) => {}
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Group sentences into chunks of roughly `target` words.
///
/// A chunk is closed as soon as it reaches `target - tolerance` words. A sentence that would
/// push the open chunk past `target + tolerance` starts a new chunk instead, so only a single
/// oversized sentence can exceed the upper bound.
pub fn split_into_chunks(text: &str, target: usize, tolerance: usize) -> Vec<String> {
    let low = target.saturating_sub(tolerance);
    let high = target + tolerance;

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut words = 0;
    let mut close = |current: &mut String, words: &mut usize| {
        let chunk = current.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        current.clear();
        *words = 0;
    };

    for sentence in split_sentences(text) {
        let n = word_count(sentence);
        if words + n <= high {
            current.push_str(sentence);
            words += n;
            if words >= low {
                close(&mut current, &mut words);
            }
        } else {
            close(&mut current, &mut words);
            current.push_str(sentence);
            words = n;
        }
    }
    close(&mut current, &mut words);
    chunks
}

/// Text-to-speech provider.
pub trait SpeechSynthesizer {
    /// Raw little-endian 16-bit mono PCM for `text`.
    fn synthesize(&mut self, text: &str, voice: &str) -> StoryreelResult<Vec<u8>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechChunk {
    pub text: String,
    pub pcm: Vec<u8>,
}

/// Synthesized narration, kept per chunk until written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechTrack {
    pub voice: String,
    pub sample_rate: u32,
    pub chunks: Vec<SpeechChunk>,
}

impl SpeechTrack {
    /// All chunks concatenated in order under a single WAV header.
    pub fn wav(&self) -> StoryreelResult<Vec<u8>> {
        let pcm: Vec<u8> = self
            .chunks
            .iter()
            .flat_map(|c| c.pcm.iter().copied())
            .collect();
        wrap_pcm16_mono(&pcm, self.sample_rate)
    }

    /// One standalone WAV per chunk.
    pub fn parts(&self) -> StoryreelResult<Vec<Vec<u8>>> {
        self.chunks
            .iter()
            .map(|c| wrap_pcm16_mono(&c.pcm, self.sample_rate))
            .collect()
    }

    /// Write `<voice>_part_<n>.wav` for every chunk and `<voice>_full.wav`.
    pub fn write_to_dir(&self, dir: &Path) -> StoryreelResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.chunks.len() + 1);
        for (i, part) in self.parts()?.iter().enumerate() {
            let path = dir.join(format!("{}_part_{}.wav", self.voice, i + 1));
            write_atomic(&path, part)?;
            written.push(path);
        }
        let full = dir.join(format!("{}_full.wav", self.voice));
        write_atomic(&full, &self.wav()?)?;
        written.push(full);
        Ok(written)
    }
}

/// Chunk `text` and synthesize every chunk in order.
///
/// The first failing chunk aborts the whole track; an empty PCM response counts as a failure.
#[tracing::instrument(skip_all, fields(voice = %cfg.voice))]
pub fn synthesize_track<S: SpeechSynthesizer + ?Sized>(
    synth: &mut S,
    text: &str,
    cfg: &SpeechConfig,
) -> StoryreelResult<SpeechTrack> {
    cfg.validate()?;
    let chunks = split_into_chunks(text, cfg.chunk_words, cfg.chunk_tolerance);
    if chunks.is_empty() {
        return Err(StoryreelError::validation("no text to synthesize"));
    }
    tracing::info!(
        chunks = chunks.len(),
        target = cfg.chunk_words,
        tolerance = cfg.chunk_tolerance,
        "synthesizing narration"
    );

    let total = chunks.len();
    let mut out = Vec::with_capacity(total);
    for (i, text) in chunks.into_iter().enumerate() {
        tracing::debug!(chunk = i + 1, total, words = word_count(&text), "chunk");
        let pcm = synth.synthesize(&text, &cfg.voice)?;
        if pcm.is_empty() {
            return Err(StoryreelError::generation(GenerationFailure::EmptyResponse));
        }
        out.push(SpeechChunk { text, pcm });
    }

    Ok(SpeechTrack {
        voice: cfg.voice.clone(),
        sample_rate: cfg.sample_rate,
        chunks: out,
    })
}

#[cfg(test)]
#[path = "../tests/unit/speech/chunk.rs"]
mod tests;
