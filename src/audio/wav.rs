use std::path::Path;

use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Size of the canonical RIFF/WAVE header written by [`wrap_pcm16_mono`].
pub const WAV_HEADER_LEN: usize = 44;

/// Format facts read from a WAV header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Length of the `data` chunk in bytes.
    pub data_len: u32,
}

impl WavInfo {
    pub fn byte_rate(self) -> u64 {
        u64::from(self.sample_rate) * u64::from(self.channels) * u64::from(self.bits_per_sample / 8)
    }

    pub fn duration_secs(self) -> f64 {
        match self.byte_rate() {
            0 => 0.0,
            rate => f64::from(self.data_len) / rate as f64,
        }
    }
}

/// Wrap raw little-endian 16-bit mono PCM in a 44-byte RIFF/WAVE header.
pub fn wrap_pcm16_mono(pcm: &[u8], sample_rate: u32) -> StoryreelResult<Vec<u8>> {
    const CHANNELS: u16 = 1;
    const BITS: u16 = 16;
    let data_len = u32::try_from(pcm.len())
        .ok()
        .filter(|len| *len <= u32::MAX - 36)
        .ok_or_else(|| StoryreelError::validation("pcm payload too large for a wav file"))?;
    let block_align = CHANNELS * (BITS / 8);
    let byte_rate = sample_rate
        .checked_mul(u32::from(block_align))
        .ok_or_else(|| {
            StoryreelError::validation(format!("sample rate {sample_rate} is too high for a wav file"))
        })?;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(pcm);
    Ok(out)
}

fn u16_at(b: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_le_bytes(b.get(at..at + 2)?.try_into().ok()?))
}

fn u32_at(b: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_le_bytes(b.get(at..at + 4)?.try_into().ok()?))
}

/// Walk the RIFF chunks and return the `fmt ` facts plus the `data` length.
pub fn parse_wav_header(bytes: &[u8]) -> StoryreelResult<WavInfo> {
    let bad = |why: &str| StoryreelError::format(format!("not a wav file: {why}"));
    if bytes.get(0..4) != Some(&b"RIFF"[..]) || bytes.get(8..12) != Some(&b"WAVE"[..]) {
        return Err(bad("missing RIFF/WAVE magic"));
    }

    let mut fmt: Option<(u16, u32, u16)> = None;
    let mut at = 12;
    while let (Some(id), Some(len)) = (bytes.get(at..at + 4), u32_at(bytes, at + 4)) {
        let body = at + 8;
        match id {
            b"fmt " => {
                let channels = u16_at(bytes, body + 2).ok_or_else(|| bad("short fmt chunk"))?;
                let rate = u32_at(bytes, body + 4).ok_or_else(|| bad("short fmt chunk"))?;
                let bits = u16_at(bytes, body + 14).ok_or_else(|| bad("short fmt chunk"))?;
                fmt = Some((channels, rate, bits));
            }
            b"data" => {
                let (channels, sample_rate, bits_per_sample) =
                    fmt.ok_or_else(|| bad("data chunk before fmt chunk"))?;
                let info = WavInfo {
                    channels,
                    sample_rate,
                    bits_per_sample,
                    data_len: len,
                };
                // The header stores the byte rate as a u32.
                if info.byte_rate() > u64::from(u32::MAX) {
                    return Err(bad("byte rate overflows the fmt chunk"));
                }
                return Ok(info);
            }
            _ => {}
        }
        // Chunks are padded to even length.
        at = body + len as usize + (len as usize & 1);
    }
    Err(bad("no data chunk"))
}

/// Playback length of an in-memory WAV file.
pub fn duration_secs(bytes: &[u8]) -> StoryreelResult<f64> {
    Ok(parse_wav_header(bytes)?.duration_secs())
}

pub fn read_wav_info(path: &Path) -> StoryreelResult<WavInfo> {
    let bytes = std::fs::read(path).map_err(|e| {
        StoryreelError::missing(format!("cannot read audio '{}': {e}", path.display()))
    })?;
    parse_wav_header(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/wav.rs"]
mod tests;
