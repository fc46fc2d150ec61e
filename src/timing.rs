//! Parsing of human-readable shot intervals such as `00:00:07 - 00:00:13.5`.

use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Separator between the two sides of an interval string.
pub const INTERVAL_SEPARATOR: &str = " - ";

/// Half-open time range `[start, end)` in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    /// Length of the range; may be zero or negative for malformed shot lists.
    pub fn duration(self) -> f64 {
        self.end - self.start
    }
}

/// Parse `"<H:M:S> - <H:M:S>"` into a [`TimeRange`].
///
/// The separator must be exactly `" - "`; each side must have exactly three numeric
/// colon-separated fields. Fractional seconds (and fractional hours/minutes) are accepted.
pub fn parse_interval(s: &str) -> StoryreelResult<TimeRange> {
    let parts: Vec<&str> = s.split(INTERVAL_SEPARATOR).collect();
    if parts.len() != 2 {
        return Err(StoryreelError::format(format!(
            "invalid timing '{s}': expected '<start> - <end>'"
        )));
    }
    Ok(TimeRange {
        start: parse_clock(parts[0])?,
        end: parse_clock(parts[1])?,
    })
}

/// Parse one `H:M:S` clock value into seconds.
pub fn parse_clock(s: &str) -> StoryreelResult<f64> {
    let fields: Vec<&str> = s.trim().split(':').collect();
    if fields.len() != 3 {
        return Err(StoryreelError::format(format!(
            "invalid clock '{s}': expected H:M:S"
        )));
    }

    let mut values = [0.0f64; 3];
    for (slot, field) in values.iter_mut().zip(&fields) {
        let v = field
            .trim()
            .parse::<f64>()
            .map_err(|_| StoryreelError::format(format!("invalid clock field '{field}' in '{s}'")))?;
        if !v.is_finite() {
            return Err(StoryreelError::format(format!(
                "clock field '{field}' in '{s}' must be finite"
            )));
        }
        *slot = v;
    }

    let [h, m, sec] = values;
    Ok(h * 3600.0 + m * 60.0 + sec)
}

#[cfg(test)]
#[path = "../tests/unit/timing/parse.rs"]
mod tests;
