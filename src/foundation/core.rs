use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Rational frame rate (`num / den` frames per second).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> StoryreelResult<Self> {
        if den == 0 {
            return Err(StoryreelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(StoryreelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 24, den: 1 }
    }
}

impl fmt::Display for Fps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// Accepts `24` or `30000/1001`.
impl FromStr for Fps {
    type Err = StoryreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| StoryreelError::format(format!("invalid frame rate '{s}'")))
        };
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (parse(n)?, parse(d)?),
            None => (parse(s)?, 1),
        };
        Fps::new(num, den).map_err(|_| StoryreelError::format(format!("invalid frame rate '{s}'")))
    }
}

/// Pixel dimensions of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const FULL_HD: Self = Self {
        width: 1920,
        height: 1080,
    };

    pub fn new(width: u32, height: u32) -> StoryreelResult<Self> {
        if width == 0 || height == 0 {
            return Err(StoryreelError::validation(
                "resolution width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    /// Multiply both dimensions by `factor`; overflow is a validation error.
    pub fn scaled(self, factor: u32) -> StoryreelResult<Self> {
        match (
            self.width.checked_mul(factor),
            self.height.checked_mul(factor),
        ) {
            (Some(width), Some(height)) => Self::new(width, height),
            _ => Err(StoryreelError::validation(format!(
                "resolution {self} scaled by {factor} overflows"
            ))),
        }
    }

    pub fn is_even(self) -> bool {
        self.width.is_multiple_of(2) && self.height.is_multiple_of(2)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::FULL_HD
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WxH`, e.g. `1920x1080`.
impl FromStr for Resolution {
    type Err = StoryreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || StoryreelError::format(format!("invalid resolution '{s}' (expected WxH)"));
        let (w, h) = s.trim().split_once('x').ok_or_else(bad)?;
        let width = w.parse::<u32>().map_err(|_| bad())?;
        let height = h.parse::<u32>().map_err(|_| bad())?;
        Resolution::new(width, height).map_err(|_| bad())
    }
}
