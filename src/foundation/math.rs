/// FNV-1a 64-bit hasher used for stable, platform-independent fingerprints.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
        // Separator keeps ("ab", "c") distinct from ("a", "bc").
        self.write_bytes(&[0xff]);
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Round a duration in seconds to microsecond precision.
///
/// Keeps the lowered text free of binary-float noise like `7.000000000000001`.
pub(crate) fn round_micros(secs: f64) -> f64 {
    (secs * 1_000_000.0).round() / 1_000_000.0
}
