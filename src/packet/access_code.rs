//! Access Code Correlator
//!
//! Matches the most recent `length` symbols against a known bit pattern,
//! tolerating up to `tolerance` bit errors.

use crate::config::ACCESS_CODE_MAX_BITS;

/// Sliding Hamming-distance matcher over the symbol stream
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessCodeCorrelator {
    code: u64,
    mask: u64,
    length: u8,
    tolerance: u8,
    history: u64,
    bits_seen: u8,
}

impl AccessCodeCorrelator {
    /// Unconfigured correlator; never matches
    #[must_use]
    pub const fn new() -> Self {
        Self {
            code: 0,
            mask: 0,
            length: 0,
            tolerance: 0,
            history: 0,
            bits_seen: 0,
        }
    }

    /// Set the code and clear history
    ///
    /// `length` is clamped to 64 bits and `tolerance` to `length`.
    pub fn configure(&mut self, code: u64, length: u8, tolerance: u8) {
        let length = length.min(ACCESS_CODE_MAX_BITS as u8);
        self.mask = match length {
            0 => 0,
            64 => u64::MAX,
            n => (1u64 << n) - 1,
        };
        self.code = code & self.mask;
        self.length = length;
        self.tolerance = tolerance.min(length);
        self.reset();
    }

    /// Forget all received symbols
    pub fn reset(&mut self) {
        self.history = 0;
        self.bits_seen = 0;
    }

    /// Configured code length in bits
    #[must_use]
    pub const fn length(&self) -> u8 {
        self.length
    }

    /// Configured tolerance in bits
    #[must_use]
    pub const fn tolerance(&self) -> u8 {
        self.tolerance
    }

    /// Shift in one symbol; true when the window matches the code
    pub fn execute(&mut self, bit: bool) -> bool {
        self.history = (self.history << 1) | u64::from(bit);
        self.bits_seen = self.bits_seen.saturating_add(1);

        if self.length == 0 || self.bits_seen < self.length {
            return false;
        }

        let distance = ((self.history ^ self.code) & self.mask).count_ones();
        distance <= u32::from(self.tolerance)
    }
}
