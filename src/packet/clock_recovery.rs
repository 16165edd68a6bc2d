//! Symbol Clock Recovery
//!
//! A phase accumulator advances by `symbol_rate / sampling_rate · 2³²` per
//! input sample. The symbol decision is taken when the phase wraps at 2³²
//! and a mid-symbol sample when it crosses half scale. A Gardner detector on
//! those three samples nudges the phase toward the symbol centre by a fixed
//! fraction of a symbol, in either direction.

/// Phase accumulator clock recovery over sliced samples
#[derive(Clone, Copy, Debug, Default)]
pub struct ClockRecovery {
    /// Position within the symbol in units of 2⁻³²; dips below zero after
    /// a retarding nudge
    phase: i64,
    phase_increment: u32,
    /// Current symbol sample
    t0: i32,
    /// Mid-symbol sample
    t1: i32,
    /// Previous symbol sample
    t2: i32,
}

impl ClockRecovery {
    /// Correction per unit of timing error: 1/64 symbol
    const LOOP_GAIN: i64 = 1 << 26;

    /// One full symbol
    const FULL: i64 = 1 << 32;

    /// Half-scale phase: the mid-symbol point
    const HALF: i64 = 1 << 31;

    /// Unconfigured clock recovery; emits nothing
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: 0,
            phase_increment: 0,
            t0: 0,
            t1: 0,
            t2: 0,
        }
    }

    /// Derive the phase increment and reset phase and history
    ///
    /// A zero sampling rate leaves the recovery unconfigured.
    pub fn configure(&mut self, symbol_rate: u32, sampling_rate: u32) {
        self.phase_increment = if sampling_rate == 0 {
            0
        } else {
            let increment = (u64::from(symbol_rate) << 32) / u64::from(sampling_rate);
            u32::try_from(increment).unwrap_or(u32::MAX)
        };
        self.phase = 0;
        self.t0 = 0;
        self.t1 = 0;
        self.t2 = 0;
    }

    /// Phase advance per input sample
    #[must_use]
    pub const fn phase_increment(&self) -> u32 {
        self.phase_increment
    }

    /// Consume one sliced sample; `on_symbol` runs at each symbol decision
    pub fn execute<F>(&mut self, bit: bool, mut on_symbol: F)
    where
        F: FnMut(bool),
    {
        if self.phase_increment == 0 {
            return;
        }

        let value = if bit { 1 } else { -1 };
        let previous = self.phase;
        self.phase += i64::from(self.phase_increment);

        if previous < Self::HALF && self.phase >= Self::HALF {
            self.t1 = value;
        }

        if self.phase >= Self::FULL {
            self.phase -= Self::FULL;
            self.t2 = self.t0;
            self.t0 = value;

            // Positive when sampling late: move the next decision earlier.
            // Advancing stops short of the mid-symbol point.
            let error = (self.t0 - self.t2) * self.t1;
            let nudge = Self::LOOP_GAIN * i64::from(error);
            self.phase = if error > 0 {
                (self.phase + nudge).min(Self::HALF - 1)
            } else {
                self.phase + nudge
            };

            on_symbol(bit);
        }
    }
}
