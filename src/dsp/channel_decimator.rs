//! Channel Decimator
//!
//! Raw 8-bit I/Q at the full input rate down to 16-bit complex at
//! rate/4, /8, /16 or /32. The chain is:
//!
//! ```text
//! stage 0: translate by -fs/4, CIC3 ÷2, gain 256   -> fs/2
//! stage 1: CIC3 ÷2, unity                          -> fs/4   (÷4 returns here)
//! stage 2: CIC3 ÷2, unity                          -> fs/8   (÷8)
//! stage 3: CIC3 ÷2, unity                          -> fs/16  (÷16)
//! stage 4: CIC3 ÷2, unity                          -> fs/32  (÷32)
//! ```
//!
//! The output lives in a scratch area owned by the decimator and is only
//! valid until the next call.

use super::decimate::{DecimateBy2Cic3, TranslateByFsOver4AndDecimateBy2Cic3};
use crate::config::DECIMATOR_SCRATCH_SAMPLES;
use crate::types::{Buffer, BufferMut, Complex16, Complex8};

/// Overall decimation factor of the channel decimator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DecimationFactor {
    /// Stages 0 and 1
    By4,
    /// Stages 0 to 2
    By8,
    /// Stages 0 to 3
    By16,
    /// All stages
    #[default]
    By32,
}

impl DecimationFactor {
    /// Numeric factor
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::By4 => 4,
            Self::By8 => 8,
            Self::By16 => 16,
            Self::By32 => 32,
        }
    }
}

/// Cascaded CIC channel decimator
pub struct ChannelDecimator {
    scratch: [Complex16; DECIMATOR_SCRATCH_SAMPLES],
    translate: TranslateByFsOver4AndDecimateBy2Cic3,
    cic_1: DecimateBy2Cic3,
    cic_2: DecimateBy2Cic3,
    cic_3: DecimateBy2Cic3,
    cic_4: DecimateBy2Cic3,
    factor: DecimationFactor,
}

impl ChannelDecimator {
    /// Create a decimator with the given factor
    #[must_use]
    pub const fn new(factor: DecimationFactor) -> Self {
        Self {
            scratch: [Complex16::new(0, 0); DECIMATOR_SCRATCH_SAMPLES],
            translate: TranslateByFsOver4AndDecimateBy2Cic3::new(),
            cic_1: DecimateBy2Cic3::new(),
            cic_2: DecimateBy2Cic3::new(),
            cic_3: DecimateBy2Cic3::new(),
            cic_4: DecimateBy2Cic3::new(),
            factor,
        }
    }

    /// Current decimation factor
    #[must_use]
    pub const fn decimation_factor(&self) -> DecimationFactor {
        self.factor
    }

    /// Select a new factor for the next call; all stage history is cleared
    pub fn set_decimation_factor(&mut self, factor: DecimationFactor) {
        self.factor = factor;
        self.translate.reset();
        self.cic_1.reset();
        self.cic_2.reset();
        self.cic_3.reset();
        self.cic_4.reset();
    }

    /// Decimate one raw buffer
    ///
    /// Inputs longer than twice the scratch area are truncated.
    pub fn execute(&mut self, buffer: Buffer<'_, Complex8>) -> BufferMut<'_, Complex16> {
        let out = self.translate.execute(buffer, &mut self.scratch);
        let out = self.cic_1.execute(out);
        if self.factor == DecimationFactor::By4 {
            return out;
        }

        let out = self.cic_2.execute(out);
        if self.factor == DecimationFactor::By8 {
            return out;
        }

        let out = self.cic_3.execute(out);
        if self.factor == DecimationFactor::By16 {
            return out;
        }

        self.cic_4.execute(out)
    }
}

impl Default for ChannelDecimator {
    fn default() -> Self {
        Self::new(DecimationFactor::default())
    }
}
