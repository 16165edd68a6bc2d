//! Decimating Filters
//!
//! Multiplier-free CIC stages for coarse rate reduction and FIR stages for
//! channel selectivity. Every stage halves the sample rate and works in
//! place: output sample `i` is written only after input samples `2i` and
//! `2i + 1` have been consumed, so the same buffer can feed the next stage.
//!
//! Filter history is carried across calls so block boundaries are seamless.

use super::filter::FirTaps;
use super::saturate::{saturate_i16, saturate_i16_wide};
use crate::types::{Buffer, BufferMut, Complex16, Complex8};

/// Accumulator-width complex value used inside the CIC stages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Acc {
    re: i32,
    im: i32,
}

impl Acc {
    const fn from_c16(s: Complex16) -> Self {
        Self {
            re: s.re as i32,
            im: s.im as i32,
        }
    }
}

/// Shift by −fs/4 and decimate by 2 with a 3rd-order CIC
///
/// 8-bit complex in, 16-bit complex out:
///
/// ```text
/// complex<i8>[N] @ fs, [-128, 127]
///  -> multiply by (-j)^n              (shift by -fs/4)
///  -> 3rd order CIC: -0.1dB @ 0.028fs, -1dB @ 0.088fs, -60dB @ 0.468fs
///  -> gain of 256 (8 from the CIC, 32 from the output shift)
///  -> decimation by 2
///  -> complex<i16>[N/2] @ fs/2, [-32768, 32512]
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TranslateByFsOver4AndDecimateBy2Cic3 {
    /// x[n-2], x[n-3] after translation
    history: [Acc; 2],
    /// Rotation index, n mod 4
    phase: u8,
}

impl TranslateByFsOver4AndDecimateBy2Cic3 {
    /// Output shift that brings the CIC gain of 8 up to 256
    const OUTPUT_SHIFT: u32 = 5;

    /// Create a new stage with cleared history
    #[must_use]
    pub const fn new() -> Self {
        Self {
            history: [Acc { re: 0, im: 0 }; 2],
            phase: 0,
        }
    }

    /// Rotate the next input sample by (-j)^n
    fn rotate(&mut self, s: Complex8) -> Acc {
        let re = i32::from(s.re);
        let im = i32::from(s.im);
        let out = match self.phase {
            0 => Acc { re, im },
            1 => Acc { re: im, im: -re },
            2 => Acc { re: -re, im: -im },
            _ => Acc { re: -im, im: re },
        };
        self.phase = (self.phase + 1) & 3;
        out
    }

    /// Translate and decimate `src` into `dst`
    ///
    /// Produces `min(src.len() / 2, dst.len())` samples at half the input rate.
    pub fn execute<'a>(
        &mut self,
        src: Buffer<'_, Complex8>,
        dst: &'a mut [Complex16],
    ) -> BufferMut<'a, Complex16> {
        let count = (src.len() / 2).min(dst.len());

        for (i, out) in dst.iter_mut().take(count).enumerate() {
            let a = self.rotate(src.samples[2 * i]);
            let b = self.rotate(src.samples[2 * i + 1]);
            let [h0, h1] = self.history;

            let re = b.re + 3 * a.re + 3 * h0.re + h1.re;
            let im = b.im + 3 * a.im + 3 * h0.im + h1.im;
            self.history = [b, a];

            *out = Complex16::new(
                saturate_i16(re << Self::OUTPUT_SHIFT),
                saturate_i16(im << Self::OUTPUT_SHIFT),
            );
        }

        BufferMut::new(dst, src.sampling_rate / 2).shrink(count, src.sampling_rate / 2)
    }

    /// Clear history and rotation phase
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Complex 3rd-order CIC decimate-by-2, unity gain
///
/// Taps (1, 3, 3, 1) / 8: -0.1dB @ 0.028fs, -1dB @ 0.088fs, -60dB @ 0.468fs.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecimateBy2Cic3 {
    /// x[n-2], x[n-3]
    history: [Acc; 2],
}

impl DecimateBy2Cic3 {
    /// Create a new stage with cleared history
    #[must_use]
    pub const fn new() -> Self {
        Self {
            history: [Acc { re: 0, im: 0 }; 2],
        }
    }

    /// Decimate in place; the returned view is half as long
    pub fn execute<'a>(&mut self, buffer: BufferMut<'a, Complex16>) -> BufferMut<'a, Complex16> {
        let count = buffer.len() / 2;

        for i in 0..count {
            let a = Acc::from_c16(buffer.samples[2 * i]);
            let b = Acc::from_c16(buffer.samples[2 * i + 1]);
            let [h0, h1] = self.history;

            let re = (b.re + 3 * a.re + 3 * h0.re + h1.re + 4) >> 3;
            let im = (b.im + 3 * a.im + 3 * h0.im + h1.im + 4) >> 3;
            self.history = [b, a];

            buffer.samples[i] = Complex16::new(saturate_i16(re), saturate_i16(im));
        }

        let rate = buffer.sampling_rate / 2;
        buffer.shrink(count, rate)
    }

    /// Clear history
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Real 4th-order CIC decimate-by-2, unity gain
///
/// Taps (1, 4, 6, 4, 1) / 16.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecimateBy2Cic4Real {
    /// x[n-2], x[n-3], x[n-4]
    history: [i32; 3],
}

impl DecimateBy2Cic4Real {
    /// Create a new stage with cleared history
    #[must_use]
    pub const fn new() -> Self {
        Self { history: [0; 3] }
    }

    /// Decimate in place; the returned view is half as long
    pub fn execute<'a>(&mut self, buffer: BufferMut<'a, i16>) -> BufferMut<'a, i16> {
        let count = buffer.len() / 2;

        for i in 0..count {
            let a = i32::from(buffer.samples[2 * i]);
            let b = i32::from(buffer.samples[2 * i + 1]);
            let [h0, h1, h2] = self.history;

            let y = (b + 4 * a + 6 * h0 + 4 * h1 + h2 + 8) >> 4;
            self.history = [b, a, h0];

            buffer.samples[i] = saturate_i16(y);
        }

        let rate = buffer.sampling_rate / 2;
        buffer.shrink(count, rate)
    }

    /// Clear history
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Complex FIR low-pass followed by decimation by 2
pub struct FirAndDecimateBy2Complex<const N: usize> {
    taps: FirTaps<N>,
    /// Delay line (circular buffer)
    delay: [Complex16; N],
    /// Next write position in delay line
    pos: usize,
}

impl<const N: usize> FirAndDecimateBy2Complex<N> {
    /// Create a new filter with the given taps
    #[must_use]
    pub fn new(taps: FirTaps<N>) -> Self {
        Self {
            taps,
            delay: [Complex16::default(); N],
            pos: 0,
        }
    }

    /// Filter taps with their design edges
    #[must_use]
    pub fn taps(&self) -> &FirTaps<N> {
        &self.taps
    }

    fn push(&mut self, sample: Complex16) {
        self.delay[self.pos] = sample;
        self.pos = (self.pos + 1) % N;
    }

    fn convolve(&self) -> Complex16 {
        let mut re: i64 = 0;
        let mut im: i64 = 0;
        let mut idx = self.pos;

        for &tap in self.taps.as_slice() {
            idx = if idx == 0 { N - 1 } else { idx - 1 };
            let s = self.delay[idx];
            re += i64::from(tap) * i64::from(s.re);
            im += i64::from(tap) * i64::from(s.im);
        }

        Complex16::new(
            saturate_i16_wide((re + (1 << 14)) >> 15),
            saturate_i16_wide((im + (1 << 14)) >> 15),
        )
    }

    /// Filter and decimate in place; the returned view is half as long
    pub fn execute<'a>(&mut self, buffer: BufferMut<'a, Complex16>) -> BufferMut<'a, Complex16> {
        let count = buffer.len() / 2;

        for i in 0..count {
            self.push(buffer.samples[2 * i]);
            self.push(buffer.samples[2 * i + 1]);
            buffer.samples[i] = self.convolve();
        }

        let rate = buffer.sampling_rate / 2;
        buffer.shrink(count, rate)
    }

    /// Clear delay line
    pub fn reset(&mut self) {
        self.delay = [Complex16::default(); N];
        self.pos = 0;
    }
}

/// Real FIR low-pass followed by decimation by 2
pub struct FirAndDecimateBy2Real<const N: usize> {
    taps: FirTaps<N>,
    delay: [i16; N],
    pos: usize,
}

impl<const N: usize> FirAndDecimateBy2Real<N> {
    /// Create a new filter with the given taps
    #[must_use]
    pub fn new(taps: FirTaps<N>) -> Self {
        Self {
            taps,
            delay: [0; N],
            pos: 0,
        }
    }

    /// Filter taps with their design edges
    #[must_use]
    pub fn taps(&self) -> &FirTaps<N> {
        &self.taps
    }

    fn push(&mut self, sample: i16) {
        self.delay[self.pos] = sample;
        self.pos = (self.pos + 1) % N;
    }

    fn convolve(&self) -> i16 {
        let mut acc: i64 = 0;
        let mut idx = self.pos;

        for &tap in self.taps.as_slice() {
            idx = if idx == 0 { N - 1 } else { idx - 1 };
            acc += i64::from(tap) * i64::from(self.delay[idx]);
        }

        saturate_i16_wide((acc + (1 << 14)) >> 15)
    }

    /// Filter and decimate in place; the returned view is half as long
    pub fn execute<'a>(&mut self, buffer: BufferMut<'a, i16>) -> BufferMut<'a, i16> {
        let count = buffer.len() / 2;

        for i in 0..count {
            self.push(buffer.samples[2 * i]);
            self.push(buffer.samples[2 * i + 1]);
            buffer.samples[i] = self.convolve();
        }

        let rate = buffer.sampling_rate / 2;
        buffer.shrink(count, rate)
    }

    /// Clear delay line
    pub fn reset(&mut self) {
        self.delay = [0; N];
        self.pos = 0;
    }
}
