//! Demodulation
//!
//! Complex baseband to real audio. AM uses envelope detection; FM uses the
//! arctangent of the conjugate product of consecutive samples.

#[cfg(feature = "embedded")]
use micromath::F32Ext;

use super::saturate::saturate_i16;
use crate::types::{Buffer, BufferMut, Complex16};

/// AM demodulator using envelope detection
#[derive(Clone, Copy, Debug, Default)]
pub struct AmDemodulator;

impl AmDemodulator {
    /// Envelope scale; leaves headroom for the corner of the I/Q square
    const OUTPUT_SCALE: f32 = 0.5;

    /// Create a new AM demodulator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Demodulate `src` into `dst`
    ///
    /// Produces `min(src.len(), dst.len())` samples at the input rate.
    pub fn execute<'a>(&mut self, src: Buffer<'_, Complex16>, dst: &'a mut [i16]) -> BufferMut<'a, i16> {
        let count = src.len().min(dst.len());

        for (out, &s) in dst.iter_mut().zip(src.samples.iter()) {
            let envelope = (s.magnitude_squared() as f32).sqrt();
            *out = saturate_i16((envelope * Self::OUTPUT_SCALE) as i32);
        }

        BufferMut::new(dst, src.sampling_rate).shrink(count, src.sampling_rate)
    }
}

/// FM demodulator using arctan differentiation
#[derive(Clone, Copy, Debug)]
pub struct FmDemodulator {
    /// Previous sample for differentiation
    prev: Complex16,
    /// Radians per sample to output units; full deviation maps to full scale
    deviation_scale: f32,
}

impl FmDemodulator {
    /// Create a new FM demodulator
    #[must_use]
    pub fn new(sampling_rate: u32, deviation_hz: u32) -> Self {
        let deviation = deviation_hz.max(1) as f32;
        Self {
            prev: Complex16::default(),
            deviation_scale: 32767.0 * sampling_rate as f32 / (2.0 * core::f32::consts::PI * deviation),
        }
    }

    /// Demodulate `src` into `dst`
    ///
    /// Produces `min(src.len(), dst.len())` samples at the input rate.
    pub fn execute<'a>(&mut self, src: Buffer<'_, Complex16>, dst: &'a mut [i16]) -> BufferMut<'a, i16> {
        let count = src.len().min(dst.len());

        for (out, &s) in dst.iter_mut().zip(src.samples.iter()) {
            let (sr, si) = (f32::from(s.re), f32::from(s.im));
            let (pr, pi) = (f32::from(self.prev.re), f32::from(self.prev.im));
            self.prev = s;

            // s * conj(prev)
            let re = sr * pr + si * pi;
            let im = si * pr - sr * pi;

            let phase_diff = im.atan2(re);
            *out = saturate_i16((phase_diff * self.deviation_scale) as i32);
        }

        BufferMut::new(dst, src.sampling_rate).shrink(count, src.sampling_rate)
    }

    /// Reset demodulator state
    pub fn reset(&mut self) {
        self.prev = Complex16::default();
    }
}
