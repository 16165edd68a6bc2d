//! Spectrum Analysis Module
//!
//! Radix-2 FFT over a decimated channel snapshot and conversion of the bins
//! to 8-bit display magnitudes.

#[cfg(feature = "embedded")]
use micromath::F32Ext;

use super::mag_squared_to_dbv_norm;
use crate::config::{CHANNEL_SPECTRUM_SIZE, SPECTRUM_MAGNITUDE_SCALE};
use crate::types::Complex16;

/// Transform length
const N: usize = CHANNEL_SPECTRUM_SIZE;

/// Complex value in the FFT working buffer
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Bin {
    re: f32,
    im: f32,
}

/// Channel-spectrum FFT with precomputed twiddles
pub struct SpectrumAnalyzer {
    /// cos/sin of -2πk/N for k < N/2
    twiddles: [(f32, f32); N / 2],
    work: [Bin; N],
}

impl SpectrumAnalyzer {
    const BITS: u32 = N.trailing_zeros();

    /// Create an analyzer and precompute twiddle factors
    #[must_use]
    pub fn new() -> Self {
        let mut twiddles = [(0.0f32, 0.0f32); N / 2];
        for (k, t) in twiddles.iter_mut().enumerate() {
            let angle = -2.0 * core::f32::consts::PI * k as f32 / N as f32;
            *t = (angle.cos(), angle.sin());
        }

        Self {
            twiddles,
            work: [Bin::default(); N],
        }
    }

    /// Load samples in bit-reversed order
    fn load_swapped(&mut self, samples: &[Complex16]) {
        for (i, bin) in self.work.iter_mut().enumerate() {
            let src = i.reverse_bits() >> (usize::BITS - Self::BITS);
            *bin = samples.get(src).map_or(Bin::default(), |s| Bin {
                re: f32::from(s.re),
                im: f32::from(s.im),
            });
        }
    }

    /// In-place iterative butterflies over pre-swapped data
    fn transform(&mut self) {
        let mut size = 2;
        while size <= N {
            let half = size / 2;
            let stride = N / size;
            for start in (0..N).step_by(size) {
                for k in 0..half {
                    let (wr, wi) = self.twiddles[k * stride];
                    let b = self.work[start + k + half];
                    let tr = b.re * wr - b.im * wi;
                    let ti = b.re * wi + b.im * wr;
                    let a = self.work[start + k];
                    self.work[start + k] = Bin {
                        re: a.re + tr,
                        im: a.im + ti,
                    };
                    self.work[start + k + half] = Bin {
                        re: a.re - tr,
                        im: a.im - ti,
                    };
                }
            }
            size *= 2;
        }
    }

    /// Transform `samples` and write display magnitudes with DC at `N / 2`
    ///
    /// Each bin is `db · 5 + 255` clamped to `0..=255`.
    pub fn magnitudes(&mut self, samples: &[Complex16], out: &mut [u8; N]) {
        self.load_swapped(samples);
        self.transform();

        for (i, bin) in self.work.iter().enumerate() {
            let mag2 = bin.re * bin.re + bin.im * bin.im;
            let db = mag_squared_to_dbv_norm(mag2);
            let v = (db * SPECTRUM_MAGNITUDE_SCALE + 255.0).clamp(0.0, 255.0);
            out[(i + N / 2) % N] = v as u8;
        }
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
