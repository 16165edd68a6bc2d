//! Digital Filters
//!
//! FIR tap design for the decimating channel filters and the biquad used
//! to strip sub-audible content from demodulated audio.

use fixed::types::I1F15;
#[cfg(feature = "embedded")]
use micromath::F32Ext;

use super::saturate::saturate_i16;

/// Quantize a coefficient to Q1.15 bits
#[must_use]
pub fn to_q15(value: f32) -> i16 {
    I1F15::saturating_from_num(value).to_bits()
}

/// Low-pass FIR taps in Q1.15 with the edges they were designed for
///
/// Edges are normalized to the sampling rate of the stage input. The
/// pass/stop pair is what the channel spectrum reports as the filter edges.
#[derive(Clone, Debug)]
pub struct FirTaps<const N: usize> {
    taps: [i16; N],
    pass_frequency_normalized: f32,
    stop_frequency_normalized: f32,
}

impl<const N: usize> FirTaps<N> {
    /// Design a Hamming-windowed sinc low-pass
    ///
    /// The cutoff sits midway between the pass and stop edges. Taps are
    /// normalized to unity DC gain before quantization.
    #[must_use]
    pub fn lowpass(pass_normalized: f32, stop_normalized: f32) -> Self {
        let mut coeffs = [0.0f32; N];
        let m = N.saturating_sub(1).max(1) as f32;
        let fc = (0.5 * (pass_normalized + stop_normalized)).clamp(0.0, 0.5);

        for (i, c) in coeffs.iter_mut().enumerate() {
            let n = i as f32 - m / 2.0;
            *c = if n.abs() < 0.0001 {
                2.0 * fc
            } else {
                (2.0 * core::f32::consts::PI * fc * n).sin() / (core::f32::consts::PI * n)
            };

            let window = 0.54 - 0.46 * (2.0 * core::f32::consts::PI * i as f32 / m).cos();
            *c *= window;
        }

        let sum: f32 = coeffs.iter().sum();
        if sum.abs() > 0.0001 {
            for c in &mut coeffs {
                *c /= sum;
            }
        }

        let mut taps = [0i16; N];
        for (tap, &c) in taps.iter_mut().zip(coeffs.iter()) {
            *tap = to_q15(c);
        }

        Self {
            taps,
            pass_frequency_normalized: pass_normalized,
            stop_frequency_normalized: stop_normalized,
        }
    }

    /// Tap values
    #[must_use]
    pub fn as_slice(&self) -> &[i16] {
        &self.taps
    }

    /// Pass-band edge, normalized to the input rate
    #[must_use]
    pub fn pass_frequency_normalized(&self) -> f32 {
        self.pass_frequency_normalized
    }

    /// Stop-band edge, normalized to the input rate
    #[must_use]
    pub fn stop_frequency_normalized(&self) -> f32 {
        self.stop_frequency_normalized
    }
}

/// Biquad (second-order IIR) filter coefficients
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiquadCoeffs {
    /// Numerator coefficients (b0, b1, b2)
    b: [f32; 3],
    /// Denominator coefficients (a1, a2) - a0 is always 1
    a: [f32; 2],
}

impl BiquadCoeffs {
    /// Create from normalized coefficients (a0 = 1)
    #[must_use]
    pub const fn new(b: [f32; 3], a: [f32; 2]) -> Self {
        Self { b, a }
    }
}

/// Audio high-pass: 2nd order Butterworth, 300 Hz corner at 48 kHz
pub const AUDIO_HPF: BiquadCoeffs =
    BiquadCoeffs::new([0.933_460_3, -1.866_877_2, 0.933_460_3], [-1.977_302_6, 0.977_736_7]);

/// Biquad filter over 16-bit samples
///
/// Direct Form II Transposed in f32; output is saturated back to i16.
#[derive(Clone, Copy, Debug)]
pub struct IirBiquad {
    coeffs: BiquadCoeffs,
    z: [f32; 2],
}

impl IirBiquad {
    /// Create a new filter with cleared state
    #[must_use]
    pub const fn new(coeffs: BiquadCoeffs) -> Self {
        Self { coeffs, z: [0.0; 2] }
    }

    /// Process a single sample
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b[0] * input + self.z[0];
        self.z[0] = c.b[1] * input - c.a[0] * output + self.z[1];
        self.z[1] = c.b[2] * input - c.a[1] * output;
        output
    }

    /// Filter a block of samples in place
    pub fn execute(&mut self, samples: &mut [i16]) {
        for sample in samples.iter_mut() {
            let y = self.process(f32::from(*sample));
            *sample = saturate_i16(y as i32);
        }
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.z = [0.0; 2];
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn lowpass_taps_are_symmetric_with_unity_dc_gain() {
        let taps = FirTaps::<64>::lowpass(0.031, 0.070);
        let t = taps.as_slice();
        for i in 0..32 {
            assert!((i32::from(t[i]) - i32::from(t[63 - i])).abs() <= 1);
        }
        let sum: i32 = t.iter().map(|&x| i32::from(x)).sum();
        assert!((sum - 32768).abs() < 100, "dc gain {sum}");
        assert!((taps.pass_frequency_normalized() - 0.031).abs() < 1e-6);
        assert!((taps.stop_frequency_normalized() - 0.070).abs() < 1e-6);
    }

    #[test]
    fn hpf_blocks_dc() {
        let mut hpf = IirBiquad::new(AUDIO_HPF);
        let mut block = [10_000i16; 4800];
        hpf.execute(&mut block);
        assert!(block[4799].abs() < 50, "residual {}", block[4799]);
    }

    #[test]
    fn hpf_passes_1khz() {
        let mut hpf = IirBiquad::new(AUDIO_HPF);
        let mut block: Vec<i16> = (0..4800)
            .map(|n| (10_000.0 * (2.0 * std::f32::consts::PI * 1000.0 * n as f32 / 48_000.0).sin()) as i16)
            .collect();
        hpf.execute(&mut block);
        let peak = block[2400..].iter().map(|s| s.abs()).max().unwrap_or(0);
        assert!(peak > 9_000 && peak < 11_000, "peak {peak}");
    }
}
