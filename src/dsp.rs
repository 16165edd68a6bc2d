//! Digital Signal Processing
//!
//! Filter primitives and demodulators for the baseband pipelines:
//! - Saturating arithmetic with a sticky overflow flag
//! - CIC and FIR decimate-by-2 stages
//! - Channel decimator (÷4 to ÷32)
//! - Biquad audio high-pass
//! - AM envelope and FM discriminator
//! - Block decimator and FFT for the channel spectrum

#[cfg(feature = "embedded")]
use micromath::F32Ext;

use crate::config::DB_FLOOR;

pub mod saturate;
pub mod decimate;
pub mod filter;
pub mod demodulate;
pub mod channel_decimator;
pub mod block_decimator;
pub mod spectrum;

/// log10 of the largest complex 16-bit squared magnitude, 2·32768²
const LOG10_FULL_SCALE_MAG_SQUARED: f32 = 9.331_929_9;

/// Convert a squared magnitude to dB relative to complex 16-bit full scale
///
/// `10·(log10(mag²) − log10(2·32768²))`. Zero power returns [`DB_FLOOR`].
#[must_use]
pub fn mag_squared_to_dbv_norm(mag_squared: f32) -> f32 {
    if mag_squared <= 0.0 {
        return DB_FLOOR;
    }
    ((mag_squared.log10() - LOG10_FULL_SCALE_MAG_SQUARED) * 10.0).max(DB_FLOOR)
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn full_scale_is_zero_db() {
        let full = 2.0 * 32768.0f32 * 32768.0;
        assert!(mag_squared_to_dbv_norm(full).abs() < 0.01);
    }

    #[test]
    fn half_amplitude_is_minus_6db() {
        let half = 2.0 * 16384.0f32 * 16384.0;
        assert!((mag_squared_to_dbv_norm(half) + 6.02).abs() < 0.05);
    }

    #[test]
    fn zero_power_hits_floor() {
        assert_eq!(mag_squared_to_dbv_norm(0.0), DB_FLOOR);
    }
}
