//! Saturating arithmetic with a sticky overflow flag
//!
//! Every filter stage narrows its accumulator through [`saturate_i16`].
//! A clip latches a process-wide flag, the software counterpart of the
//! Cortex-M `Q` bit, which the load statistics report and then clear.

use core::sync::atomic::{AtomicBool, Ordering};

static SATURATION: AtomicBool = AtomicBool::new(false);

/// Narrow to i16, clamping and latching the saturation flag on overflow
#[inline]
#[must_use]
pub fn saturate_i16(value: i32) -> i16 {
    if value > i32::from(i16::MAX) {
        latch();
        i16::MAX
    } else if value < i32::from(i16::MIN) {
        latch();
        i16::MIN
    } else {
        value as i16
    }
}

/// Narrow an i64 accumulator to i16 with the same policy
#[inline]
#[must_use]
pub fn saturate_i16_wide(value: i64) -> i16 {
    saturate_i16(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// Latch the saturation flag
#[inline]
pub fn latch() {
    SATURATION.store(true, Ordering::Relaxed);
}

/// Read and clear the saturation flag
pub fn take() -> bool {
    SATURATION.swap(false, Ordering::Relaxed)
}

/// Read the saturation flag without clearing it
#[must_use]
pub fn is_latched() -> bool {
    SATURATION.load(Ordering::Relaxed)
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn in_range_passes_through() {
        assert_eq!(saturate_i16(1234), 1234);
        assert_eq!(saturate_i16(-32768), -32768);
        assert_eq!(saturate_i16(32767), 32767);
    }

    #[test]
    fn out_of_range_clamps_and_latches() {
        assert_eq!(saturate_i16(40_000), i16::MAX);
        assert!(is_latched());
        assert_eq!(saturate_i16_wide(-1 << 40), i16::MIN);
        assert!(take());
    }
}
