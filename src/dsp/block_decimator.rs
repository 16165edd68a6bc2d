//! Block Decimator
//!
//! Picks every `factor`-th sample out of a continuous stream and gathers
//! them into fixed-size blocks. No anti-alias filtering: the blocks feed the
//! spectrum display, not a demodulator.

use crate::types::{Buffer, Complex16};

/// Gathers decimated samples into blocks of `N`
pub struct BlockDecimator<const N: usize> {
    block: [Complex16; N],
    factor: usize,
    /// Index into the next input buffer of the next sample to take
    src_index: usize,
    /// Fill level of `block`
    dst_index: usize,
}

impl<const N: usize> BlockDecimator<N> {
    /// Create a decimator keeping one sample out of `factor`
    #[must_use]
    pub const fn new(factor: usize) -> Self {
        Self {
            block: [Complex16::new(0, 0); N],
            factor: if factor == 0 { 1 } else { factor },
            src_index: 0,
            dst_index: 0,
        }
    }

    /// Feed a buffer; `on_block` runs once per completed block
    ///
    /// The block's sampling rate is the input rate divided by the factor.
    /// Sample spacing is kept across buffer boundaries.
    pub fn feed<F>(&mut self, src: Buffer<'_, Complex16>, mut on_block: F)
    where
        F: FnMut(Buffer<'_, Complex16>),
    {
        let output_rate = src.sampling_rate / self.factor as u32;

        while self.src_index < src.len() {
            self.block[self.dst_index] = src.samples[self.src_index];
            self.dst_index += 1;

            if self.dst_index == N {
                on_block(Buffer::new(&self.block, output_rate));
                self.dst_index = 0;
            }

            self.src_index += self.factor;
        }

        self.src_index -= src.len();
    }

    /// Decimation factor
    #[must_use]
    pub const fn factor(&self) -> usize {
        self.factor
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn blocks_span_buffer_boundaries() {
        let mut decimator = BlockDecimator::<8>::new(4);
        let data: Vec<Complex16> = (0..20).map(|i| Complex16::new(i, 0)).collect();
        let mut blocks = Vec::new();

        decimator.feed(Buffer::new(&data, 4000), |b| blocks.push(b.samples.to_vec()));
        assert!(blocks.is_empty());

        // Second buffer continues the stride where the first left off
        decimator.feed(Buffer::new(&data, 4000), |b| {
            assert_eq!(b.sampling_rate, 1000);
            blocks.push(b.samples.to_vec());
        });
        assert_eq!(blocks.len(), 1);
        let re: Vec<i16> = blocks[0].iter().map(|s| s.re).collect();
        assert_eq!(re, vec![0, 4, 8, 12, 16, 0, 4, 8]);
    }
}
