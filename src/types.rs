//! Shared types used across the baseband core
//!
//! Sample formats, borrowed buffer views and the demodulation mode.
//! Buffers never own their storage: they reference caller-provided memory
//! and are only valid for the duration of one processing call.

use core::fmt;

/// Raw RF sample: 8-bit signed I/Q pair
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct Complex8 {
    /// In-phase component
    pub re: i8,
    /// Quadrature component
    pub im: i8,
}

impl Complex8 {
    /// Create a new raw sample
    #[must_use]
    pub const fn new(re: i8, im: i8) -> Self {
        Self { re, im }
    }
}

/// Baseband sample: 16-bit signed I/Q pair
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct Complex16 {
    /// In-phase component
    pub re: i16,
    /// Quadrature component
    pub im: i16,
}

impl Complex16 {
    /// Create a new baseband sample
    #[must_use]
    pub const fn new(re: i16, im: i16) -> Self {
        Self { re, im }
    }

    /// Squared magnitude, exact in 32 bits
    #[must_use]
    pub const fn magnitude_squared(self) -> u32 {
        let re = self.re as i32;
        let im = self.im as i32;
        (re * re) as u32 + (im * im) as u32
    }
}

/// Interleaved stereo audio frame for the audio sink
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct StereoFrame {
    /// Left channel
    pub left: i16,
    /// Right channel
    pub right: i16,
}

impl StereoFrame {
    /// Same sample on both channels
    #[must_use]
    pub const fn mono(sample: i16) -> Self {
        Self {
            left: sample,
            right: sample,
        }
    }
}

/// Read-only view over samples at a known sampling rate
#[derive(Clone, Copy, Debug)]
pub struct Buffer<'a, T> {
    /// Samples
    pub samples: &'a [T],
    /// Sampling rate in Hz
    pub sampling_rate: u32,
}

impl<'a, T> Buffer<'a, T> {
    /// Create a new buffer view
    #[must_use]
    pub const fn new(samples: &'a [T], sampling_rate: u32) -> Self {
        Self {
            samples,
            sampling_rate,
        }
    }

    /// Number of samples
    #[must_use]
    pub const fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the view is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Mutable view over samples at a known sampling rate
///
/// Filter stages that decimate in place shrink the view and update the rate.
#[derive(Debug)]
pub struct BufferMut<'a, T> {
    /// Samples
    pub samples: &'a mut [T],
    /// Sampling rate in Hz
    pub sampling_rate: u32,
}

impl<'a, T> BufferMut<'a, T> {
    /// Create a new mutable buffer view
    #[must_use]
    pub fn new(samples: &'a mut [T], sampling_rate: u32) -> Self {
        Self {
            samples,
            sampling_rate,
        }
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the view is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrow as a read-only view
    #[must_use]
    pub fn as_buffer(&self) -> Buffer<'_, T> {
        Buffer::new(self.samples, self.sampling_rate)
    }

    /// Keep the first `len` samples and set a new rate
    #[must_use]
    pub fn shrink(self, len: usize, sampling_rate: u32) -> Self {
        let samples = self.samples;
        let len = len.min(samples.len());
        Self {
            samples: samples.split_at_mut(len).0,
            sampling_rate,
        }
    }
}

/// Raw RF buffer handed over by the baseband DMA
pub type RawBuffer<'a> = Buffer<'a, Complex8>;

/// Demodulation mode requested by the control core
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Narrowband AM audio
    Am,
    /// Narrowband FM audio
    NbFm,
    /// Wideband (broadcast) FM audio
    WbFm,
    /// FSK packet decoding
    Fsk,
    /// No active pipeline
    #[default]
    Off,
}

impl Mode {
    /// Decode the wire representation; unknown values select [`Mode::Off`]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Am,
            1 => Self::NbFm,
            2 => Self::WbFm,
            3 => Self::Fsk,
            _ => Self::Off,
        }
    }

    /// Wire representation
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        match self {
            Self::Am => 0,
            Self::NbFm => 1,
            Self::WbFm => 2,
            Self::Fsk => 3,
            Self::Off => u32::MAX,
        }
    }

    /// Whether this mode runs a demodulator pipeline
    #[must_use]
    pub const fn has_pipeline(self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Am => "AM",
            Self::NbFm => "NBFM",
            Self::WbFm => "WBFM",
            Self::Fsk => "FSK",
            Self::Off => "OFF",
        };
        f.write_str(name)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Mode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Am => defmt::write!(f, "AM"),
            Self::NbFm => defmt::write!(f, "NBFM"),
            Self::WbFm => defmt::write!(f, "WBFM"),
            Self::Fsk => defmt::write!(f, "FSK"),
            Self::Off => defmt::write!(f, "OFF"),
        }
    }
}
