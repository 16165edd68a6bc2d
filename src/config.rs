//! System configuration and processing constants
//!
//! This module defines compile-time constants for the baseband core.
//! Buffer sizes, internal sampling rates, statistics windows and queue depths
//! are centralized here. Runtime configuration only arrives through inbound
//! messages (see [`crate::protocol`]).

/// Raw complex samples delivered per baseband DMA transfer
pub const RAW_BUFFER_SAMPLES: usize = 2048;

/// Complex 16-bit scratch area owned by the channel decimator
///
/// The first stage halves the raw buffer, so this holds one full transfer.
pub const DECIMATOR_SCRATCH_SAMPLES: usize = RAW_BUFFER_SAMPLES / 2;

/// Default baseband sampling rate (3.072 MHz)
pub const DEFAULT_SAMPLING_RATE: u32 = 3_072_000;

/// RSSI samples delivered per RF power DMA transfer
pub const RSSI_BUFFER_SAMPLES: usize = 400;

/// RSSI ADC sampling rate (400 kHz)
pub const RSSI_SAMPLING_RATE: u32 = 400_000;

/// Audio output sampling rate (48 kHz)
pub const AUDIO_SAMPLING_RATE: u32 = 48_000;

/// Largest audio block any pipeline produces per call
pub const AUDIO_BUFFER_SAMPLES: usize = 64;

/// Internal sampling rate of the FSK symbol path (76.8 kHz)
pub const FSK_SAMPLING_RATE: u32 = 76_800;

/// Maximum FSK payload length in bits
pub const FSK_MAX_PACKET_BITS: usize = 256;

/// Maximum access code length in bits
pub const ACCESS_CODE_MAX_BITS: usize = 64;

/// Number of taps in every channel / audio FIR decimator
pub const FIR_TAPS: usize = 64;

/// Channel spectrum snapshot length (complex samples / display bins)
pub const CHANNEL_SPECTRUM_SIZE: usize = 256;

/// Channel samples skipped between spectrum snapshot samples
pub const CHANNEL_SPECTRUM_DECIMATION: usize = 4;

/// Display scale applied to spectrum dB values before offsetting
pub const SPECTRUM_MAGNITUDE_SCALE: f32 = 5.0;

/// Baseband load report interval in milliseconds
pub const BASEBAND_STATS_INTERVAL_MS: u32 = 1_000;

/// RSSI statistics interval in milliseconds
pub const RSSI_STATS_INTERVAL_MS: u32 = 100;

/// Channel power statistics interval in milliseconds
pub const CHANNEL_STATS_INTERVAL_MS: u32 = 100;

/// Audio power statistics interval in milliseconds
pub const AUDIO_STATS_INTERVAL_MS: u32 = 100;

/// Floor reported by the dB conversion for zero power
pub const DB_FLOOR: f32 = -120.0;

/// Outbound (baseband → application) queue depth, power of two
pub const APPLICATION_QUEUE_DEPTH: usize = 8;

/// Inbound (application → baseband) queue depth, power of two
pub const BASEBAND_QUEUE_DEPTH: usize = 4;

/// Pending FSK configurations the sample thread has not yet applied
pub const FSK_CONFIGURATION_LANE_DEPTH: usize = 2;

/// Number of samples in a statistics window: `⌈interval · rate⌉`, at least 1
#[must_use]
pub const fn window_samples(sampling_rate: u32, interval_ms: u32) -> usize {
    let samples = (sampling_rate as u64 * interval_ms as u64).div_ceil(1_000);
    if samples == 0 {
        1
    } else {
        samples as usize
    }
}
