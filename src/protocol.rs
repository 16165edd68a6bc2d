//! Inter-core Messages
//!
//! Records exchanged between the baseband core and the control core.
//! Every record travels inside a [`Message`], tagged by [`MessageId`]; the
//! message pool keeps one ownership flag per id so at most one instance of
//! each kind is in flight.

use crate::config::{CHANNEL_SPECTRUM_SIZE, FSK_MAX_PACKET_BITS};
use crate::types::Mode;

/// Message kind, also the index of the kind's pool slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageId {
    /// Outbound baseband load report
    BasebandStatistics = 0,
    /// Outbound RF power summary
    RssiStatistics = 1,
    /// Outbound channel power summary
    ChannelStatistics = 2,
    /// Outbound audio power summary
    AudioStatistics = 3,
    /// Outbound channel spectrum snapshot
    ChannelSpectrum = 4,
    /// Outbound decoded FSK packet
    FskPacket = 5,
    /// Inbound mode / sampling rate change
    BasebandConfiguration = 6,
    /// Inbound FSK decoder parameters
    FskConfiguration = 7,
}

impl MessageId {
    /// Number of message kinds
    pub const COUNT: usize = 8;

    /// Pool / handler table index
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for MessageId {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "MessageId({=u8})", *self as u8);
    }
}

/// Baseband thread load since the previous report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BasebandStatistics {
    /// Ticks spent in the idle thread
    pub idle_ticks: u32,
    /// Ticks spent in the baseband thread
    pub baseband_ticks: u32,
    /// A filter stage clipped since the previous report
    pub saturation: bool,
}

/// RF power summary over one window of raw RSSI samples
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RssiStatistics {
    /// Sum of samples
    pub accumulator: u32,
    /// Smallest sample
    pub min: u32,
    /// Largest sample
    pub max: u32,
    /// Number of samples
    pub count: u32,
}

/// Channel power summary
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelStatistics {
    /// Peak power in dB relative to full scale
    pub max_db: f32,
    /// Number of samples
    pub count: u32,
}

/// Audio power summary
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioStatistics {
    /// RMS power in dB relative to full scale
    pub rms_db: f32,
    /// Peak power in dB relative to full scale
    pub max_db: f32,
    /// Number of samples
    pub count: u32,
}

/// Channel spectrum for display
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelSpectrum {
    /// 8-bit magnitudes, DC in the centre bin
    pub db: [u8; CHANNEL_SPECTRUM_SIZE],
    /// Sampling rate of the transformed snapshot
    pub sampling_rate: u32,
    /// Channel filter pass-band edge in Hz
    pub channel_filter_pass_frequency: u32,
    /// Channel filter stop-band edge in Hz
    pub channel_filter_stop_frequency: u32,
}

impl Default for ChannelSpectrum {
    fn default() -> Self {
        Self {
            db: [0; CHANNEL_SPECTRUM_SIZE],
            sampling_rate: 0,
            channel_filter_pass_frequency: 0,
            channel_filter_stop_frequency: 0,
        }
    }
}

/// Bytes needed to hold a maximum-length packet
pub const FSK_PACKET_BYTES: usize = FSK_MAX_PACKET_BITS / 8;

/// Decoded FSK packet
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FskPacket {
    /// Payload bits, first received bit in the MSB of byte 0
    pub payload: [u8; FSK_PACKET_BYTES],
    /// Number of valid bits in `payload`
    pub bits_received: u16,
}

impl FskPacket {
    /// Read payload bit `index`; bits past `bits_received` read as 0
    #[must_use]
    pub fn bit(&self, index: usize) -> bool {
        if index >= usize::from(self.bits_received) {
            return false;
        }
        self.payload[index / 8] & (0x80 >> (index % 8)) != 0
    }
}

/// Mode and raw sampling rate requested by the control core
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BasebandConfiguration {
    /// Requested demodulation mode
    pub mode: Mode,
    /// Raw sample rate in Hz
    pub sampling_rate: u32,
}

/// FSK decoder parameters
///
/// Out-of-range values are clamped when applied: the access code length to
/// 64 bits, the tolerance to the code length, the packet length to 256 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FskConfiguration {
    /// Symbol rate in symbols per second
    pub symbol_rate: u32,
    /// Access code, right-aligned; the last transmitted bit is bit 0
    pub access_code: u64,
    /// Access code length in bits
    pub access_code_length: u8,
    /// Bit errors allowed when matching the access code
    pub access_code_tolerance: u8,
    /// Payload length in bits
    pub packet_length: u16,
}

#[cfg(feature = "embedded")]
impl defmt::Format for FskConfiguration {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "FskConfiguration {{ symbol_rate: {=u32}, code_len: {=u8}, tol: {=u8}, packet_len: {=u16} }}",
            self.symbol_rate,
            self.access_code_length,
            self.access_code_tolerance,
            self.packet_length
        );
    }
}

/// A message crossing between the cores
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Message {
    /// See [`BasebandStatistics`]
    BasebandStatistics(BasebandStatistics),
    /// See [`RssiStatistics`]
    RssiStatistics(RssiStatistics),
    /// See [`ChannelStatistics`]
    ChannelStatistics(ChannelStatistics),
    /// See [`AudioStatistics`]
    AudioStatistics(AudioStatistics),
    /// See [`ChannelSpectrum`]
    ChannelSpectrum(ChannelSpectrum),
    /// See [`FskPacket`]
    FskPacket(FskPacket),
    /// See [`BasebandConfiguration`]
    BasebandConfiguration(BasebandConfiguration),
    /// See [`FskConfiguration`]
    FskConfiguration(FskConfiguration),
}

impl Message {
    /// Kind of this message
    #[must_use]
    pub const fn id(&self) -> MessageId {
        match self {
            Self::BasebandStatistics(_) => MessageId::BasebandStatistics,
            Self::RssiStatistics(_) => MessageId::RssiStatistics,
            Self::ChannelStatistics(_) => MessageId::ChannelStatistics,
            Self::AudioStatistics(_) => MessageId::AudioStatistics,
            Self::ChannelSpectrum(_) => MessageId::ChannelSpectrum,
            Self::FskPacket(_) => MessageId::FskPacket,
            Self::BasebandConfiguration(_) => MessageId::BasebandConfiguration,
            Self::FskConfiguration(_) => MessageId::FskConfiguration,
        }
    }
}
