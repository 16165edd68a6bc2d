//! DMA handoff channels
//!
//! This is the surface the peripheral drivers integrate against: their
//! transfer-complete handlers call [`deliver_baseband`] and [`deliver_rssi`],
//! and the codec driver drains [`AUDIO_BLOCKS`]. Transfers for a source
//! switched off through [`RF_SWITCHES`] are dropped at delivery. A full
//! channel means the consumer overran; the block is dropped.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use super::RfSwitches;
use crate::config::{AUDIO_BUFFER_SAMPLES, RAW_BUFFER_SAMPLES, RSSI_BUFFER_SAMPLES};
use crate::types::{Complex8, StereoFrame};

/// One baseband transfer
pub type RawBlock = [Complex8; RAW_BUFFER_SAMPLES];

/// One RSSI transfer
pub type RssiBlock = [u8; RSSI_BUFFER_SAMPLES];

/// One audio block with its valid length
#[derive(Clone, Copy)]
pub struct AudioBlock {
    /// Frames
    pub frames: [StereoFrame; AUDIO_BUFFER_SAMPLES],
    /// Valid frames
    pub len: usize,
    /// The codec should play silence for this block
    pub muted: bool,
}

/// RF switches driven by the dispatcher's controller
pub static RF_SWITCHES: RfSwitches = RfSwitches::new();

/// Baseband transfers awaiting the sample task
pub static BASEBAND_BLOCKS: Channel<CriticalSectionRawMutex, RawBlock, 2> = Channel::new();

/// RSSI transfers awaiting the RSSI task
pub static RSSI_BLOCKS: Channel<CriticalSectionRawMutex, RssiBlock, 2> = Channel::new();

/// Audio blocks awaiting the codec
pub static AUDIO_BLOCKS: Channel<CriticalSectionRawMutex, AudioBlock, 2> = Channel::new();

/// Hand a completed baseband transfer to the sample task
///
/// False if baseband DMA is disabled or the sample task is behind.
pub fn deliver_baseband(block: RawBlock) -> bool {
    RF_SWITCHES.baseband_dma_enabled() && BASEBAND_BLOCKS.try_send(block).is_ok()
}

/// Hand a completed RSSI transfer to the RSSI task
///
/// False if RSSI sampling is stopped or the RSSI task is behind.
pub fn deliver_rssi(block: RssiBlock) -> bool {
    RF_SWITCHES.rssi_enabled() && RSSI_BLOCKS.try_send(block).is_ok()
}
