//! Process-wide shared context
//!
//! Everything the sample thread, the RSSI thread and the dispatcher touch in
//! common lives in one [`SharedMemory`], built by a `const fn` so it can sit
//! in a `static`. Each field has a single writer:
//!
//! | Field | Writer | Reader |
//! |-------|--------|--------|
//! | `application_queue` | sample + RSSI threads, dispatcher | control core |
//! | `baseband_queue` | control core | dispatcher |
//! | `spectrum` | sample thread | dispatcher |
//! | `channel_filter_*_frequency` | sample thread | dispatcher |
//! | `requested_mode` | dispatcher | sample thread |
//! | `fsk_configuration` | dispatcher | sample thread (dispatcher drains it when leaving FSK) |
//! | `sampling_rate` | dispatcher | sample thread |

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use heapless::mpmc::MpMcQueue;

use crate::config::{
    APPLICATION_QUEUE_DEPTH, BASEBAND_QUEUE_DEPTH, CHANNEL_SPECTRUM_SIZE, DEFAULT_SAMPLING_RATE,
    FSK_CONFIGURATION_LANE_DEPTH,
};
use crate::message::events::{EventFlags, EVT_MASK_BASEBAND, EVT_MASK_SPECTRUM};
use crate::message::queue::MessageQueue;
use crate::protocol::{FskConfiguration, Message};
use crate::types::{Buffer, Complex16, Mode};

/// Decimated channel samples awaiting the FFT
#[derive(Clone, Copy, Debug)]
pub struct SpectrumSnapshot {
    /// Channel samples
    pub samples: [Complex16; CHANNEL_SPECTRUM_SIZE],
    /// Rate of `samples`
    pub sampling_rate: u32,
}

/// One-slot spectrum handoff
///
/// The sample thread publishes only while `request_update` is clear and
/// sets it; the dispatcher clears it once it has taken the snapshot.
pub struct SpectrumHandoff {
    request_update: AtomicBool,
    slot: MpMcQueue<SpectrumSnapshot, 2>,
}

impl SpectrumHandoff {
    /// Empty handoff
    #[must_use]
    pub const fn new() -> Self {
        Self {
            request_update: AtomicBool::new(false),
            slot: MpMcQueue::new(),
        }
    }

    /// Offer a block; false if the previous one is still pending
    pub fn publish(&self, block: Buffer<'_, Complex16>) -> bool {
        if self.request_update.load(Ordering::Acquire) {
            return false;
        }

        let mut snapshot = SpectrumSnapshot {
            samples: [Complex16::default(); CHANNEL_SPECTRUM_SIZE],
            sampling_rate: block.sampling_rate,
        };
        let len = block.len().min(CHANNEL_SPECTRUM_SIZE);
        snapshot.samples[..len].copy_from_slice(&block.samples[..len]);

        if self.slot.enqueue(snapshot).is_err() {
            return false;
        }
        self.request_update.store(true, Ordering::Release);
        true
    }

    /// Take the pending snapshot and clear `request_update`
    pub fn take(&self) -> Option<SpectrumSnapshot> {
        let snapshot = self.slot.dequeue()?;
        self.request_update.store(false, Ordering::Release);
        Some(snapshot)
    }

    /// Whether a snapshot is waiting
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.request_update.load(Ordering::Acquire)
    }
}

impl Default for SpectrumHandoff {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared context of the baseband core
pub struct SharedMemory {
    /// Baseband → control core
    pub application_queue: MessageQueue<APPLICATION_QUEUE_DEPTH>,
    /// Control core → baseband
    pub baseband_queue: MessageQueue<BASEBAND_QUEUE_DEPTH>,
    /// Dispatcher wake reasons
    pub events: EventFlags,
    /// Channel spectrum snapshot handoff
    pub spectrum: SpectrumHandoff,
    /// Channel filter pass-band edge in Hz
    pub channel_filter_pass_frequency: AtomicU32,
    /// Channel filter stop-band edge in Hz
    pub channel_filter_stop_frequency: AtomicU32,
    /// Requested pipeline: request generation in the upper 24 bits, the low
    /// byte of [`Mode::as_raw`] below
    pub requested_mode: AtomicU32,
    /// Raw sample rate of the current configuration
    pub sampling_rate: AtomicU32,
    /// FSK configurations waiting for the sample thread
    pub fsk_configuration: MpMcQueue<FskConfiguration, FSK_CONFIGURATION_LANE_DEPTH>,
}

impl SharedMemory {
    /// Idle context: no pipeline requested
    #[must_use]
    pub const fn new() -> Self {
        Self {
            application_queue: MessageQueue::new(),
            baseband_queue: MessageQueue::new(),
            events: EventFlags::new(),
            spectrum: SpectrumHandoff::new(),
            channel_filter_pass_frequency: AtomicU32::new(0),
            channel_filter_stop_frequency: AtomicU32::new(0),
            requested_mode: AtomicU32::new(PipelineRequest::IDLE.pack()),
            sampling_rate: AtomicU32::new(DEFAULT_SAMPLING_RATE),
            fsk_configuration: MpMcQueue::new(),
        }
    }

    /// Deliver an inbound message and wake the dispatcher
    pub fn send_to_baseband(&self, message: Message) -> bool {
        let queued = self.baseband_queue.push(message);
        if queued {
            self.events.raise(EVT_MASK_BASEBAND);
        }
        queued
    }

    /// Offer a spectrum block and wake the dispatcher if it was taken
    pub fn publish_spectrum(&self, block: Buffer<'_, Complex16>) {
        if self.spectrum.publish(block) {
            self.events.raise(EVT_MASK_SPECTRUM);
        }
    }

    /// Record the channel filter edges in Hz
    pub fn set_channel_filter(&self, pass_frequency: u32, stop_frequency: u32) {
        self.channel_filter_pass_frequency
            .store(pass_frequency, Ordering::Relaxed);
        self.channel_filter_stop_frequency
            .store(stop_frequency, Ordering::Relaxed);
    }

    /// Latest pipeline request
    #[must_use]
    pub fn pipeline_request(&self) -> PipelineRequest {
        PipelineRequest::unpack(self.requested_mode.load(Ordering::Acquire))
    }

    /// Mode the sample thread should run
    #[must_use]
    pub fn requested_mode(&self) -> Mode {
        self.pipeline_request().mode
    }

    /// Ask the sample thread to build a fresh pipeline for `mode`
    ///
    /// Every call starts a new generation, so a request for the mode that
    /// is already running still replaces its pipeline. Single writer: the
    /// dispatcher.
    pub fn request_mode(&self, mode: Mode) {
        let current = self.pipeline_request();
        let next = PipelineRequest {
            generation: current.generation.wrapping_add(1) & PipelineRequest::GENERATION_MASK,
            mode,
        };
        self.requested_mode.store(next.pack(), Ordering::Release);
    }
}

/// Mode and generation of a pipeline request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineRequest {
    /// Incremented on every request, modulo 2²⁴
    pub generation: u32,
    /// Pipeline to build
    pub mode: Mode,
}

impl PipelineRequest {
    const GENERATION_MASK: u32 = 0x00FF_FFFF;

    /// Startup state: no pipeline, generation zero
    pub const IDLE: Self = Self {
        generation: 0,
        mode: Mode::Off,
    };

    const fn pack(self) -> u32 {
        (self.generation << 8) | (self.mode.as_raw() & 0xFF)
    }

    const fn unpack(raw: u32) -> Self {
        Self {
            generation: raw >> 8,
            mode: Mode::from_raw(raw & 0xFF),
        }
    }
}

impl Default for SharedMemory {
    fn default() -> Self {
        Self::new()
    }
}
