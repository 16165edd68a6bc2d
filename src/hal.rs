//! Hardware Abstraction Layer
//!
//! The baseband core reaches the board only through these traits. On the
//! embedded target they are implemented by [`board`]; host tests provide
//! recording doubles.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::types::StereoFrame;

#[cfg(feature = "embedded")]
pub mod board;
#[cfg(feature = "embedded")]
pub mod dma;

/// Stereo 16-bit audio output with mute control
pub trait AudioSink {
    /// Queue one block of frames
    fn write(&mut self, frames: &[StereoFrame]);

    /// Silence the output
    fn mute(&mut self);

    /// Resume the output
    fn unmute(&mut self);
}

/// RF front-end switches driven by the reconfiguration handler
pub trait RfControl {
    /// Start RF power (RSSI) sampling
    fn rssi_start(&mut self);

    /// Stop RF power (RSSI) sampling
    fn rssi_stop(&mut self);

    /// Enable baseband sample DMA
    fn baseband_dma_enable(&mut self);

    /// Disable baseband sample DMA
    fn baseband_dma_disable(&mut self);
}

/// RF switch state shared between the dispatcher and the transfer glue
///
/// The dispatcher flips the switches through [`RfControl`]; whoever
/// delivers completed transfers checks them and drops transfers for a
/// stopped source.
pub struct RfSwitches {
    rssi: AtomicBool,
    baseband_dma: AtomicBool,
}

impl RfSwitches {
    /// Both sources stopped
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rssi: AtomicBool::new(false),
            baseband_dma: AtomicBool::new(false),
        }
    }

    /// Whether RSSI transfers should be delivered
    #[must_use]
    pub fn rssi_enabled(&self) -> bool {
        self.rssi.load(Ordering::Acquire)
    }

    /// Whether baseband transfers should be delivered
    #[must_use]
    pub fn baseband_dma_enabled(&self) -> bool {
        self.baseband_dma.load(Ordering::Acquire)
    }
}

impl Default for RfSwitches {
    fn default() -> Self {
        Self::new()
    }
}

impl RfControl for &RfSwitches {
    fn rssi_start(&mut self) {
        self.rssi.store(true, Ordering::Release);
    }

    fn rssi_stop(&mut self) {
        self.rssi.store(false, Ordering::Release);
    }

    fn baseband_dma_enable(&mut self) {
        self.baseband_dma.store(true, Ordering::Release);
    }

    fn baseband_dma_disable(&mut self) {
        self.baseband_dma.store(false, Ordering::Release);
    }
}

/// Cumulative CPU tick counters; values wrap
pub trait TickSource {
    /// Ticks spent idle
    fn idle_ticks(&self) -> u32;

    /// Ticks spent in the baseband thread
    fn baseband_ticks(&self) -> u32;
}

impl<T: AudioSink + ?Sized> AudioSink for &mut T {
    fn write(&mut self, frames: &[StereoFrame]) {
        (**self).write(frames);
    }

    fn mute(&mut self) {
        (**self).mute();
    }

    fn unmute(&mut self) {
        (**self).unmute();
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::message::EventDispatcher;
    use crate::protocol::{BasebandConfiguration, Message};
    use crate::runtime::{install_handlers, Controller};
    use crate::shared::SharedMemory;
    use crate::types::Mode;

    fn configure(shared: &SharedMemory, mode: Mode) {
        assert!(shared.send_to_baseband(Message::BasebandConfiguration(BasebandConfiguration {
            mode,
            sampling_rate: 3_072_000,
        })));
    }

    #[test]
    fn switches_follow_mode_changes() {
        let switches = RfSwitches::new();
        let shared = SharedMemory::new();
        let mut dispatcher = EventDispatcher::new(&shared);
        install_handlers(dispatcher.handlers_mut());
        let mut controller = Controller::new(&shared, &switches);
        assert!(!switches.rssi_enabled());
        assert!(!switches.baseband_dma_enabled());

        configure(&shared, Mode::WbFm);
        dispatcher.poll(&mut controller);
        assert!(switches.rssi_enabled());
        assert!(switches.baseband_dma_enabled());

        configure(&shared, Mode::Off);
        dispatcher.poll(&mut controller);
        assert!(!switches.rssi_enabled());
        assert!(!switches.baseband_dma_enabled());
    }
}
