//! Dispatcher wake reasons
//!
//! Producers raise bits in an atomic mask; the dispatcher takes the whole
//! mask at once and handles each reason. On the embedded target raising
//! also signals the dispatcher task.

use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "embedded")]
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};

/// New message in the baseband queue
pub const EVT_MASK_BASEBAND: u32 = 1 << 0;

/// Channel spectrum snapshot ready
pub const EVT_MASK_SPECTRUM: u32 = 1 << 1;

/// Pending wake reasons
pub struct EventFlags {
    mask: AtomicU32,
    #[cfg(feature = "embedded")]
    signal: Signal<CriticalSectionRawMutex, ()>,
}

impl EventFlags {
    /// No pending events
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mask: AtomicU32::new(0),
            #[cfg(feature = "embedded")]
            signal: Signal::new(),
        }
    }

    /// Add `events` to the pending mask and wake the dispatcher
    pub fn raise(&self, events: u32) {
        self.mask.fetch_or(events, Ordering::AcqRel);
        #[cfg(feature = "embedded")]
        self.signal.signal(());
    }

    /// Take and clear all pending events
    pub fn take(&self) -> u32 {
        self.mask.swap(0, Ordering::AcqRel)
    }

    /// Wait until at least one event is pending, then take them all
    #[cfg(feature = "embedded")]
    pub async fn wait(&self) -> u32 {
        loop {
            let events = self.take();
            if events != 0 {
                return events;
            }
            self.signal.wait().await;
        }
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::new()
    }
}
