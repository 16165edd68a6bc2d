//! RF power (RSSI) thread
//!
//! Independent of the sample thread; shares nothing with it but the
//! outbound queue.

use crate::protocol::Message;
use crate::shared::SharedMemory;
use crate::stats::RssiStatisticsCollector;
use crate::types::Buffer;

/// Per-buffer driver of the RSSI statistics
pub struct RssiThread<'a> {
    shared: &'a SharedMemory,
    stats: RssiStatisticsCollector,
}

impl<'a> RssiThread<'a> {
    /// New thread state with an empty window
    #[must_use]
    pub const fn new(shared: &'a SharedMemory) -> Self {
        Self {
            shared,
            stats: RssiStatisticsCollector::new(),
        }
    }

    /// Handle one buffer of raw RSSI readings
    pub fn process(&mut self, buffer: Buffer<'_, u8>) {
        let shared = self.shared;
        self.stats.feed(buffer, |statistics| {
            shared
                .application_queue
                .push(Message::RssiStatistics(statistics));
        });
    }
}
