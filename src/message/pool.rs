//! Message ownership flags
//!
//! One flag per [`MessageId`]: free or in use. A producer claims the flag
//! before enqueueing and the consumer releases it after handling, so a kind
//! can never be queued twice.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::protocol::MessageId;

/// Per-kind free / in-use flags
#[derive(Debug)]
pub struct MessagePool {
    in_use: [AtomicBool; MessageId::COUNT],
}

impl MessagePool {
    /// All kinds free
    #[must_use]
    pub const fn new() -> Self {
        Self {
            in_use: [const { AtomicBool::new(false) }; MessageId::COUNT],
        }
    }

    /// Mark `id` in use; false if it already was
    pub fn claim(&self, id: MessageId) -> bool {
        self.in_use[id.index()]
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
    }

    /// Mark `id` free
    pub fn release(&self, id: MessageId) {
        self.in_use[id.index()].store(false, Ordering::Release);
    }

    /// Whether `id` can be claimed
    #[must_use]
    pub fn is_free(&self, id: MessageId) -> bool {
        !self.in_use[id.index()].load(Ordering::Acquire)
    }
}

impl Default for MessagePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn claim_is_exclusive_until_release() {
        let pool = MessagePool::new();
        assert!(pool.claim(MessageId::AudioStatistics));
        assert!(!pool.claim(MessageId::AudioStatistics));
        assert!(pool.claim(MessageId::ChannelStatistics));
        pool.release(MessageId::AudioStatistics);
        assert!(pool.is_free(MessageId::AudioStatistics));
        assert!(pool.claim(MessageId::AudioStatistics));
    }
}
