//! Cross-core message queue
//!
//! A bounded lock-free ring paired with a [`MessagePool`]. `push` never
//! blocks: when the kind is still in flight or the ring is full the message
//! is dropped and `false` is returned.

use heapless::mpmc::MpMcQueue;

use super::pool::MessagePool;
use crate::protocol::{Message, MessageId};

/// Bounded message queue with per-kind backpressure; `N` is a power of two
pub struct MessageQueue<const N: usize> {
    ring: MpMcQueue<Message, N>,
    pool: MessagePool,
}

impl<const N: usize> MessageQueue<N> {
    /// Empty queue with every kind free
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: MpMcQueue::new(),
            pool: MessagePool::new(),
        }
    }

    /// Enqueue `message` unless its kind is already in flight
    pub fn push(&self, message: Message) -> bool {
        let id = message.id();
        if !self.pool.claim(id) {
            return false;
        }

        if self.ring.enqueue(message).is_err() {
            self.pool.release(id);
            return false;
        }

        true
    }

    /// Oldest queued message
    ///
    /// The kind stays in use until [`MessageQueue::release`] is called.
    pub fn pop(&self) -> Option<Message> {
        self.ring.dequeue()
    }

    /// Free the kind after the message was handled
    pub fn release(&self, id: MessageId) {
        self.pool.release(id);
    }

    /// Whether a message of kind `id` could be pushed now
    #[must_use]
    pub fn is_free(&self, id: MessageId) -> bool {
        self.pool.is_free(id)
    }
}

impl<const N: usize> Default for MessageQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::protocol::{AudioStatistics, ChannelStatistics};

    fn audio(count: u32) -> Message {
        Message::AudioStatistics(AudioStatistics {
            count,
            ..AudioStatistics::default()
        })
    }

    #[test]
    fn second_push_of_in_flight_kind_is_dropped() {
        let queue = MessageQueue::<4>::new();
        assert!(queue.push(audio(1)));
        assert!(!queue.push(audio(2)));

        assert_eq!(queue.pop(), Some(audio(1)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn release_allows_next_push() {
        let queue = MessageQueue::<4>::new();
        assert!(queue.push(audio(1)));
        let msg = queue.pop();
        assert!(!queue.push(audio(2)));
        if let Some(msg) = msg {
            queue.release(msg.id());
        }
        assert!(queue.push(audio(2)));
    }

    #[test]
    fn full_ring_rolls_back_claim() {
        let queue = MessageQueue::<2>::new();
        assert!(queue.push(audio(1)));
        assert!(queue.push(Message::ChannelStatistics(ChannelStatistics::default())));
        assert!(!queue.push(Message::FskPacket(crate::protocol::FskPacket::default())));
        assert!(queue.is_free(MessageId::FskPacket));
    }
}
