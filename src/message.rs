//! Message Infrastructure
//!
//! Ownership flags, the cross-core queue, wake-reason flags and the
//! handler-table dispatcher that together carry messages between the
//! baseband threads and the control core.

pub mod dispatch;
pub mod events;
pub mod pool;
pub mod queue;

pub use dispatch::{EventDispatcher, Handler, HandlerMap};
pub use events::{EventFlags, EVT_MASK_BASEBAND, EVT_MASK_SPECTRUM};
pub use pool::MessagePool;
pub use queue::MessageQueue;
