//! Runtime
//!
//! The two real-time threads and the dispatcher-side reconfiguration
//! handlers. Each is a plain struct driven by whatever waits on the hardware:
//! embassy tasks on the target, loops or threads in host tests.

pub mod baseband_thread;
pub mod control;
pub mod rssi_thread;

pub use baseband_thread::BasebandThread;
pub use control::{handle_baseband_configuration, handle_fsk_configuration, install_handlers, Controller};
pub use rssi_thread::RssiThread;
