//! FSK Symbol and Packet Decoding
//!
//! Sliced samples flow through clock recovery to symbols, the correlator
//! watches the symbol stream for the access code, and the packet builder
//! collects the payload that follows.
//!
//! ```text
//! slice ─► ClockRecovery ─► symbol ─┬─► AccessCodeCorrelator ─┐
//!                                   └───────────────► PacketBuilder ─► FskPacket
//! ```

pub mod access_code;
pub mod clock_recovery;
pub mod packet_builder;

pub use access_code::AccessCodeCorrelator;
pub use clock_recovery::ClockRecovery;
pub use packet_builder::{PacketBuilder, PacketState};

use crate::protocol::{FskConfiguration, FskPacket};

/// Clock recovery, correlator and packet builder driven together
#[derive(Clone, Copy, Debug, Default)]
pub struct PacketDecoder {
    clock_recovery: ClockRecovery,
    access_code: AccessCodeCorrelator,
    packet_builder: PacketBuilder,
}

impl PacketDecoder {
    /// Unconfigured decoder; emits nothing until configured
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clock_recovery: ClockRecovery::new(),
            access_code: AccessCodeCorrelator::new(),
            packet_builder: PacketBuilder::new(),
        }
    }

    /// Apply new parameters; all three stages restart and any partial
    /// packet is discarded
    pub fn configure(&mut self, configuration: &FskConfiguration, sampling_rate: u32) {
        self.clock_recovery
            .configure(configuration.symbol_rate, sampling_rate);
        self.access_code.configure(
            configuration.access_code,
            configuration.access_code_length,
            configuration.access_code_tolerance,
        );
        self.packet_builder.configure(configuration.packet_length);
    }

    /// Packet assembly state
    #[must_use]
    pub const fn state(&self) -> PacketState {
        self.packet_builder.state()
    }

    /// Payload bits of the packet in progress
    #[must_use]
    pub const fn bits_received(&self) -> u16 {
        self.packet_builder.bits_received()
    }

    /// Consume one sliced sample
    pub fn execute<F>(&mut self, bit: bool, mut on_packet: F)
    where
        F: FnMut(FskPacket),
    {
        let access_code = &mut self.access_code;
        let packet_builder = &mut self.packet_builder;
        self.clock_recovery.execute(bit, |symbol| {
            let found = access_code.execute(symbol);
            packet_builder.execute(symbol, found, &mut on_packet);
        });
    }
}
