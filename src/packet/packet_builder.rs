//! Packet Builder
//!
//! Collects payload symbols after an access code match until the configured
//! packet length is reached.

use crate::config::FSK_MAX_PACKET_BITS;
use crate::protocol::{FskPacket, FSK_PACKET_BYTES};

/// Packet assembly state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PacketState {
    /// Waiting for the access code
    #[default]
    Searching,
    /// Access code seen, accumulating payload
    Synced,
}

#[cfg(feature = "embedded")]
impl defmt::Format for PacketState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Searching => defmt::write!(f, "Searching"),
            Self::Synced => defmt::write!(f, "Synced"),
        }
    }
}

/// Fixed-length packet accumulator
#[derive(Clone, Copy, Debug, Default)]
pub struct PacketBuilder {
    state: PacketState,
    length: u16,
    bits: u16,
    payload: [u8; FSK_PACKET_BYTES],
}

impl PacketBuilder {
    /// Builder with zero packet length
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: PacketState::Searching,
            length: 0,
            bits: 0,
            payload: [0; FSK_PACKET_BYTES],
        }
    }

    /// Set the packet length (clamped to 256 bits) and drop any partial packet
    pub fn configure(&mut self, length: u16) {
        self.length = length.min(FSK_MAX_PACKET_BITS as u16);
        self.reset();
    }

    /// Return to searching with an empty bit buffer
    pub fn reset(&mut self) {
        self.state = PacketState::Searching;
        self.bits = 0;
        self.payload = [0; FSK_PACKET_BYTES];
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> PacketState {
        self.state
    }

    /// Payload bits accumulated so far
    #[must_use]
    pub const fn bits_received(&self) -> u16 {
        self.bits
    }

    /// Configured packet length in bits
    #[must_use]
    pub const fn length(&self) -> u16 {
        self.length
    }

    /// Consume one symbol
    ///
    /// `access_code_found` only matters while searching; once synced every
    /// symbol is payload. `on_packet` runs when the packet length is reached.
    pub fn execute<F>(&mut self, bit: bool, access_code_found: bool, mut on_packet: F)
    where
        F: FnMut(FskPacket),
    {
        match self.state {
            PacketState::Searching => {
                if access_code_found {
                    self.reset();
                    self.state = PacketState::Synced;
                    if self.length == 0 {
                        self.emit(&mut on_packet);
                    }
                }
            }
            PacketState::Synced => {
                let index = usize::from(self.bits);
                if bit {
                    self.payload[index / 8] |= 0x80 >> (index % 8);
                }
                self.bits += 1;

                if self.bits >= self.length {
                    self.emit(&mut on_packet);
                }
            }
        }
    }

    fn emit<F>(&mut self, on_packet: &mut F)
    where
        F: FnMut(FskPacket),
    {
        on_packet(FskPacket {
            payload: self.payload,
            bits_received: self.bits,
        });
        self.reset();
    }
}
