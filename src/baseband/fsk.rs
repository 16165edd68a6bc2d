//! FSK packet decoding
//!
//! ```text
//! 2.4576MHz complex<i8>[2048]
//!  -> channel decimator ÷16         -> 153.6kHz complex<i16>[128]
//!  -> FIR 0.031fs pass, 0.070fs stop, ÷2 -> 76.8kHz complex<i16>[64]
//!  -> FM discriminator, 19.2kHz dev -> 76.8kHz i16[64]
//!  -> slice (>= 0 is 1)             -> clock recovery -> packets
//! ```
//!
//! The audio sink stays muted while this pipeline runs.

use super::{publish_channel_filter, ChannelFeeds};
use crate::config::{FIR_TAPS, FSK_SAMPLING_RATE, RAW_BUFFER_SAMPLES};
use crate::dsp::channel_decimator::{ChannelDecimator, DecimationFactor};
use crate::dsp::decimate::FirAndDecimateBy2Complex;
use crate::dsp::demodulate::FmDemodulator;
use crate::dsp::filter::FirTaps;
use crate::hal::AudioSink;
use crate::packet::{PacketDecoder, PacketState};
use crate::protocol::{FskConfiguration, Message};
use crate::shared::SharedMemory;
use crate::types::{Buffer, Complex8};

/// Demodulator output length for one raw buffer
const DEMOD_SAMPLES: usize = RAW_BUFFER_SAMPLES / 32;

/// FSK packet pipeline
pub struct Fsk {
    decimator: ChannelDecimator,
    channel_filter: FirAndDecimateBy2Complex<FIR_TAPS>,
    demod: FmDemodulator,
    decoder: PacketDecoder,
    channel: ChannelFeeds,
}

impl Fsk {
    /// Channel filter pass edge, normalized to the decimator output
    pub const PASS_NORMALIZED: f32 = 0.031;
    /// Channel filter stop edge, normalized to the decimator output
    pub const STOP_NORMALIZED: f32 = 0.070;
    /// Peak deviation mapped to full scale
    pub const DEVIATION_HZ: u32 = 19_200;

    /// Build an unconfigured pipeline; no packets until [`Fsk::configure`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            decimator: ChannelDecimator::new(DecimationFactor::By16),
            channel_filter: FirAndDecimateBy2Complex::new(FirTaps::lowpass(
                Self::PASS_NORMALIZED,
                Self::STOP_NORMALIZED,
            )),
            demod: FmDemodulator::new(FSK_SAMPLING_RATE, Self::DEVIATION_HZ),
            decoder: PacketDecoder::new(),
            channel: ChannelFeeds::new(),
        }
    }

    /// Apply decoder parameters; any partial packet is dropped
    pub fn configure(&mut self, configuration: &FskConfiguration) {
        self.decoder.configure(configuration, FSK_SAMPLING_RATE);
    }

    /// Packet assembly state
    #[must_use]
    pub const fn state(&self) -> PacketState {
        self.decoder.state()
    }

    /// Payload bits of the packet in progress
    #[must_use]
    pub const fn bits_received(&self) -> u16 {
        self.decoder.bits_received()
    }

    /// Process one raw buffer
    pub fn execute<A>(&mut self, buffer: Buffer<'_, Complex8>, shared: &SharedMemory, audio: &mut A)
    where
        A: AudioSink + ?Sized,
    {
        let decimated = self.decimator.execute(buffer);
        let channel_input_rate = decimated.sampling_rate;
        let channel = self.channel_filter.execute(decimated);
        publish_channel_filter(shared, self.channel_filter.taps(), channel_input_rate);

        self.channel.feed_channel_stats(channel.as_buffer(), shared);
        self.channel.feed_channel_spectrum(channel.as_buffer(), shared);

        let mut work = [0i16; DEMOD_SAMPLES];
        let demodulated = self.demod.execute(channel.as_buffer(), &mut work);

        audio.mute();

        for &sample in demodulated.samples.iter() {
            self.decoder.execute(sample >= 0, |packet| {
                shared.application_queue.push(Message::FskPacket(packet));
            });
        }
    }
}

impl Default for Fsk {
    fn default() -> Self {
        Self::new()
    }
}
