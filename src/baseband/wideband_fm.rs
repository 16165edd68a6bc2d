//! Wideband (broadcast) FM
//!
//! ```text
//! 3.072MHz complex<i8>[2048]
//!  -> channel decimator ÷4          -> 768kHz complex<i16>[512]
//!  -> FM discriminator, 75kHz dev   -> 768kHz i16[512]
//!  -> 3 × CIC4 ÷2                   -> 96kHz i16[64]
//!  -> FIR 0.156fs pass, 0.198fs stop, ÷2 -> 48kHz i16[32]
//!  -> 300Hz high-pass               -> audio
//! ```
//!
//! The channel is demodulated unfiltered, so there are no channel filter
//! edges to publish and no spectrum feed.

use super::AudioOutput;
use crate::config::{FIR_TAPS, RAW_BUFFER_SAMPLES};
use crate::dsp::channel_decimator::{ChannelDecimator, DecimationFactor};
use crate::dsp::decimate::{DecimateBy2Cic4Real, FirAndDecimateBy2Real};
use crate::dsp::demodulate::FmDemodulator;
use crate::dsp::filter::{FirTaps, IirBiquad, AUDIO_HPF};
use crate::hal::AudioSink;
use crate::protocol::Message;
use crate::shared::SharedMemory;
use crate::stats::ChannelStatsCollector;
use crate::types::{Buffer, Complex8};

/// Demodulator output length for one raw buffer
const DEMOD_SAMPLES: usize = RAW_BUFFER_SAMPLES / 4;

/// Broadcast FM pipeline
pub struct WidebandFm {
    decimator: ChannelDecimator,
    demod: FmDemodulator,
    audio_dec_1: DecimateBy2Cic4Real,
    audio_dec_2: DecimateBy2Cic4Real,
    audio_dec_3: DecimateBy2Cic4Real,
    audio_filter: FirAndDecimateBy2Real<FIR_TAPS>,
    audio_hpf: IirBiquad,
    channel_stats: ChannelStatsCollector,
    output: AudioOutput,
    work: [i16; DEMOD_SAMPLES],
}

impl WidebandFm {
    /// Audio filter pass edge, normalized to its input rate
    pub const PASS_NORMALIZED: f32 = 0.156;
    /// Audio filter stop edge, normalized to its input rate
    pub const STOP_NORMALIZED: f32 = 0.198;
    /// Demodulator input rate
    pub const DEMOD_SAMPLING_RATE: u32 = 768_000;
    /// Peak deviation mapped to full-scale audio
    pub const DEVIATION_HZ: u32 = 75_000;

    /// Build the pipeline with cleared filter state
    #[must_use]
    pub fn new() -> Self {
        Self {
            decimator: ChannelDecimator::new(DecimationFactor::By4),
            demod: FmDemodulator::new(Self::DEMOD_SAMPLING_RATE, Self::DEVIATION_HZ),
            audio_dec_1: DecimateBy2Cic4Real::new(),
            audio_dec_2: DecimateBy2Cic4Real::new(),
            audio_dec_3: DecimateBy2Cic4Real::new(),
            audio_filter: FirAndDecimateBy2Real::new(FirTaps::lowpass(
                Self::PASS_NORMALIZED,
                Self::STOP_NORMALIZED,
            )),
            audio_hpf: IirBiquad::new(AUDIO_HPF),
            channel_stats: ChannelStatsCollector::new(),
            output: AudioOutput::new(),
            work: [0; DEMOD_SAMPLES],
        }
    }

    /// Process one raw buffer
    pub fn execute<A>(&mut self, buffer: Buffer<'_, Complex8>, shared: &SharedMemory, audio: &mut A)
    where
        A: AudioSink + ?Sized,
    {
        let channel = self.decimator.execute(buffer);

        self.channel_stats.feed(channel.as_buffer(), |statistics| {
            shared
                .application_queue
                .push(Message::ChannelStatistics(statistics));
        });

        let demodulated = self.demod.execute(channel.as_buffer(), &mut self.work);
        let audio_buffer = self.audio_dec_1.execute(demodulated);
        let audio_buffer = self.audio_dec_2.execute(audio_buffer);
        let audio_buffer = self.audio_dec_3.execute(audio_buffer);
        let audio_buffer = self.audio_filter.execute(audio_buffer);
        self.audio_hpf.execute(audio_buffer.samples);

        self.output.deliver(audio_buffer.as_buffer(), shared, audio);
    }
}

impl Default for WidebandFm {
    fn default() -> Self {
        Self::new()
    }
}
