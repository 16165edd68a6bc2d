//! Narrowband FM
//!
//! ```text
//! 3.072MHz complex<i8>[2048]
//!  -> channel decimator ÷32         -> 96kHz complex<i16>[64]
//!  -> FIR 0.042fs pass, 0.078fs stop, ÷2 -> 48kHz complex<i16>[32]
//!  -> FM discriminator, 7.5kHz dev  -> 48kHz i16[32]
//!  -> 300Hz high-pass               -> audio
//! ```

use super::{publish_channel_filter, AudioOutput, ChannelFeeds};
use crate::config::{AUDIO_BUFFER_SAMPLES, AUDIO_SAMPLING_RATE, FIR_TAPS};
use crate::dsp::channel_decimator::{ChannelDecimator, DecimationFactor};
use crate::dsp::decimate::FirAndDecimateBy2Complex;
use crate::dsp::demodulate::FmDemodulator;
use crate::dsp::filter::{FirTaps, IirBiquad, AUDIO_HPF};
use crate::hal::AudioSink;
use crate::shared::SharedMemory;
use crate::types::{Buffer, Complex8};

/// Narrowband FM voice pipeline
pub struct NarrowbandFm {
    decimator: ChannelDecimator,
    channel_filter: FirAndDecimateBy2Complex<FIR_TAPS>,
    demod: FmDemodulator,
    audio_hpf: IirBiquad,
    channel: ChannelFeeds,
    output: AudioOutput,
}

impl NarrowbandFm {
    /// Channel filter pass edge, normalized to the decimator output
    pub const PASS_NORMALIZED: f32 = 0.042;
    /// Channel filter stop edge, normalized to the decimator output
    pub const STOP_NORMALIZED: f32 = 0.078;
    /// Peak deviation mapped to full-scale audio
    pub const DEVIATION_HZ: u32 = 7_500;

    /// Build the pipeline with cleared filter state
    #[must_use]
    pub fn new() -> Self {
        Self {
            decimator: ChannelDecimator::new(DecimationFactor::By32),
            channel_filter: FirAndDecimateBy2Complex::new(FirTaps::lowpass(
                Self::PASS_NORMALIZED,
                Self::STOP_NORMALIZED,
            )),
            demod: FmDemodulator::new(AUDIO_SAMPLING_RATE, Self::DEVIATION_HZ),
            audio_hpf: IirBiquad::new(AUDIO_HPF),
            channel: ChannelFeeds::new(),
            output: AudioOutput::new(),
        }
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

        let mut work = [0i16; AUDIO_BUFFER_SAMPLES];
        let demodulated = self.demod.execute(channel.as_buffer(), &mut work);
        self.audio_hpf.execute(demodulated.samples);

        self.output.deliver(demodulated.as_buffer(), shared, audio);
    }
}

impl Default for NarrowbandFm {
    fn default() -> Self {
        Self::new()
    }
}
