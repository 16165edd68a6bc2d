//! Narrowband AM
//!
//! ```text
//! 3.072MHz complex<i8>[2048]
//!  -> channel decimator ÷32         -> 96kHz complex<i16>[64]
//!  -> FIR 0.031fs pass, 0.070fs stop, ÷2 -> 48kHz complex<i16>[32]
//!  -> envelope                      -> 48kHz i16[32]
//!  -> 300Hz high-pass               -> audio
//! ```

use super::{publish_channel_filter, AudioOutput, ChannelFeeds};
use crate::config::{AUDIO_BUFFER_SAMPLES, FIR_TAPS};
use crate::dsp::channel_decimator::{ChannelDecimator, DecimationFactor};
use crate::dsp::decimate::FirAndDecimateBy2Complex;
use crate::dsp::demodulate::AmDemodulator;
use crate::dsp::filter::{FirTaps, IirBiquad, AUDIO_HPF};
use crate::hal::AudioSink;
use crate::shared::SharedMemory;
use crate::types::{Buffer, Complex8};

/// AM envelope pipeline
pub struct NarrowbandAm {
    decimator: ChannelDecimator,
    channel_filter: FirAndDecimateBy2Complex<FIR_TAPS>,
    demod: AmDemodulator,
    audio_hpf: IirBiquad,
    channel: ChannelFeeds,
    output: AudioOutput,
}

impl NarrowbandAm {
    /// Channel filter pass edge, normalized to the decimator output
    pub const PASS_NORMALIZED: f32 = 0.031;
    /// Channel filter stop edge, normalized to the decimator output
    pub const STOP_NORMALIZED: f32 = 0.070;

    /// Build the pipeline with cleared filter state
    #[must_use]
    pub fn new() -> Self {
        Self {
            decimator: ChannelDecimator::new(DecimationFactor::By32),
            channel_filter: FirAndDecimateBy2Complex::new(FirTaps::lowpass(
                Self::PASS_NORMALIZED,
                Self::STOP_NORMALIZED,
            )),
            demod: AmDemodulator::new(),
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

impl Default for NarrowbandAm {
    fn default() -> Self {
        Self::new()
    }
}
