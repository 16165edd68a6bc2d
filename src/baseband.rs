//! Demodulator Pipelines
//!
//! One [`BasebandProcessor`] is active at a time. Each variant turns a raw
//! buffer into side effects: audio on the sink, statistics and spectrum
//! snapshots toward the control core, or decoded packets.
//!
//! ```text
//! raw ─► ChannelDecimator ─► [channel FIR ÷2] ─┬─► channel stats / spectrum
//!                                              └─► demod ─► HPF ─► audio stats ─► sink
//! ```
//!
//! Outbound messages are posted only when their kind is free; otherwise the
//! observation is dropped.

pub mod fsk;
pub mod narrowband_am;
pub mod narrowband_fm;
pub mod wideband_fm;

pub use fsk::Fsk;
pub use narrowband_am::NarrowbandAm;
pub use narrowband_fm::NarrowbandFm;
pub use wideband_fm::WidebandFm;

use crate::config::{AUDIO_BUFFER_SAMPLES, CHANNEL_SPECTRUM_DECIMATION, CHANNEL_SPECTRUM_SIZE};
use crate::dsp::block_decimator::BlockDecimator;
use crate::dsp::filter::FirTaps;
use crate::hal::AudioSink;
use crate::protocol::Message;
use crate::shared::SharedMemory;
use crate::stats::{AudioStatsCollector, ChannelStatsCollector};
use crate::types::{Buffer, Complex16, Complex8, Mode, StereoFrame};

/// The active demodulator pipeline
pub enum BasebandProcessor {
    /// Narrowband AM audio
    NarrowbandAm(NarrowbandAm),
    /// Narrowband FM audio
    NarrowbandFm(NarrowbandFm),
    /// Broadcast FM audio
    WidebandFm(WidebandFm),
    /// FSK packet decoding
    Fsk(Fsk),
}

impl BasebandProcessor {
    /// Build the pipeline for `mode`; [`Mode::Off`] has none
    #[must_use]
    pub fn for_mode(mode: Mode) -> Option<Self> {
        match mode {
            Mode::Am => Some(Self::NarrowbandAm(NarrowbandAm::new())),
            Mode::NbFm => Some(Self::NarrowbandFm(NarrowbandFm::new())),
            Mode::WbFm => Some(Self::WidebandFm(WidebandFm::new())),
            Mode::Fsk => Some(Self::Fsk(Fsk::new())),
            Mode::Off => None,
        }
    }

    /// Mode this pipeline implements
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self {
            Self::NarrowbandAm(_) => Mode::Am,
            Self::NarrowbandFm(_) => Mode::NbFm,
            Self::WidebandFm(_) => Mode::WbFm,
            Self::Fsk(_) => Mode::Fsk,
        }
    }

    /// Process one raw buffer
    pub fn execute<A>(&mut self, buffer: Buffer<'_, Complex8>, shared: &SharedMemory, audio: &mut A)
    where
        A: AudioSink + ?Sized,
    {
        match self {
            Self::NarrowbandAm(p) => p.execute(buffer, shared, audio),
            Self::NarrowbandFm(p) => p.execute(buffer, shared, audio),
            Self::WidebandFm(p) => p.execute(buffer, shared, audio),
            Self::Fsk(p) => p.execute(buffer, shared, audio),
        }
    }

    /// FSK pipeline, if that is the active variant
    pub fn as_fsk_mut(&mut self) -> Option<&mut Fsk> {
        match self {
            Self::Fsk(p) => Some(p),
            _ => None,
        }
    }
}

/// Channel power statistics and spectrum snapshots
struct ChannelFeeds {
    channel_stats: ChannelStatsCollector,
    spectrum_decimator: BlockDecimator<CHANNEL_SPECTRUM_SIZE>,
}

impl ChannelFeeds {
    const fn new() -> Self {
        Self {
            channel_stats: ChannelStatsCollector::new(),
            spectrum_decimator: BlockDecimator::new(CHANNEL_SPECTRUM_DECIMATION),
        }
    }

    fn feed_channel_stats(&mut self, channel: Buffer<'_, Complex16>, shared: &SharedMemory) {
        self.channel_stats.feed(channel, |statistics| {
            shared
                .application_queue
                .push(Message::ChannelStatistics(statistics));
        });
    }

    fn feed_channel_spectrum(&mut self, channel: Buffer<'_, Complex16>, shared: &SharedMemory) {
        self.spectrum_decimator
            .feed(channel, |block| shared.publish_spectrum(block));
    }
}

/// Publish FIR edges in Hz for the filter's input rate
fn publish_channel_filter<const N: usize>(shared: &SharedMemory, taps: &FirTaps<N>, input_rate: u32) {
    let rate = input_rate as f32;
    shared.set_channel_filter(
        (taps.pass_frequency_normalized() * rate) as u32,
        (taps.stop_frequency_normalized() * rate) as u32,
    );
}

/// Audio statistics and delivery to the sink
struct AudioOutput {
    audio_stats: AudioStatsCollector,
    frames: [StereoFrame; AUDIO_BUFFER_SAMPLES],
}

impl AudioOutput {
    const fn new() -> Self {
        Self {
            audio_stats: AudioStatsCollector::new(),
            frames: [StereoFrame::mono(0); AUDIO_BUFFER_SAMPLES],
        }
    }

    /// Feed statistics, write one stereo block and unmute
    fn deliver<A>(&mut self, audio: Buffer<'_, i16>, shared: &SharedMemory, sink: &mut A)
    where
        A: AudioSink + ?Sized,
    {
        self.audio_stats.feed(audio, |statistics| {
            shared
                .application_queue
                .push(Message::AudioStatistics(statistics));
        });

        let count = audio.len().min(AUDIO_BUFFER_SAMPLES);
        for (frame, &sample) in self.frames.iter_mut().zip(audio.samples) {
            *frame = StereoFrame::mono(sample);
        }
        sink.write(&self.frames[..count]);
        sink.unmute();
    }
}
