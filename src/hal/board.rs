//! Board implementations of the baseband traits
//!
//! Audio goes to the codec through [`super::dma::AUDIO_BLOCKS`]; load is
//! measured with `embassy_time`. The RF switches are [`super::dma::RF_SWITCHES`].

use embassy_time::Instant;

use super::dma::{AudioBlock, AUDIO_BLOCKS};
use super::{AudioSink, TickSource};
use crate::config::AUDIO_BUFFER_SAMPLES;
use crate::types::StereoFrame;

/// Audio sink feeding the codec channel
#[derive(Clone, Copy, Debug)]
pub struct BoardAudio {
    muted: bool,
}

impl BoardAudio {
    /// Muted until a pipeline produces audio
    #[must_use]
    pub const fn new() -> Self {
        Self { muted: true }
    }
}

impl Default for BoardAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for BoardAudio {
    fn write(&mut self, frames: &[StereoFrame]) {
        let mut block = AudioBlock {
            frames: [StereoFrame::mono(0); AUDIO_BUFFER_SAMPLES],
            len: frames.len().min(AUDIO_BUFFER_SAMPLES),
            muted: self.muted,
        };
        block.frames[..block.len].copy_from_slice(&frames[..block.len]);
        if AUDIO_BLOCKS.try_send(block).is_err() {
            defmt::trace!("audio: codec overrun");
        }
    }

    fn mute(&mut self) {
        self.muted = true;
    }

    fn unmute(&mut self) {
        self.muted = false;
    }
}

/// Busy/idle split of wall time for the sample task
#[derive(Clone, Copy, Debug)]
pub struct LoadMeter {
    epoch: Instant,
    busy_since: Option<Instant>,
    busy_ticks: u64,
}

impl LoadMeter {
    /// Start measuring now
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            busy_since: None,
            busy_ticks: 0,
        }
    }

    /// The sample task started work on a buffer
    pub fn begin(&mut self) {
        self.busy_since = Some(Instant::now());
    }

    /// The sample task finished a buffer
    pub fn end(&mut self) {
        if let Some(start) = self.busy_since.take() {
            self.busy_ticks += Instant::now().as_ticks() - start.as_ticks();
        }
    }
}

impl Default for LoadMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for LoadMeter {
    fn idle_ticks(&self) -> u32 {
        let elapsed = Instant::now().as_ticks() - self.epoch.as_ticks();
        elapsed.saturating_sub(self.busy_ticks) as u32
    }

    fn baseband_ticks(&self) -> u32 {
        let in_progress = self
            .busy_since
            .map_or(0, |start| Instant::now().as_ticks() - start.as_ticks());
        (self.busy_ticks + in_progress) as u32
    }
}
