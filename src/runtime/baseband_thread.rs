//! Sample-processing thread
//!
//! Owns the active pipeline. Pipeline swaps requested by the dispatcher are
//! applied here, between buffers, so the pipeline is never touched from
//! another thread and the old one is gone before the new one is built. A
//! swap happens whenever the request generation moves, even if the mode
//! ends up unchanged.

use crate::baseband::BasebandProcessor;
use crate::hal::{AudioSink, TickSource};
use crate::protocol::Message;
use crate::shared::{PipelineRequest, SharedMemory};
use crate::stats::BasebandStatsCollector;
use crate::types::{Buffer, Complex8, Mode};

/// Per-buffer driver of the active pipeline
pub struct BasebandThread<'a> {
    shared: &'a SharedMemory,
    processor: Option<BasebandProcessor>,
    mode: Mode,
    generation: u32,
    stats: BasebandStatsCollector,
}

impl<'a> BasebandThread<'a> {
    /// Idle thread: no pipeline
    #[must_use]
    pub const fn new(shared: &'a SharedMemory) -> Self {
        Self {
            shared,
            processor: None,
            mode: Mode::Off,
            generation: PipelineRequest::IDLE.generation,
            stats: BasebandStatsCollector::new(),
        }
    }

    /// Mode of the active pipeline
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Active pipeline
    #[must_use]
    pub fn processor(&self) -> Option<&BasebandProcessor> {
        self.processor.as_ref()
    }

    /// Handle one raw buffer
    ///
    /// Applies any pending swap and FSK configuration, runs the pipeline if
    /// one is active, then accounts the buffer for load statistics.
    pub fn process<A, T>(&mut self, buffer: Buffer<'_, Complex8>, audio: &mut A, ticks: &T)
    where
        A: AudioSink + ?Sized,
        T: TickSource + ?Sized,
    {
        self.apply_requested_mode();
        self.apply_fsk_configuration();

        if let Some(processor) = self.processor.as_mut() {
            processor.execute(buffer, self.shared, audio);
        }

        let shared = self.shared;
        self.stats
            .process(buffer.len(), buffer.sampling_rate, ticks, |statistics| {
                shared
                    .application_queue
                    .push(Message::BasebandStatistics(statistics));
            });
    }

    fn apply_requested_mode(&mut self) {
        let request = self.shared.pipeline_request();
        if request.generation == self.generation {
            return;
        }

        // Drop first: two pipelines never coexist
        self.processor = None;
        self.processor = BasebandProcessor::for_mode(request.mode);
        self.mode = request.mode;
        self.generation = request.generation;

        #[cfg(feature = "embedded")]
        defmt::info!("baseband: pipeline {}", request.mode);
    }

    fn apply_fsk_configuration(&mut self) {
        while let Some(configuration) = self.shared.fsk_configuration.dequeue() {
            match self.processor.as_mut().and_then(BasebandProcessor::as_fsk_mut) {
                Some(fsk) => fsk.configure(&configuration),
                None => {
                    #[cfg(feature = "embedded")]
                    defmt::warn!("baseband: FSK configuration without FSK pipeline");
                }
            }
        }
    }
}
