//! Event dispatch
//!
//! The dispatcher owns the handler table and is the only consumer of the
//! baseband queue, so handlers may install or remove handlers (the table is
//! passed to them) without any locking.

use core::sync::atomic::Ordering;

use super::events::{EVT_MASK_BASEBAND, EVT_MASK_SPECTRUM};
use crate::dsp::spectrum::SpectrumAnalyzer;
use crate::protocol::{ChannelSpectrum, Message, MessageId};
use crate::shared::SharedMemory;

/// Message handler; receives the context, the handler table and the message
pub type Handler<C> = fn(&mut C, &mut HandlerMap<C>, &Message);

/// At most one handler per message kind
pub struct HandlerMap<C> {
    handlers: [Option<Handler<C>>; MessageId::COUNT],
}

impl<C> HandlerMap<C> {
    /// Empty table
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handlers: [None; MessageId::COUNT],
        }
    }

    /// Install `handler` for `id`, replacing any previous one
    pub fn register(&mut self, id: MessageId, handler: Handler<C>) {
        self.handlers[id.index()] = Some(handler);
    }

    /// Remove the handler for `id`
    pub fn unregister(&mut self, id: MessageId) {
        self.handlers[id.index()] = None;
    }

    /// Handler installed for `id`
    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<Handler<C>> {
        self.handlers[id.index()]
    }

    /// Whether `id` has a handler
    #[must_use]
    pub fn is_registered(&self, id: MessageId) -> bool {
        self.handlers[id.index()].is_some()
    }
}

impl<C> Default for HandlerMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer side of the baseband queue and the spectrum handoff
pub struct EventDispatcher<'a, C> {
    shared: &'a SharedMemory,
    handlers: HandlerMap<C>,
    analyzer: SpectrumAnalyzer,
}

impl<'a, C> EventDispatcher<'a, C> {
    /// Dispatcher with an empty handler table
    #[must_use]
    pub fn new(shared: &'a SharedMemory) -> Self {
        Self {
            shared,
            handlers: HandlerMap::new(),
            analyzer: SpectrumAnalyzer::new(),
        }
    }

    /// Handler table
    #[must_use]
    pub fn handlers(&self) -> &HandlerMap<C> {
        &self.handlers
    }

    /// Handler table, for installing the startup handlers
    pub fn handlers_mut(&mut self) -> &mut HandlerMap<C> {
        &mut self.handlers
    }

    /// Handle every reason set in `events`
    pub fn dispatch(&mut self, events: u32, context: &mut C) {
        if events & EVT_MASK_BASEBAND != 0 {
            self.handle_baseband_queue(context);
        }

        if events & EVT_MASK_SPECTRUM != 0 {
            self.handle_spectrum();
        }
    }

    /// Take pending events from the shared flags and handle them
    pub fn poll(&mut self, context: &mut C) {
        let events = self.shared.events.take();
        self.dispatch(events, context);
    }

    fn handle_baseband_queue(&mut self, context: &mut C) {
        while let Some(message) = self.shared.baseband_queue.pop() {
            let id = message.id();
            if let Some(handler) = self.handlers.get(id) {
                handler(context, &mut self.handlers, &message);
            }
            self.shared.baseband_queue.release(id);
        }
    }

    fn handle_spectrum(&mut self) {
        let Some(snapshot) = self.shared.spectrum.take() else {
            return;
        };

        if !self
            .shared
            .application_queue
            .is_free(MessageId::ChannelSpectrum)
        {
            return;
        }

        let mut spectrum = ChannelSpectrum {
            sampling_rate: snapshot.sampling_rate,
            channel_filter_pass_frequency: self
                .shared
                .channel_filter_pass_frequency
                .load(Ordering::Relaxed),
            channel_filter_stop_frequency: self
                .shared
                .channel_filter_stop_frequency
                .load(Ordering::Relaxed),
            ..ChannelSpectrum::default()
        };
        self.analyzer.magnitudes(&snapshot.samples, &mut spectrum.db);

        self.shared
            .application_queue
            .push(Message::ChannelSpectrum(spectrum));
    }
}
