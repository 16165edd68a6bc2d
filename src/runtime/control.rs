//! Reconfiguration handlers
//!
//! Run on the dispatcher. The baseband configuration handler decides which
//! pipeline should run and drives the RF switches; the sample thread does
//! the actual swap. Entering FSK installs the FSK configuration handler and
//! leaving FSK removes it.

use core::sync::atomic::Ordering;

use crate::hal::RfControl;
use crate::message::HandlerMap;
use crate::protocol::{BasebandConfiguration, Message, MessageId};
use crate::shared::SharedMemory;
use crate::types::Mode;

/// Dispatcher-side state of the baseband core
pub struct Controller<'a, R: RfControl> {
    shared: &'a SharedMemory,
    rf: R,
    configuration: BasebandConfiguration,
}

impl<'a, R: RfControl> Controller<'a, R> {
    /// Idle controller: mode off
    #[must_use]
    pub fn new(shared: &'a SharedMemory, rf: R) -> Self {
        Self {
            shared,
            rf,
            configuration: BasebandConfiguration {
                mode: Mode::Off,
                sampling_rate: shared.sampling_rate.load(Ordering::Relaxed),
            },
        }
    }

    /// Last applied configuration
    #[must_use]
    pub const fn configuration(&self) -> BasebandConfiguration {
        self.configuration
    }

    /// RF switches
    #[must_use]
    pub const fn rf(&self) -> &R {
        &self.rf
    }
}

/// Install the handlers present from startup
pub fn install_handlers<R: RfControl>(handlers: &mut HandlerMap<Controller<'_, R>>) {
    handlers.register(MessageId::BasebandConfiguration, handle_baseband_configuration::<R>);
}

/// Switch pipelines when the mode changes and record the configuration
pub fn handle_baseband_configuration<'a, R: RfControl>(
    controller: &mut Controller<'a, R>,
    handlers: &mut HandlerMap<Controller<'a, R>>,
    message: &Message,
) {
    let Message::BasebandConfiguration(configuration) = message else {
        return;
    };

    if configuration.mode != controller.configuration.mode {
        if controller.configuration.mode == Mode::Fsk {
            handlers.unregister(MessageId::FskConfiguration);
            // Parameters for the FSK session being left must not reach the next one
            while controller.shared.fsk_configuration.dequeue().is_some() {}
        }

        controller.shared.request_mode(configuration.mode);

        if configuration.mode == Mode::Fsk {
            handlers.register(MessageId::FskConfiguration, handle_fsk_configuration::<R>);
        }

        if configuration.mode.has_pipeline() {
            controller.rf.rssi_start();
            controller.rf.baseband_dma_enable();
        } else {
            controller.rf.baseband_dma_disable();
            controller.rf.rssi_stop();
        }

        #[cfg(feature = "embedded")]
        defmt::info!(
            "control: {} -> {}",
            controller.configuration.mode,
            configuration.mode
        );
    }

    controller
        .shared
        .sampling_rate
        .store(configuration.sampling_rate, Ordering::Relaxed);
    controller.configuration = *configuration;
}

/// Hand FSK parameters to the sample thread
pub fn handle_fsk_configuration<'a, R: RfControl>(
    controller: &mut Controller<'a, R>,
    _handlers: &mut HandlerMap<Controller<'a, R>>,
    message: &Message,
) {
    let Message::FskConfiguration(configuration) = message else {
        return;
    };

    if controller
        .shared
        .fsk_configuration
        .enqueue(*configuration)
        .is_err()
    {
        #[cfg(feature = "embedded")]
        defmt::warn!("control: FSK configuration dropped, lane full");
    }
}
