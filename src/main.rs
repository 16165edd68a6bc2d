//! SDR Baseband Firmware
//!
//! Entry point for the STM32G474 baseband core. Spawns the sample and RSSI
//! tasks and runs the event dispatcher on the main task.

#![no_std]
#![no_main]

use core::sync::atomic::Ordering;

use defmt::info;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use sdr_baseband::hal::board::{BoardAudio, LoadMeter};
use sdr_baseband::hal::dma::{BASEBAND_BLOCKS, RF_SWITCHES, RSSI_BLOCKS};
use sdr_baseband::hal::RfSwitches;
use sdr_baseband::message::EventDispatcher;
use sdr_baseband::prelude::*;
use sdr_baseband::runtime::{install_handlers, BasebandThread, Controller, RssiThread};
use sdr_baseband::shared::SharedMemory;

type BoardController = Controller<'static, &'static RfSwitches>;

static SHARED: SharedMemory = SharedMemory::new();

// Pipeline and FFT state stay out of the task futures
static BASEBAND_THREAD: StaticCell<BasebandThread<'static>> = StaticCell::new();
static DISPATCHER: StaticCell<EventDispatcher<'static, BoardController>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("SDR Baseband Firmware v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    info!("Peripherals initialized");

    // Status LED (PA5 on Nucleo boards)
    let led = Output::new(p.PA5, Level::Low, Speed::Low);

    let thread = BASEBAND_THREAD.init_with(|| BasebandThread::new(&SHARED));

    defmt::unwrap!(spawner.spawn(heartbeat_task(led)));
    defmt::unwrap!(spawner.spawn(baseband_task(thread)));
    defmt::unwrap!(spawner.spawn(rssi_task()));

    let dispatcher = DISPATCHER.init_with(|| EventDispatcher::new(&SHARED));
    install_handlers(dispatcher.handlers_mut());
    let mut controller = Controller::new(&SHARED, &RF_SWITCHES);

    info!("Tasks spawned, dispatching events");

    loop {
        let events = SHARED.events.wait().await;
        dispatcher.dispatch(events, &mut controller);
    }
}

/// Sample task: one raw transfer per iteration
#[embassy_executor::task]
async fn baseband_task(thread: &'static mut BasebandThread<'static>) {
    let mut audio = BoardAudio::new();
    let mut load = LoadMeter::new();

    loop {
        let block = BASEBAND_BLOCKS.receive().await;
        load.begin();
        let sampling_rate = SHARED.sampling_rate.load(Ordering::Relaxed);
        thread.process(Buffer::new(&block, sampling_rate), &mut audio, &load);
        load.end();
    }
}

/// RSSI task
#[embassy_executor::task]
async fn rssi_task() {
    let mut thread = RssiThread::new(&SHARED);

    loop {
        let block = RSSI_BLOCKS.receive().await;
        thread.process(Buffer::new(&block, RSSI_SAMPLING_RATE));
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    loop {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}
