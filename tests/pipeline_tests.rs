//! Pipeline and Reconfiguration Tests
//!
//! These tests run on the host with std feature enabled.
//! Run with: cargo test --features std

use sdr_baseband::baseband::{BasebandProcessor, Fsk, NarrowbandAm, NarrowbandFm, WidebandFm};
use sdr_baseband::hal::{AudioSink, RfControl, TickSource};
use sdr_baseband::message::{EventDispatcher, EVT_MASK_SPECTRUM};
use sdr_baseband::protocol::{
    BasebandConfiguration, FskConfiguration, FskPacket, Message, MessageId,
};
use sdr_baseband::runtime::{install_handlers, BasebandThread, Controller, RssiThread};
use sdr_baseband::shared::SharedMemory;
use sdr_baseband::types::{Buffer, Complex8, Mode, StereoFrame};

const RAW_RATE: u32 = 3_072_000;
const FSK_RAW_RATE: u32 = 2_457_600;
const ACCESS_CODE: u64 = 0x1ACF_FC1D;
/// Payload bits of 0xD2 0xB8
const PAYLOAD: [bool; 16] = [
    true, true, false, true, false, false, true, false, //
    true, false, true, true, true, false, false, false,
];

// =============================================================================
// Test Doubles
// =============================================================================

#[derive(Default)]
struct RecordingSink {
    frames: Vec<StereoFrame>,
    muted: Option<bool>,
}

impl AudioSink for RecordingSink {
    fn write(&mut self, frames: &[StereoFrame]) {
        self.frames.extend_from_slice(frames);
    }

    fn mute(&mut self) {
        self.muted = Some(true);
    }

    fn unmute(&mut self) {
        self.muted = Some(false);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RfEvent {
    RssiStart,
    RssiStop,
    DmaEnable,
    DmaDisable,
}

#[derive(Default)]
struct RecordingRf {
    events: Vec<RfEvent>,
}

impl RfControl for RecordingRf {
    fn rssi_start(&mut self) {
        self.events.push(RfEvent::RssiStart);
    }

    fn rssi_stop(&mut self) {
        self.events.push(RfEvent::RssiStop);
    }

    fn baseband_dma_enable(&mut self) {
        self.events.push(RfEvent::DmaEnable);
    }

    fn baseband_dma_disable(&mut self) {
        self.events.push(RfEvent::DmaDisable);
    }
}

struct NoTicks;

impl TickSource for NoTicks {
    fn idle_ticks(&self) -> u32 {
        0
    }

    fn baseband_ticks(&self) -> u32 {
        0
    }
}

/// Carrier at +fs/4 frequency-modulated by a 1 kHz tone, 1.5 kHz deviation
fn fm_tone(samples: usize) -> Vec<Complex8> {
    let fs = f64::from(RAW_RATE);
    let beta = 1_500.0 / 1_000.0;
    (0..samples)
        .map(|n| {
            let n = n as f64;
            let phase = std::f64::consts::FRAC_PI_2 * n
                + beta * (2.0 * std::f64::consts::PI * 1_000.0 * n / fs).sin();
            Complex8::new(
                (100.0 * phase.cos()).round() as i8,
                (100.0 * phase.sin()).round() as i8,
            )
        })
        .collect()
}

/// Carrier at +fs/4 with a 1 kHz tone at 50% AM depth
fn am_tone(samples: usize) -> Vec<Complex8> {
    let fs = f64::from(RAW_RATE);
    (0..samples)
        .map(|n| {
            let n = n as f64;
            let envelope = 60.0 * (1.0 + 0.5 * (2.0 * std::f64::consts::PI * 1_000.0 * n / fs).cos());
            let phase = std::f64::consts::FRAC_PI_2 * n;
            Complex8::new(
                (envelope * phase.cos()).round() as i8,
                (envelope * phase.sin()).round() as i8,
            )
        })
        .collect()
}

/// Carrier at +fs/4 frequency-modulated by a 1 kHz tone at `deviation` Hz
fn fm_tone_with_deviation(samples: usize, deviation: f64) -> Vec<Complex8> {
    let fs = f64::from(RAW_RATE);
    let beta = deviation / 1_000.0;
    (0..samples)
        .map(|n| {
            let n = n as f64;
            let phase = std::f64::consts::FRAC_PI_2 * n
                + beta * (2.0 * std::f64::consts::PI * 1_000.0 * n / fs).sin();
            Complex8::new(
                (100.0 * phase.cos()).round() as i8,
                (100.0 * phase.sin()).round() as i8,
            )
        })
        .collect()
}

/// Preamble, access code, payload and a 16-symbol tail
fn fsk_symbols() -> Vec<bool> {
    let mut symbols: Vec<bool> = (0..16).map(|i| i % 2 == 1).collect();
    symbols.extend((0..32).rev().map(|i| (ACCESS_CODE >> i) & 1 != 0));
    symbols.extend_from_slice(&PAYLOAD);
    symbols.extend([false; 16]);
    symbols
}

/// Continuous-phase 2-FSK around a carrier at +fs/4; a one is +deviation
fn fsk_raw(symbols: &[bool], symbol_rate: u32, deviation: f64) -> Vec<Complex8> {
    let fs = u64::from(FSK_RAW_RATE);
    let total = symbols.len() as u64 * fs / u64::from(symbol_rate);
    let step = 2.0 * std::f64::consts::PI * deviation / f64::from(FSK_RAW_RATE);
    let mut phase = 0.0f64;
    (0..total)
        .map(|n| {
            let symbol = symbols[(n * u64::from(symbol_rate) / fs) as usize];
            let sample = Complex8::new(
                (100.0 * phase.cos()).round() as i8,
                (100.0 * phase.sin()).round() as i8,
            );
            phase += std::f64::consts::FRAC_PI_2 + if symbol { step } else { -step };
            sample
        })
        .collect()
}

fn fsk_configuration(symbol_rate: u32) -> FskConfiguration {
    FskConfiguration {
        symbol_rate,
        access_code: ACCESS_CODE,
        access_code_length: 32,
        access_code_tolerance: 2,
        packet_length: 16,
    }
}

fn packets(messages: &[Message]) -> Vec<FskPacket> {
    messages
        .iter()
        .filter_map(|m| match m {
            Message::FskPacket(p) => Some(*p),
            _ => None,
        })
        .collect()
}

fn count_of(messages: &[Message], id: MessageId) -> usize {
    messages.iter().filter(|m| m.id() == id).count()
}

fn peak(frames: &[StereoFrame]) -> i32 {
    frames
        .iter()
        .map(|f| i32::from(f.left).abs())
        .max()
        .unwrap_or(0)
}

fn drain(shared: &SharedMemory) -> Vec<Message> {
    let mut messages = Vec::new();
    while let Some(message) = shared.application_queue.pop() {
        shared.application_queue.release(message.id());
        messages.push(message);
    }
    messages
}

fn configure(shared: &SharedMemory, mode: Mode) {
    assert!(shared.send_to_baseband(Message::BasebandConfiguration(BasebandConfiguration {
        mode,
        sampling_rate: RAW_RATE,
    })));
}

// =============================================================================
// Narrowband FM End-to-End
// =============================================================================

#[test]
fn test_nbfm_tone_produces_audio_and_one_channel_report() {
    let shared = SharedMemory::new();
    let mut pipeline = NarrowbandFm::new();
    let mut sink = RecordingSink::default();
    let raw = fm_tone(150 * 2048);
    let mut blocks = raw.chunks_exact(2048);

    // 100 ms at 48 kHz is 4_800 channel samples: 150 buffers of 32
    for block in blocks.by_ref().take(149) {
        pipeline.execute(Buffer::new(block, RAW_RATE), &shared, &mut sink);
    }
    assert!(shared.application_queue.is_free(MessageId::ChannelStatistics));

    if let Some(block) = blocks.next() {
        pipeline.execute(Buffer::new(block, RAW_RATE), &shared, &mut sink);
    }

    let messages = drain(&shared);
    let channel: Vec<_> = messages
        .iter()
        .filter_map(|m| match m {
            Message::ChannelStatistics(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(channel.len(), 1);
    assert_eq!(channel[0].count, 4_800);
    assert!(channel[0].max_db > -10.0 && channel[0].max_db < 0.0, "{}", channel[0].max_db);
    assert_eq!(
        messages
            .iter()
            .filter(|m| m.id() == MessageId::AudioStatistics)
            .count(),
        1
    );

    assert_eq!(sink.frames.len(), 150 * 32);
    assert_eq!(sink.muted, Some(false));
    let peak = sink.frames[1_000..]
        .iter()
        .map(|f| i32::from(f.left).abs())
        .max()
        .unwrap_or(0);
    assert!(peak > 3_000 && peak < 12_000, "audio peak {peak}");
    assert!(sink.frames.iter().all(|f| f.left == f.right));
}

#[test]
fn test_nbfm_publishes_spectrum_with_filter_edges() {
    let shared = SharedMemory::new();
    let mut pipeline = NarrowbandFm::new();
    let mut sink = RecordingSink::default();
    let raw = fm_tone(32 * 2048);

    // 256 bins at one in four of 48 kHz needs 1_024 channel samples
    for block in raw.chunks_exact(2048) {
        pipeline.execute(Buffer::new(block, RAW_RATE), &shared, &mut sink);
    }
    assert!(shared.spectrum.is_pending());

    let mut dispatcher: EventDispatcher<'_, ()> = EventDispatcher::new(&shared);
    dispatcher.poll(&mut ());

    let spectrum = drain(&shared).into_iter().find_map(|m| match m {
        Message::ChannelSpectrum(s) => Some(s),
        _ => None,
    });
    let Some(spectrum) = spectrum else {
        panic!("no spectrum posted");
    };
    assert_eq!(spectrum.sampling_rate, 12_000);
    assert!(spectrum.channel_filter_pass_frequency.abs_diff(4_032) <= 1);
    assert!(spectrum.channel_filter_stop_frequency.abs_diff(7_488) <= 1);
    assert!(!shared.spectrum.is_pending());
}

// =============================================================================
// Narrowband AM and Wideband FM
// =============================================================================

#[test]
fn test_am_tone_produces_audio_without_carrier() {
    let shared = SharedMemory::new();
    let mut pipeline = NarrowbandAm::new();
    let mut sink = RecordingSink::default();
    let raw = am_tone(150 * 2048);

    for block in raw.chunks_exact(2048) {
        pipeline.execute(Buffer::new(block, RAW_RATE), &shared, &mut sink);
    }

    let messages = drain(&shared);
    assert_eq!(count_of(&messages, MessageId::ChannelStatistics), 1);
    assert_eq!(count_of(&messages, MessageId::AudioStatistics), 1);

    // 32 frames at 48 kHz per raw buffer
    assert_eq!(sink.frames.len(), 150 * 32);
    assert_eq!(sink.muted, Some(false));

    // Envelope swings ±3840 around the carrier; the high-pass removes the carrier
    let settled = &sink.frames[1_000..];
    let highest = settled.iter().map(|f| f.left).max().unwrap_or(0);
    let lowest = settled.iter().map(|f| f.left).min().unwrap_or(0);
    assert!(peak(settled) > 3_000 && peak(settled) < 6_000, "audio peak {}", peak(settled));
    assert!(highest > 2_000 && lowest < -2_000, "range {lowest}..{highest}");
}

#[test]
fn test_wbfm_tone_produces_audio_and_no_spectrum() {
    let shared = SharedMemory::new();
    let mut pipeline = WidebandFm::new();
    let mut sink = RecordingSink::default();
    // 15 kHz of 75 kHz deviation is a fifth of full scale
    let raw = fm_tone_with_deviation(150 * 2048, 15_000.0);

    for block in raw.chunks_exact(2048) {
        pipeline.execute(Buffer::new(block, RAW_RATE), &shared, &mut sink);
    }

    // 100 ms at 768 kHz is 76_800 channel samples: 150 buffers of 512
    let messages = drain(&shared);
    let channel: Vec<_> = messages
        .iter()
        .filter_map(|m| match m {
            Message::ChannelStatistics(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(channel.len(), 1);
    assert_eq!(channel[0].count, 76_800);
    assert_eq!(count_of(&messages, MessageId::AudioStatistics), 1);

    assert_eq!(sink.frames.len(), 150 * 32);
    assert_eq!(sink.muted, Some(false));
    let level = peak(&sink.frames[1_000..]);
    assert!(level > 5_000 && level < 8_000, "audio peak {level}");

    assert!(!shared.spectrum.is_pending());
    assert_eq!(shared.events.take() & EVT_MASK_SPECTRUM, 0);
}

// =============================================================================
// FSK End-to-End
// =============================================================================

#[test]
fn test_fsk_pipeline_decodes_packet_from_raw_rf() {
    for symbol_rate in [9_600u32, 4_800, 2_400] {
        let shared = SharedMemory::new();
        let mut pipeline = Fsk::new();
        let mut sink = RecordingSink::default();
        pipeline.configure(&fsk_configuration(symbol_rate));

        let raw = fsk_raw(&fsk_symbols(), symbol_rate, f64::from(symbol_rate) / 4.0);
        for block in raw.chunks_exact(2048) {
            pipeline.execute(Buffer::new(block, FSK_RAW_RATE), &shared, &mut sink);
        }

        let decoded = packets(&drain(&shared));
        assert_eq!(decoded.len(), 1, "{symbol_rate} Bd");
        assert_eq!(decoded[0].bits_received, 16);
        assert_eq!(decoded[0].payload[..2], [0xD2, 0xB8], "{symbol_rate} Bd");
        assert!(sink.frames.is_empty());
        assert_eq!(sink.muted, Some(true));
    }
}

// =============================================================================
// Reconfiguration
// =============================================================================

#[test]
fn test_mode_change_drives_rf_and_swaps_pipeline() {
    let shared = SharedMemory::new();
    let mut dispatcher = EventDispatcher::new(&shared);
    install_handlers(dispatcher.handlers_mut());
    let mut controller = Controller::new(&shared, RecordingRf::default());
    let mut thread = BasebandThread::new(&shared);
    let mut sink = RecordingSink::default();
    let raw = [Complex8::default(); 2048];

    configure(&shared, Mode::NbFm);
    dispatcher.poll(&mut controller);
    assert_eq!(controller.configuration().mode, Mode::NbFm);
    assert_eq!(controller.rf().events, vec![RfEvent::RssiStart, RfEvent::DmaEnable]);

    // Swap happens on the sample thread, at the next buffer
    assert_eq!(thread.mode(), Mode::Off);
    thread.process(Buffer::new(&raw, RAW_RATE), &mut sink, &NoTicks);
    assert_eq!(thread.mode(), Mode::NbFm);
    assert_eq!(thread.processor().map(BasebandProcessor::mode), Some(Mode::NbFm));

    configure(&shared, Mode::Off);
    dispatcher.poll(&mut controller);
    assert_eq!(
        controller.rf().events[2..],
        [RfEvent::DmaDisable, RfEvent::RssiStop]
    );
    thread.process(Buffer::new(&raw, RAW_RATE), &mut sink, &NoTicks);
    assert!(thread.processor().is_none());
}

#[test]
fn test_back_to_back_configurations_leave_one_pipeline() {
    let shared = SharedMemory::new();
    let mut dispatcher = EventDispatcher::new(&shared);
    install_handlers(dispatcher.handlers_mut());
    let mut controller = Controller::new(&shared, RecordingRf::default());
    let mut thread = BasebandThread::new(&shared);
    let mut sink = RecordingSink::default();
    let raw = [Complex8::default(); 2048];

    configure(&shared, Mode::Am);
    dispatcher.poll(&mut controller);
    configure(&shared, Mode::WbFm);
    dispatcher.poll(&mut controller);

    thread.process(Buffer::new(&raw, RAW_RATE), &mut sink, &NoTicks);
    assert_eq!(thread.mode(), Mode::WbFm);
    assert_eq!(thread.processor().map(BasebandProcessor::mode), Some(Mode::WbFm));
}

#[test]
fn test_same_mode_does_not_touch_rf() {
    let shared = SharedMemory::new();
    let mut dispatcher = EventDispatcher::new(&shared);
    install_handlers(dispatcher.handlers_mut());
    let mut controller = Controller::new(&shared, RecordingRf::default());

    configure(&shared, Mode::Am);
    dispatcher.poll(&mut controller);
    shared.send_to_baseband(Message::BasebandConfiguration(BasebandConfiguration {
        mode: Mode::Am,
        sampling_rate: 2_000_000,
    }));
    dispatcher.poll(&mut controller);

    assert_eq!(controller.rf().events.len(), 2);
    assert_eq!(controller.configuration().sampling_rate, 2_000_000);
}

#[test]
fn test_fsk_handler_lives_only_in_fsk_mode() {
    let shared = SharedMemory::new();
    let mut dispatcher = EventDispatcher::new(&shared);
    install_handlers(dispatcher.handlers_mut());
    let mut controller = Controller::new(&shared, RecordingRf::default());
    let mut thread = BasebandThread::new(&shared);
    let mut sink = RecordingSink::default();
    let raw = [Complex8::default(); 2048];
    let fsk = FskConfiguration {
        symbol_rate: 19_200,
        access_code: 0x2DD4,
        access_code_length: 16,
        access_code_tolerance: 1,
        packet_length: 32,
    };

    assert!(!dispatcher.handlers().is_registered(MessageId::FskConfiguration));

    configure(&shared, Mode::Fsk);
    dispatcher.poll(&mut controller);
    assert!(dispatcher.handlers().is_registered(MessageId::FskConfiguration));

    shared.send_to_baseband(Message::FskConfiguration(fsk));
    dispatcher.poll(&mut controller);
    thread.process(Buffer::new(&raw, 2_457_600), &mut sink, &NoTicks);
    assert_eq!(thread.mode(), Mode::Fsk);
    assert!(shared.fsk_configuration.dequeue().is_none());
    assert_eq!(sink.muted, Some(true));
    assert!(sink.frames.is_empty());

    configure(&shared, Mode::NbFm);
    dispatcher.poll(&mut controller);
    assert!(!dispatcher.handlers().is_registered(MessageId::FskConfiguration));

    // No handler: the configuration is released and never reaches the lane
    shared.send_to_baseband(Message::FskConfiguration(fsk));
    dispatcher.poll(&mut controller);
    assert!(shared.fsk_configuration.dequeue().is_none());
    assert!(shared.baseband_queue.is_free(MessageId::FskConfiguration));
}

#[test]
fn test_fsk_reentry_between_buffers_builds_fresh_pipeline() {
    let shared = SharedMemory::new();
    let mut dispatcher = EventDispatcher::new(&shared);
    install_handlers(dispatcher.handlers_mut());
    let mut controller = Controller::new(&shared, RecordingRf::default());
    let mut thread = BasebandThread::new(&shared);
    let mut sink = RecordingSink::default();
    let silence = [Complex8::default(); 2048];
    let raw = fsk_raw(&fsk_symbols(), 9_600, 2_400.0);

    configure(&shared, Mode::Fsk);
    dispatcher.poll(&mut controller);
    shared.send_to_baseband(Message::FskConfiguration(fsk_configuration(9_600)));
    dispatcher.poll(&mut controller);
    thread.process(Buffer::new(&silence, FSK_RAW_RATE), &mut sink, &NoTicks);

    // Away and back before the next buffer
    configure(&shared, Mode::Am);
    dispatcher.poll(&mut controller);
    configure(&shared, Mode::Fsk);
    dispatcher.poll(&mut controller);

    for block in raw.chunks_exact(2048) {
        thread.process(Buffer::new(block, FSK_RAW_RATE), &mut sink, &NoTicks);
    }
    assert_eq!(thread.mode(), Mode::Fsk);
    assert!(packets(&drain(&shared)).is_empty(), "old decoder survived the swap");

    // The new pipeline decodes once it is configured
    shared.send_to_baseband(Message::FskConfiguration(fsk_configuration(9_600)));
    dispatcher.poll(&mut controller);
    for block in raw.chunks_exact(2048) {
        thread.process(Buffer::new(block, FSK_RAW_RATE), &mut sink, &NoTicks);
    }
    let decoded = packets(&drain(&shared));
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].payload[..2], [0xD2, 0xB8]);
}

#[test]
fn test_leaving_fsk_discards_pending_configuration() {
    let shared = SharedMemory::new();
    let mut dispatcher = EventDispatcher::new(&shared);
    install_handlers(dispatcher.handlers_mut());
    let mut controller = Controller::new(&shared, RecordingRf::default());
    let mut thread = BasebandThread::new(&shared);
    let mut sink = RecordingSink::default();
    let raw = fsk_raw(&fsk_symbols(), 9_600, 2_400.0);

    // Configuration queued but never picked up by the sample thread
    configure(&shared, Mode::Fsk);
    dispatcher.poll(&mut controller);
    shared.send_to_baseband(Message::FskConfiguration(fsk_configuration(9_600)));
    dispatcher.poll(&mut controller);

    configure(&shared, Mode::Am);
    dispatcher.poll(&mut controller);
    configure(&shared, Mode::Fsk);
    dispatcher.poll(&mut controller);
    assert!(shared.fsk_configuration.dequeue().is_none());

    for block in raw.chunks_exact(2048) {
        thread.process(Buffer::new(block, FSK_RAW_RATE), &mut sink, &NoTicks);
    }
    assert!(packets(&drain(&shared)).is_empty());
}

// =============================================================================
// Statistics Threads
// =============================================================================

#[test]
fn test_idle_thread_still_reports_load() {
    let shared = SharedMemory::new();
    let mut thread = BasebandThread::new(&shared);
    let mut sink = RecordingSink::default();
    let raw = [Complex8::default(); 2048];

    // 1 s at 3.072 MHz is 1_500 buffers
    for _ in 0..1_500 {
        thread.process(Buffer::new(&raw, RAW_RATE), &mut sink, &NoTicks);
    }

    let messages = drain(&shared);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id(), MessageId::BasebandStatistics);
    assert!(sink.frames.is_empty());
}

#[test]
fn test_rssi_thread_reports_every_window() {
    let shared = SharedMemory::new();
    let mut thread = RssiThread::new(&shared);
    let block = [42u8; 400];

    // 100 ms at 400 kHz is 100 buffers of 400
    for _ in 0..100 {
        thread.process(Buffer::new(&block, 400_000));
    }

    match drain(&shared).as_slice() {
        [Message::RssiStatistics(s)] => {
            assert_eq!(s.count, 40_000);
            assert_eq!((s.min, s.max), (42, 42));
        }
        other => panic!("expected one RSSI report, got {other:?}"),
    }
}
