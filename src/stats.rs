//! Statistics Collectors
//!
//! Windowed aggregators that summarize a sample stream at a fixed interval.
//! RSSI, channel and audio collectors count samples one at a time, so one
//! report is produced per `⌈interval · rate⌉` samples no matter how the
//! stream is split into buffers. The load collector works per buffer.
//!
//! Channel and audio power share [`crate::dsp::mag_squared_to_dbv_norm`] so
//! their dB values sit on the same scale.

use crate::config::{
    window_samples, AUDIO_STATS_INTERVAL_MS, BASEBAND_STATS_INTERVAL_MS, CHANNEL_STATS_INTERVAL_MS,
    RSSI_STATS_INTERVAL_MS,
};
use crate::dsp::{mag_squared_to_dbv_norm, saturate};
use crate::hal::TickSource;
use crate::protocol::{AudioStatistics, BasebandStatistics, ChannelStatistics, RssiStatistics};
use crate::types::{Buffer, Complex16};

/// RF power (RSSI) summary over raw 8-bit readings
#[derive(Clone, Copy, Debug)]
pub struct RssiStatisticsCollector {
    interval_ms: u32,
    statistics: RssiStatistics,
}

impl RssiStatisticsCollector {
    /// Collector with the default 100 ms window
    #[must_use]
    pub const fn new() -> Self {
        Self::with_interval(RSSI_STATS_INTERVAL_MS)
    }

    /// Collector with a custom window
    #[must_use]
    pub const fn with_interval(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            statistics: Self::EMPTY,
        }
    }

    const EMPTY: RssiStatistics = RssiStatistics {
        accumulator: 0,
        min: u32::MAX,
        max: 0,
        count: 0,
    };

    /// Feed a buffer; `on_statistics` runs once per completed window
    pub fn feed<F>(&mut self, buffer: Buffer<'_, u8>, mut on_statistics: F)
    where
        F: FnMut(RssiStatistics),
    {
        let window = window_samples(buffer.sampling_rate, self.interval_ms);

        for &sample in buffer.samples {
            let value = u32::from(sample);
            let s = &mut self.statistics;
            s.accumulator += value;
            s.min = s.min.min(value);
            s.max = s.max.max(value);
            s.count += 1;

            if s.count as usize >= window {
                on_statistics(*s);
                self.statistics = Self::EMPTY;
            }
        }
    }

    /// Samples accumulated toward the current window
    #[must_use]
    pub const fn pending(&self) -> u32 {
        self.statistics.count
    }
}

impl Default for RssiStatisticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Peak power of the channel-filtered baseband
#[derive(Clone, Copy, Debug)]
pub struct ChannelStatsCollector {
    interval_ms: u32,
    max_squared: u32,
    count: u32,
}

impl ChannelStatsCollector {
    /// Collector with the default 100 ms window
    #[must_use]
    pub const fn new() -> Self {
        Self::with_interval(CHANNEL_STATS_INTERVAL_MS)
    }

    /// Collector with a custom window
    #[must_use]
    pub const fn with_interval(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            max_squared: 0,
            count: 0,
        }
    }

    /// Feed a buffer; `on_statistics` runs once per completed window
    pub fn feed<F>(&mut self, buffer: Buffer<'_, Complex16>, mut on_statistics: F)
    where
        F: FnMut(ChannelStatistics),
    {
        let window = window_samples(buffer.sampling_rate, self.interval_ms);

        for &sample in buffer.samples {
            self.max_squared = self.max_squared.max(sample.magnitude_squared());
            self.count += 1;

            if self.count as usize >= window {
                on_statistics(ChannelStatistics {
                    max_db: mag_squared_to_dbv_norm(self.max_squared as f32),
                    count: self.count,
                });
                self.max_squared = 0;
                self.count = 0;
            }
        }
    }

    /// Samples accumulated toward the current window
    #[must_use]
    pub const fn pending(&self) -> u32 {
        self.count
    }
}

impl Default for ChannelStatsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// RMS and peak power of the demodulated audio
#[derive(Clone, Copy, Debug)]
pub struct AudioStatsCollector {
    interval_ms: u32,
    squared_sum: u64,
    max_squared: u32,
    count: u32,
}

impl AudioStatsCollector {
    /// Collector with the default 100 ms window
    #[must_use]
    pub const fn new() -> Self {
        Self::with_interval(AUDIO_STATS_INTERVAL_MS)
    }

    /// Collector with a custom window
    #[must_use]
    pub const fn with_interval(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            squared_sum: 0,
            max_squared: 0,
            count: 0,
        }
    }

    /// Feed a buffer; `on_statistics` runs once per completed window
    pub fn feed<F>(&mut self, buffer: Buffer<'_, i16>, mut on_statistics: F)
    where
        F: FnMut(AudioStatistics),
    {
        let window = window_samples(buffer.sampling_rate, self.interval_ms);

        for &sample in buffer.samples {
            let value = i32::from(sample);
            let squared = (value * value) as u32;
            self.squared_sum += u64::from(squared);
            self.max_squared = self.max_squared.max(squared);
            self.count += 1;

            if self.count as usize >= window {
                let mean_squared = self.squared_sum as f32 / self.count as f32;
                on_statistics(AudioStatistics {
                    rms_db: mag_squared_to_dbv_norm(mean_squared),
                    max_db: mag_squared_to_dbv_norm(self.max_squared as f32),
                    count: self.count,
                });
                self.squared_sum = 0;
                self.max_squared = 0;
                self.count = 0;
            }
        }
    }

    /// Samples accumulated toward the current window
    #[must_use]
    pub const fn pending(&self) -> u32 {
        self.count
    }
}

impl Default for AudioStatsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Baseband thread CPU load
///
/// Counts raw samples per buffer; once a report interval's worth has
/// elapsed, reports the tick deltas since the previous report together with
/// the saturation flag, which it then clears.
#[derive(Clone, Copy, Debug)]
pub struct BasebandStatsCollector {
    interval_ms: u32,
    samples: u64,
    samples_last_report: u64,
    last_idle_ticks: u32,
    last_baseband_ticks: u32,
}

impl BasebandStatsCollector {
    /// Collector with the default 1 s report interval
    #[must_use]
    pub const fn new() -> Self {
        Self::with_interval(BASEBAND_STATS_INTERVAL_MS)
    }

    /// Collector with a custom report interval
    #[must_use]
    pub const fn with_interval(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            samples: 0,
            samples_last_report: 0,
            last_idle_ticks: 0,
            last_baseband_ticks: 0,
        }
    }

    /// Account for one processed raw buffer
    pub fn process<T, F>(&mut self, buffer_len: usize, sampling_rate: u32, ticks: &T, mut on_statistics: F)
    where
        T: TickSource + ?Sized,
        F: FnMut(BasebandStatistics),
    {
        self.samples += buffer_len as u64;
        let report_samples = window_samples(sampling_rate, self.interval_ms) as u64;

        if self.samples - self.samples_last_report < report_samples {
            return;
        }

        let idle = ticks.idle_ticks();
        let baseband = ticks.baseband_ticks();
        let statistics = BasebandStatistics {
            idle_ticks: idle.wrapping_sub(self.last_idle_ticks),
            baseband_ticks: baseband.wrapping_sub(self.last_baseband_ticks),
            saturation: saturate::take(),
        };
        self.last_idle_ticks = idle;
        self.last_baseband_ticks = baseband;
        self.samples_last_report = self.samples;

        on_statistics(statistics);
    }
}

impl Default for BasebandStatsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn rssi_window_is_exact_across_buffers() {
        // 400 kHz, 100 ms -> 40_000 samples per report
        let mut collector = RssiStatisticsCollector::new();
        let block = [7u8; 400];
        let mut reports = Vec::new();
        for _ in 0..150 {
            collector.feed(Buffer::new(&block, 400_000), |s| reports.push(s));
        }
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].count, 40_000);
        assert_eq!(reports[0].min, 7);
        assert_eq!(reports[0].max, 7);
        assert_eq!(reports[0].accumulator, 280_000);
        assert_eq!(collector.pending(), 20_000);
    }

    #[test]
    fn channel_reports_peak() {
        let mut collector = ChannelStatsCollector::with_interval(1);
        let mut block = [Complex16::new(100, 0); 48];
        block[10] = Complex16::new(16384, 16384);
        let mut reports = Vec::new();
        collector.feed(Buffer::new(&block, 48_000), |s| reports.push(s));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].count, 48);
        assert!((reports[0].max_db + 6.02).abs() < 0.05);
        assert_eq!(collector.pending(), 0);
    }

    #[test]
    fn audio_silence_reports_floor() {
        let mut collector = AudioStatsCollector::with_interval(1);
        let block = [0i16; 48];
        let mut reports = Vec::new();
        collector.feed(Buffer::new(&block, 48_000), |s| reports.push(s));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].rms_db, crate::config::DB_FLOOR);
    }
}
