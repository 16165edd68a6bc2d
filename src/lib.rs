//! SDR Baseband Core Library
//!
//! Real-time signal processing for a software-defined-radio handheld: raw
//! 8-bit I/Q in, demodulated audio or decoded FSK packets out, with
//! statistics and spectrum snapshots flowing to a separate control core.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        CONTROL CORE                           │
//! │   BasebandConfiguration / FskConfiguration ▲ statistics,      │
//! │                                            │ spectrum, packets│
//! ├──────────────── baseband_queue ────────────┼─ application_queue
//! │                      DISPATCHER            │                  │
//! │  HandlerMap  │  Controller  │  FFT         │                  │
//! ├──────────────────────────────────────────────────────────────┤
//! │              SAMPLE THREAD        │      RSSI THREAD          │
//! │  BasebandProcessor (AM/NBFM/      │  RssiStatisticsCollector  │
//! │  WBFM/FSK), load statistics       │                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │                   DSP / PACKET PRIMITIVES                     │
//! │  CIC / FIR decimators │ biquad │ AM / FM │ clock recovery     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **No allocation, no locks on the sample path**: fixed buffers, atomics
//! - **Drop, never block**: one in-flight message per kind, extras discarded
//! - **Single owner per state**: the sample thread alone touches the pipeline
//! - **No unsafe**: all cross-thread state is atomics and lock-free queues

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_sync;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Board Abstraction
///
/// Traits for the audio sink, RF switches and tick counters, plus the
/// embassy-backed implementations on the target.
pub mod hal;

/// Digital Signal Processing
///
/// Decimators, filters, demodulators and the spectrum FFT.
pub mod dsp;

/// Statistics Collectors
///
/// Windowed load, RSSI, channel and audio power summaries.
pub mod stats;

/// FSK Symbol and Packet Decoding
///
/// Clock recovery, access-code correlation, packet assembly.
pub mod packet;

/// Demodulator Pipelines
///
/// The four processor variants behind one dispatch function.
pub mod baseband;

/// Inter-core Messages
///
/// Message kinds and the records they carry.
pub mod protocol;

/// Message Infrastructure
///
/// Pool flags, queues, event flags and handler dispatch.
pub mod message;

/// Shared context of the baseband core
pub mod shared;

/// Sample thread, RSSI thread and reconfiguration handlers
pub mod runtime;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
