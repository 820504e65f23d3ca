//! # AAL WAV Playback Engine
//!
//! Multi-channel streaming playback of linear-PCM RIFF/WAVE containers:
//! up to 32 independent channels, each loaded fully into memory or streamed
//! incrementally from its backing source, producing fixed-size interleaved
//! stereo 16-bit blocks at the 44.1 kHz reference rate with integer
//! nearest-neighbor resampling, gain scaling, looping, and explicit
//! stop-reason reporting.
//!
//! The engine is single-threaded and cooperative: one owner drives the fill
//! loop and control calls, and every mutating operation takes `&mut self`.
//! An external mixer/output stage consumes the filled buffers; this crate
//! deliberately contains no audio device I/O.

pub mod engine;
pub mod error;
pub mod riff;
pub mod source;
pub mod types;

mod channel;

pub use engine::WavEngine;
pub use error::{Error, Result};
pub use source::ByteSource;
pub use types::{FillStatus, Residency, StopReason, CHANNEL_COUNT, REFERENCE_SAMPLE_RATE};
