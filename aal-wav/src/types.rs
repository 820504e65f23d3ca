//! Core playback types shared across the engine.

use serde::{Deserialize, Serialize};

/// Number of independent playback channels in the engine.
pub const CHANNEL_COUNT: usize = 32;

/// Reference output sample rate: every fill produces frames at this rate.
pub const REFERENCE_SAMPLE_RATE: u32 = 44_100;

/// Why a channel is currently not producing audio.
///
/// A paused channel always reports [`StopReason::NotStopped`]; there is no
/// dedicated "paused" reason. That asymmetry is long-standing engine
/// behavior that callers depend on, so it is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Channel is playing, or was paused mid-stream.
    NotStopped,
    /// An explicit stop call rewound the channel.
    OnRequest,
    /// Playback ran off the end of the data region without autoloop.
    EndOfStream,
    /// Freshly loaded, not yet played.
    JustLoaded,
    /// Channel resources were released.
    Unloaded,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::NotStopped => write!(f, "not stopped"),
            StopReason::OnRequest => write!(f, "on request"),
            StopReason::EndOfStream => write!(f, "end of stream"),
            StopReason::JustLoaded => write!(f, "just loaded"),
            StopReason::Unloaded => write!(f, "unloaded"),
        }
    }
}

/// Where a channel's audio data lives for the lifetime of the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Residency {
    /// The entire data chunk is read into memory at load time and the
    /// backing source is released.
    Resident,
    /// The backing source stays open; each fill performs one blocking read
    /// into a small rolling buffer.
    Streaming,
}

/// Outcome of a single fill call. Non-`Filled` variants are warnings, not
/// failures: the output buffer is zero-filled and the caller keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStatus {
    /// The output buffer was written (audio, or the one silence-filled call
    /// that marks an end-of-stream crossing).
    Filled,
    /// Channel paused, uninitialized, or already stopped at end of stream;
    /// output zero-filled.
    Paused,
    /// The channel's bit depth is not 8 or 16; output zero-filled.
    InvalidFormat,
}
