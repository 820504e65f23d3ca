//! Error types for the WAV playback engine.
//!
//! Every condition is a typed status returned to the immediate caller;
//! nothing here is process-fatal. Non-fatal fill outcomes (silence for a
//! paused channel, unsupported bit depth) are *not* errors; they are
//! reported through [`crate::types::FillStatus`].

use thiserror::Error;

/// Main error type for the WAV engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Channel index outside the fixed slot table.
    #[error("invalid channel index {0} (valid range is 0..32)")]
    InvalidChannel(usize),

    /// Operation on a channel with nothing loaded.
    #[error("channel {0} has no audio loaded")]
    UninitializedChannel(usize),

    /// Malformed RIFF/WAVE structure.
    #[error("invalid WAV file: {0}")]
    InvalidFile(String),

    /// fmt chunk carries a compression code other than uncompressed PCM.
    #[error("unsupported compression code {0} (only uncompressed PCM is supported)")]
    UnsupportedCompression(u16),

    /// Buffer allocation failed.
    #[error("out of memory allocating {0} bytes")]
    OutOfMemory(usize),

    /// Seek target lies beyond the end of the data region.
    #[error("seek time {0}s is past the end of the audio data")]
    InvalidSeekTime(u32),

    /// I/O failure on the backing source.
    #[error("backing source I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using the engine Error.
pub type Result<T> = std::result::Result<T, Error>;
