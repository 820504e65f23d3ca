//! Abstract backing storage for streamed playback.

use std::io::{Read, Seek};

/// A byte-addressable, readable and seekable source of container data.
///
/// `std::fs::File` is the stock implementation; in-memory `Cursor`s work the
/// same way for tests and generated audio. The engine performs one blocking
/// read per streaming fill, so implementations should complete small
/// sequential reads quickly.
pub trait ByteSource: Read + Seek + Send {}

impl<T: Read + Seek + Send> ByteSource for T {}
