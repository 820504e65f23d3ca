//! RIFF/WAVE container parsing.
//!
//! A RIFF file opens with a 12-byte preamble (form tag, overall size,
//! format tag) followed by a sequence of tagged sub-chunks, each an 8-byte
//! header (4-byte ASCII tag + little-endian 32-bit size) and a payload
//! padded to an even length. The parser scans for chunks by tag, so the
//! fmt and data chunks are found regardless of what other chunks surround
//! them.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::trace;

use crate::error::{Error, Result};

const FORM_TAG: &[u8; 4] = b"RIFF";
const FORMAT_TAG: &[u8; 4] = b"WAVE";
const FMT_TAG: &[u8; 4] = b"fmt ";
const DATA_TAG: &[u8; 4] = b"data";

/// Byte offset of the first sub-chunk, just past the 12-byte preamble.
const FIRST_CHUNK_OFFSET: u64 = 12;

/// Location of a chunk payload inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLocation {
    /// Declared payload size in bytes (unpadded).
    pub size: u32,
    /// Absolute offset of the first payload byte.
    pub offset: u64,
}

/// Parsed WAV header: format descriptor plus the data region location.
#[derive(Debug, Clone, Copy)]
pub struct WavHeader {
    /// Native channel count (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Native sample rate in Hz.
    pub sample_rate: u32,
    /// Native bytes per second of audio.
    pub byte_rate: u32,
    /// Significant bytes per sample (bits per sample / 8).
    pub sig_bytes: u16,
    /// Length of the raw PCM payload in bytes.
    pub data_len: u32,
    /// Absolute offset of the first PCM byte.
    pub data_offset: u64,
}

/// Scan the chunk sequence for `tag`.
///
/// Starts at the first sub-chunk and skips unrecognized chunks, honoring
/// the one pad byte after odd-sized payloads. Returns `None` when the tag
/// is not present; a short read or failed seek ends the scan the same way.
pub fn find_chunk<R: Read + Seek>(reader: &mut R, tag: &[u8; 4]) -> Option<ChunkLocation> {
    let mut pos = FIRST_CHUNK_OFFSET;
    loop {
        if reader.seek(SeekFrom::Start(pos)).ok()? != pos {
            return None;
        }
        let mut chunk_tag = [0u8; 4];
        reader.read_exact(&mut chunk_tag).ok()?;
        let size = reader.read_u32::<LittleEndian>().ok()?;

        if &chunk_tag == tag {
            trace!(
                tag = %String::from_utf8_lossy(tag),
                size,
                offset = pos + 8,
                "located chunk"
            );
            return Some(ChunkLocation { size, offset: pos + 8 });
        }

        // Next chunk header, word-aligned: odd payloads carry one pad byte.
        pos += 8 + u64::from(size) + u64::from(size & 1);
    }
}

/// Validate the RIFF/WAVE preamble and parse the fmt and data chunks.
///
/// Rejects non-RIFF input, non-WAVE forms, and any compression code other
/// than 0 or 1 (uncompressed PCM). The block-align field is read and
/// ignored.
pub fn read_header<R: Read + Seek>(reader: &mut R) -> Result<WavHeader> {
    reader.seek(SeekFrom::Start(0))?;

    let mut tag = [0u8; 4];
    read_header_bytes(reader, &mut tag)?;
    if &tag != FORM_TAG {
        return Err(Error::InvalidFile("missing RIFF form tag".into()));
    }
    let _overall_size = reader
        .read_u32::<LittleEndian>()
        .map_err(|_| truncated())?;
    read_header_bytes(reader, &mut tag)?;
    if &tag != FORMAT_TAG {
        return Err(Error::InvalidFile("missing WAVE format tag".into()));
    }

    let fmt = find_chunk(reader, FMT_TAG)
        .ok_or_else(|| Error::InvalidFile("fmt chunk not found".into()))?;
    reader.seek(SeekFrom::Start(fmt.offset))?;

    let compression = reader.read_u16::<LittleEndian>().map_err(|_| truncated())?;
    if compression != 0 && compression != 1 {
        return Err(Error::UnsupportedCompression(compression));
    }
    let channels = reader.read_u16::<LittleEndian>().map_err(|_| truncated())?;
    let sample_rate = reader.read_u32::<LittleEndian>().map_err(|_| truncated())?;
    let byte_rate = reader.read_u32::<LittleEndian>().map_err(|_| truncated())?;
    let _block_align = reader.read_u16::<LittleEndian>().map_err(|_| truncated())?;
    let bits_per_sample = reader.read_u16::<LittleEndian>().map_err(|_| truncated())?;

    let data = find_chunk(reader, DATA_TAG)
        .ok_or_else(|| Error::InvalidFile("data chunk not found".into()))?;

    Ok(WavHeader {
        channels,
        sample_rate,
        byte_rate,
        sig_bytes: bits_per_sample / 8,
        data_len: data.size,
        data_offset: data.offset,
    })
}

fn read_header_bytes<R: Read>(reader: &mut R, buf: &mut [u8; 4]) -> Result<()> {
    reader.read_exact(buf).map_err(|_| truncated())
}

fn truncated() -> Error {
    Error::InvalidFile("truncated header".into())
}
