//! One playback channel: residency resources, cursor state machine, and the
//! fill hot path.
//!
//! A slot exists only while audio is loaded; the engine models the
//! uninitialized state as the absence of a slot. All methods here assume the
//! engine has already validated the channel index.

use std::io::{Read, Seek, SeekFrom};

use aal_common::TrackMetadata;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::riff::WavHeader;
use crate::source::ByteSource;
use crate::types::{FillStatus, Residency, StopReason, REFERENCE_SAMPLE_RATE};

/// Streaming scratch sizing: native bytes backing ~1024 output frames.
const STREAM_CHUNK_FRAMES: usize = 1024;

/// Active residency resource. Exactly one variant is held per loaded slot.
enum Backing {
    /// Entire data chunk in memory; the source handle was released at load.
    Resident(Vec<u8>),
    /// Open source positioned inside the data region, plus the rolling
    /// buffer each fill reads into.
    Streaming {
        source: Box<dyn ByteSource>,
        scratch: Vec<u8>,
    },
}

/// State of one loaded playback channel.
pub(crate) struct ChannelSlot {
    backing: Backing,
    /// Length of the PCM data region in bytes.
    data_len: usize,
    /// Absolute offset of the data region in the container.
    data_offset: u64,
    /// Read position within the data region, in bytes.
    cursor: usize,
    /// Significant bytes per sample (1 or 2 for playable audio).
    sig_bytes: u16,
    /// Native channel count.
    channels: u16,
    /// Native sample rate in Hz.
    sample_rate: u32,
    /// Native bytes per second, used for time-based seeks.
    byte_rate: u32,
    paused: bool,
    autoloop: bool,
    stop_reason: StopReason,
    pub(crate) metadata: TrackMetadata,
}

impl ChannelSlot {
    /// Arm a slot from a parsed header and its backing source.
    ///
    /// Resident loads read the whole data chunk and drop the source;
    /// streaming loads keep it open at the start of the data payload. Any
    /// failure releases everything acquired so far before returning.
    pub(crate) fn open(
        header: WavHeader,
        mut source: Box<dyn ByteSource>,
        residency: Residency,
    ) -> Result<Self> {
        let data_len = header.data_len as usize;

        let backing = match residency {
            Residency::Resident => {
                let mut data = Vec::new();
                data.try_reserve_exact(data_len)
                    .map_err(|_| Error::OutOfMemory(data_len))?;
                data.resize(data_len, 0);
                source.seek(SeekFrom::Start(header.data_offset))?;
                source.read_exact(&mut data)?;
                // Source handle released here; the slot owns only the buffer.
                Backing::Resident(data)
            }
            Residency::Streaming => {
                let chunk_len = STREAM_CHUNK_FRAMES
                    * usize::from(header.sig_bytes)
                    * usize::from(header.channels)
                    * header.sample_rate as usize
                    / REFERENCE_SAMPLE_RATE as usize;
                let mut scratch = Vec::new();
                scratch
                    .try_reserve_exact(chunk_len)
                    .map_err(|_| Error::OutOfMemory(chunk_len))?;
                source.seek(SeekFrom::Start(header.data_offset))?;
                Backing::Streaming { source, scratch }
            }
        };

        Ok(Self {
            backing,
            data_len,
            data_offset: header.data_offset,
            cursor: 0,
            sig_bytes: header.sig_bytes,
            channels: header.channels,
            sample_rate: header.sample_rate,
            byte_rate: header.byte_rate,
            paused: true,
            autoloop: false,
            stop_reason: StopReason::JustLoaded,
            metadata: TrackMetadata::new(),
        })
    }

    /// Resume (or start) playback from the current cursor.
    pub(crate) fn play(&mut self) {
        self.paused = false;
        self.stop_reason = StopReason::NotStopped;
    }

    /// Halt playback and rewind to the start of the data region.
    pub(crate) fn stop(&mut self) -> Result<()> {
        self.rewind()?;
        self.paused = true;
        self.stop_reason = StopReason::OnRequest;
        Ok(())
    }

    /// Toggle the pause flag.
    ///
    /// The stop reason becomes `NotStopped` on both edges of the toggle; a
    /// paused channel never reports a dedicated paused reason.
    pub(crate) fn pause(&mut self) {
        self.paused = !self.paused;
        self.stop_reason = StopReason::NotStopped;
    }

    /// Move the cursor to `seconds` of elapsed audio.
    ///
    /// A target past the data region is rejected and the cursor is left
    /// unchanged. Streaming slots also reposition the backing source.
    pub(crate) fn seek(&mut self, seconds: u32) -> Result<()> {
        let target = seconds as usize * self.byte_rate as usize;
        if target > self.data_len {
            return Err(Error::InvalidSeekTime(seconds));
        }
        self.cursor = target;
        if let Backing::Streaming { source, .. } = &mut self.backing {
            source.seek(SeekFrom::Start(self.data_offset + target as u64))?;
        }
        Ok(())
    }

    /// Rewind to the start of the data region.
    pub(crate) fn rewind(&mut self) -> Result<()> {
        self.seek(0)
    }

    pub(crate) fn set_autoloop(&mut self, autoloop: bool) {
        self.autoloop = autoloop;
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }

    /// Produce `out.len() / 2` interleaved stereo frames at the reference
    /// rate, gain-scaled, advancing the cursor by the native bytes consumed.
    ///
    /// The output buffer is always fully written: audio on success, zeros
    /// for every warning path. Resampling is plain integer index scaling,
    /// nearest-neighbor with no interpolation.
    pub(crate) fn fill(&mut self, out: &mut [i16], gain: f32) -> Result<FillStatus> {
        if self.paused || self.stop_reason == StopReason::EndOfStream {
            out.fill(0);
            return Ok(FillStatus::Paused);
        }

        let frames = out.len() / 2;
        let rate = self.sample_rate as usize;
        let reference = REFERENCE_SAMPLE_RATE as usize;

        // Native bytes consumed by this call; the rate ratio here is the
        // entire resampling mechanism.
        let real_len = frames
            * usize::from(self.sig_bytes)
            * usize::from(self.channels)
            * rate
            / reference;

        // Per-frame index flooring can reach one native frame past the
        // floored byte total, so bounds checks and streaming reads cover the
        // span the conversion loop actually touches. The cursor still
        // advances by `real_len` only.
        let frame_bytes = usize::from(self.sig_bytes) * usize::from(self.channels);
        let touched_len = match frames {
            0 => 0,
            n => frame_bytes * ((n - 1) * rate / reference + 1),
        };
        let needed = real_len.max(touched_len);

        // End of data: rewind, then either retry once (autoloop) or park the
        // channel at end-of-stream and hand back one silence-filled call.
        let mut retried = false;
        while self.cursor + needed >= self.data_len {
            self.rewind()?;
            if !self.autoloop || retried {
                self.paused = true;
                self.stop_reason = StopReason::EndOfStream;
                out.fill(0);
                debug!(autoloop = self.autoloop, "channel reached end of stream");
                return Ok(FillStatus::Filled);
            }
            retried = true;
        }

        if self.sig_bytes != 1 && self.sig_bytes != 2 {
            out.fill(0);
            warn!(sig_bytes = self.sig_bytes, "invalid bit depth, emitting silence");
            return Ok(FillStatus::InvalidFormat);
        }

        // Resident slots index the full image at the absolute cursor;
        // streaming slots first pull the touched span of fresh bytes and
        // index from the start of the scratch buffer.
        let cursor = self.cursor;
        let (data, base): (&[u8], usize) = match &mut self.backing {
            Backing::Resident(data) => (data.as_slice(), cursor),
            Backing::Streaming { source, scratch } => {
                if scratch.capacity() < needed {
                    let extra = needed - scratch.len();
                    scratch
                        .try_reserve_exact(extra)
                        .map_err(|_| Error::OutOfMemory(needed))?;
                }
                scratch.resize(needed, 0);
                source.read_exact(&mut scratch[..needed])?;
                // Leave the source at the consumed position, not the read
                // position, so the next fill starts where the cursor says.
                if needed > real_len {
                    source.seek(SeekFrom::Current(real_len as i64 - needed as i64))?;
                }
                (scratch.as_slice(), 0)
            }
        };

        let channels = usize::from(self.channels);
        let right_step = usize::from(self.channels > 1);

        match self.sig_bytes {
            1 => {
                for i in 0..frames {
                    let index = channels * (i * rate / reference) + base;
                    out[2 * i] = scale(i16::from(data[index] as i8) << 8, gain);
                    out[2 * i + 1] = scale(i16::from(data[index + right_step] as i8) << 8, gain);
                }
            }
            2 => {
                for i in 0..frames {
                    let index = channels * (i * rate / reference) + base / 2;
                    out[2 * i] = scale(sample_at(data, index), gain);
                    out[2 * i + 1] = scale(sample_at(data, index + right_step), gain);
                }
            }
            _ => unreachable!("bit depth validated above"),
        }

        self.cursor += real_len;
        Ok(FillStatus::Filled)
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }
}

/// Native little-endian 16-bit sample at a sample (not byte) index.
#[inline]
fn sample_at(data: &[u8], index: usize) -> i16 {
    let byte = 2 * index;
    i16::from_le_bytes([data[byte], data[byte + 1]])
}

/// Gain scaling: multiply in f32, truncate to 16 bits. Overflow wraps
/// instead of clamping; that is accepted engine behavior.
#[inline]
fn scale(sample: i16, gain: f32) -> i16 {
    (f32::from(sample) * gain) as i32 as i16
}
