//! Fixed-capacity channel table and the public control surface.
//!
//! The engine is single-threaded by design: every mutating operation takes
//! `&mut self`, so one owner drives load/control/fill for all 32 channels
//! and the borrow checker enforces per-channel serialization. There is no
//! internal locking.

use std::fs::File;
use std::path::Path;

use aal_common::TrackMetadata;
use tracing::{debug, trace};

use crate::channel::ChannelSlot;
use crate::error::{Error, Result};
use crate::riff;
use crate::source::ByteSource;
use crate::types::{FillStatus, Residency, StopReason, CHANNEL_COUNT};

/// Multi-channel WAV playback engine.
///
/// Owns a fixed table of [`CHANNEL_COUNT`] playback slots, each either empty
/// (uninitialized) or holding one loaded container. Channel indices are the
/// caller's handles; out-of-range indices fail with
/// [`Error::InvalidChannel`] and have no side effects.
pub struct WavEngine {
    slots: [Option<ChannelSlot>; CHANNEL_COUNT],
}

impl WavEngine {
    /// Create an engine with every channel uninitialized.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Load a WAV file into `channel`, replacing any previous occupant.
    pub fn load(&mut self, path: impl AsRef<Path>, channel: usize, residency: Residency) -> Result<()> {
        let path = path.as_ref();
        if channel >= CHANNEL_COUNT {
            return Err(Error::InvalidChannel(channel));
        }
        let file = File::open(path)
            .map_err(|e| Error::InvalidFile(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), channel, "loading WAV file");
        self.load_source(Box::new(file), channel, residency)
    }

    /// Load a WAV container from any backing source into `channel`.
    ///
    /// Validates the RIFF/WAVE header, then arms the slot according to the
    /// residency strategy. A failure at any stage releases everything
    /// acquired so far and leaves the slot uninitialized.
    pub fn load_source(
        &mut self,
        mut source: Box<dyn ByteSource>,
        channel: usize,
        residency: Residency,
    ) -> Result<()> {
        if channel >= CHANNEL_COUNT {
            return Err(Error::InvalidChannel(channel));
        }
        if self.slots[channel].is_some() {
            self.unload(channel)?;
        }

        let header = riff::read_header(&mut source)?;
        trace!(?header, channel, "parsed WAV header");
        let slot = ChannelSlot::open(header, source, residency)?;
        self.slots[channel] = Some(slot);
        debug!(channel, ?residency, "channel armed");
        Ok(())
    }

    /// Release `channel`'s resources and mark it uninitialized.
    pub fn unload(&mut self, channel: usize) -> Result<()> {
        if channel >= CHANNEL_COUNT {
            return Err(Error::InvalidChannel(channel));
        }
        match self.slots[channel].take() {
            // Dropping the slot closes the streaming handle or frees the
            // resident buffer.
            Some(_slot) => {
                debug!(channel, "channel unloaded");
                Ok(())
            }
            None => Err(Error::UninitializedChannel(channel)),
        }
    }

    /// Start or resume playback on `channel`.
    pub fn play(&mut self, channel: usize) -> Result<()> {
        self.slot_mut(channel)?.play();
        Ok(())
    }

    /// Stop `channel`: rewind to the start and pause with an on-request
    /// stop reason.
    pub fn stop(&mut self, channel: usize) -> Result<()> {
        self.slot_mut(channel)?.stop()
    }

    /// Toggle `channel`'s pause flag.
    pub fn pause(&mut self, channel: usize) -> Result<()> {
        self.slot_mut(channel)?.pause();
        Ok(())
    }

    /// Position `channel` at `seconds` of elapsed audio.
    pub fn seek(&mut self, seconds: u32, channel: usize) -> Result<()> {
        self.slot_mut(channel)?.seek(seconds)
    }

    /// Rewind `channel` to the start of its audio data.
    pub fn rewind(&mut self, channel: usize) -> Result<()> {
        self.slot_mut(channel)?.rewind()
    }

    /// Enable or disable end-of-data looping on `channel`.
    pub fn set_autoloop(&mut self, channel: usize, autoloop: bool) -> Result<()> {
        self.slot_mut(channel)?.set_autoloop(autoloop);
        Ok(())
    }

    /// Whether `channel` is currently paused.
    pub fn is_paused(&self, channel: usize) -> Result<bool> {
        Ok(self.slot(channel)?.is_paused())
    }

    /// Why `channel` is currently not producing audio.
    pub fn stop_reason(&self, channel: usize) -> Result<StopReason> {
        Ok(self.slot(channel)?.stop_reason())
    }

    /// Metadata attached to `channel`'s loaded audio.
    pub fn metadata(&self, channel: usize) -> Result<&TrackMetadata> {
        Ok(&self.slot(channel)?.metadata)
    }

    /// Mutable metadata access, for tag readers populating fields after
    /// load.
    pub fn metadata_mut(&mut self, channel: usize) -> Result<&mut TrackMetadata> {
        Ok(&mut self.slot_mut(channel)?.metadata)
    }

    /// Produce `out.len() / 2` interleaved stereo frames from `channel` at
    /// the reference rate, scaled by `gain`.
    ///
    /// An invalid channel index is the only hard error. A paused,
    /// uninitialized, or end-of-stream channel zero-fills `out` and reports
    /// [`FillStatus::Paused`]; callers treat that as silence, not failure.
    pub fn fill(&mut self, out: &mut [i16], gain: f32, channel: usize) -> Result<FillStatus> {
        match self.slots.get_mut(channel) {
            None => Err(Error::InvalidChannel(channel)),
            Some(None) => {
                out.fill(0);
                Ok(FillStatus::Paused)
            }
            Some(Some(slot)) => slot.fill(out, gain),
        }
    }

    fn slot(&self, channel: usize) -> Result<&ChannelSlot> {
        self.slots
            .get(channel)
            .ok_or(Error::InvalidChannel(channel))?
            .as_ref()
            .ok_or(Error::UninitializedChannel(channel))
    }

    fn slot_mut(&mut self, channel: usize) -> Result<&mut ChannelSlot> {
        self.slots
            .get_mut(channel)
            .ok_or(Error::InvalidChannel(channel))?
            .as_mut()
            .ok_or(Error::UninitializedChannel(channel))
    }
}

impl Default for WavEngine {
    fn default() -> Self {
        Self::new()
    }
}
