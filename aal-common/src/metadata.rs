//! Track metadata attached to loaded audio.

use serde::{Deserialize, Serialize};

use crate::encoding;

/// Capacity bound for a single normalized metadata field, in bytes.
const MAX_FIELD_LEN: usize = 256;

/// Free-form metadata record carried by a playback channel.
///
/// Fields are plain UTF-8 strings. Raw bytes from tag readers go through
/// the `set_*_raw` methods, which run the encoding detector and transcode
/// legacy-codepage or UTF-16 input before storing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Track title.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Album name.
    pub album: String,
    /// Free-form comment.
    pub comment: String,
    /// Whether cover art accompanies the track.
    pub has_cover: bool,
}

impl TrackMetadata {
    /// Empty record: all fields blank, no cover.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw title, normalizing it to UTF-8.
    pub fn set_title_raw(&mut self, raw: &[u8]) {
        self.title = encoding::sanitize(raw, MAX_FIELD_LEN);
    }

    /// Store a raw artist name, normalizing it to UTF-8.
    pub fn set_artist_raw(&mut self, raw: &[u8]) {
        self.artist = encoding::sanitize(raw, MAX_FIELD_LEN);
    }

    /// Store a raw album name, normalizing it to UTF-8.
    pub fn set_album_raw(&mut self, raw: &[u8]) {
        self.album = encoding::sanitize(raw, MAX_FIELD_LEN);
    }

    /// Store a raw comment, normalizing it to UTF-8.
    pub fn set_comment_raw(&mut self, raw: &[u8]) {
        self.comment = encoding::sanitize(raw, MAX_FIELD_LEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank() {
        let meta = TrackMetadata::new();
        assert!(meta.title.is_empty());
        assert!(meta.artist.is_empty());
        assert!(!meta.has_cover);
    }

    #[test]
    fn test_set_raw_normalizes_cp1251() {
        let mut meta = TrackMetadata::new();
        meta.set_title_raw(&[0xCF, 0xE5, 0xF1, 0xED, 0xFF]); // "Песня" in CP1251
        assert_eq!(meta.title, "Песня");
    }

    #[test]
    fn test_set_raw_passes_utf8_through() {
        let mut meta = TrackMetadata::new();
        meta.set_artist_raw("Аквариум".as_bytes());
        assert_eq!(meta.artist, "Аквариум");
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut meta = TrackMetadata::new();
        meta.set_album_raw(b"Blue Album");
        meta.has_cover = true;

        let json = serde_json::to_string(&meta).unwrap();
        let back: TrackMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
