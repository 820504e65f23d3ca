//! # AAL Common Library
//!
//! Shared code for the AAL audio engine crates:
//! - Text-encoding detection and in-place UTF-8 normalization
//! - Track metadata records (sanitized through the encoding subsystem)

pub mod encoding;
pub mod metadata;

pub use encoding::{detect, normalize_utf8, Encoding};
pub use metadata::TrackMetadata;
