//! Shared helpers for engine integration tests.

pub mod audio_generator;
