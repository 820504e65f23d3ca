//! WAV fixture generation utilities.
//!
//! Generates deterministic 16-bit PCM files with known characteristics so
//! tests can assert on exact engine output: constant-value audio for
//! amplitude checks and sine waves for "actually audible" checks.

use std::f32::consts::PI;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

/// Write a WAV whose every sample is `value`.
///
/// Constant audio makes gain and resampling assertions exact: a fill from
/// this file must contain only `value` (scaled) or silence.
pub fn write_constant_wav<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    channels: u16,
    frames: usize,
    value: i16,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for _ in 0..frames * channels as usize {
        writer.write_sample(value)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Write a stereo sine wave WAV.
pub fn write_sine_wav<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    duration_ms: u64,
    frequency_hz: f32,
    amplitude: f32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    let total_frames = (u64::from(sample_rate) * duration_ms) / 1000;
    let peak = amplitude * f32::from(i16::MAX);

    for frame_idx in 0..total_frames {
        let t = frame_idx as f32 / sample_rate as f32;
        let sample = ((2.0 * PI * frequency_hz * t).sin() * peak) as i16;
        writer.write_sample(sample)?;
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
