//! Fill hot-path benchmarks.
//!
//! Measures the per-call cost of producing one 1024-frame stereo block in
//! both residency modes, including the native-rate resampling path.

use std::io::Cursor;

use aal_wav::{Residency, WavEngine, REFERENCE_SAMPLE_RATE};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// In-memory 16-bit stereo WAV, five seconds of ramp audio.
fn wav_bytes(sample_rate: u32) -> Vec<u8> {
    let frames = sample_rate as usize * 5;
    let mut data = Vec::with_capacity(frames * 4);
    for i in 0..frames {
        let s = (i % 20_000) as i16;
        data.extend_from_slice(&s.to_le_bytes());
        data.extend_from_slice(&s.to_le_bytes());
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&((36 + data.len()) as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 4).to_le_bytes());
    out.extend_from_slice(&4u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&data);
    out
}

fn loaded_engine(sample_rate: u32, residency: Residency) -> WavEngine {
    let mut engine = WavEngine::new();
    engine
        .load_source(Box::new(Cursor::new(wav_bytes(sample_rate))), 0, residency)
        .unwrap();
    engine.set_autoloop(0, true).unwrap();
    engine.play(0).unwrap();
    engine
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_1024_frames");
    let mut out = vec![0i16; 2048];

    let mut resident = loaded_engine(REFERENCE_SAMPLE_RATE, Residency::Resident);
    group.bench_function("resident_native_rate", |b| {
        b.iter(|| {
            resident.fill(black_box(&mut out), 0.8, 0).unwrap();
        })
    });

    let mut resampled = loaded_engine(22_050, Residency::Resident);
    group.bench_function("resident_resampled", |b| {
        b.iter(|| {
            resampled.fill(black_box(&mut out), 0.8, 0).unwrap();
        })
    });

    let mut streaming = loaded_engine(REFERENCE_SAMPLE_RATE, Residency::Streaming);
    group.bench_function("streaming_native_rate", |b| {
        b.iter(|| {
            streaming.fill(black_box(&mut out), 0.8, 0).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_fill);
criterion_main!(benches);
