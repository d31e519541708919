//! Benchmarks for complete composite voices.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use touch_synth::{
    patch::{EffectsDescriptor, Patch},
    synth::SharedVoice,
    CompositeVoice, Voice,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn playing(patch: &Patch) -> CompositeVoice {
    let mut voice = patch
        .build(SAMPLE_RATE)
        .expect("benchmark patch is valid");
    voice.toggle_playback();
    voice
}

pub fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/composite");

    let plain = Patch::default();
    let expressive = Patch {
        effects: EffectsDescriptor {
            mod_rate: 6,
            mod_depth: 30,
            lag: 0.4,
        },
        ..Patch::default()
    };
    let mut bypassed = Patch::default();
    bypassed.envelope.enabled = false;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === DEFAULT PATCH ===
        // sine + saw octave under the envelope
        let mut voice = playing(&plain);
        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| {
                buffer.fill(0.0);
                voice.render(black_box(&mut buffer));
            })
        });

        // === VIBRATO + LAG ===
        // exercises the per-sample pitch path, retuning every block
        let mut voice = playing(&expressive);
        let mut up = false;
        group.bench_with_input(BenchmarkId::new("vibrato_lag", size), &size, |b, _| {
            b.iter(|| {
                up = !up;
                voice.set_frequency(if up { 330.0 } else { 220.0 });
                buffer.fill(0.0);
                voice.render(black_box(&mut buffer));
            })
        });

        // === ENVELOPE BYPASS ===
        let mut voice = playing(&bypassed);
        group.bench_with_input(BenchmarkId::new("bypassed", size), &size, |b, _| {
            b.iter(|| {
                buffer.fill(0.0);
                voice.render(black_box(&mut buffer));
            })
        });

        // === STOPPED ===
        // baseline: the early return
        let mut voice = plain.build(SAMPLE_RATE).expect("benchmark patch is valid");
        group.bench_with_input(BenchmarkId::new("stopped", size), &size, |b, _| {
            b.iter(|| voice.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}

pub fn bench_shared(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/shared");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Render through the ring buffers with a toggle queued every block
        let (mut shared, mut handle) = SharedVoice::new(playing(&Patch::default()), 64);
        group.bench_with_input(BenchmarkId::new("toggle_per_block", size), &size, |b, _| {
            b.iter(|| {
                let _ = handle.toggle_playback();
                buffer.fill(0.0);
                shared.render(black_box(&mut buffer));
                black_box(handle.latest_status());
            })
        });
    }

    group.finish();
}
