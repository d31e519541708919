//! Benchmarks for signal mixing operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use touch_synth::dsp::mix;

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        // Generate test signals
        let signal_a: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let signal_b: Vec<f32> = (0..size).map(|i| (i as f32 * 0.15).cos()).collect();

        // Sum in-place
        let mut buffer_a = signal_a.clone();
        group.bench_with_input(BenchmarkId::new("sum_in_place", size), &size, |b, _| {
            b.iter(|| {
                buffer_a.copy_from_slice(&signal_a);
                mix::sum_in_place(black_box(&mut buffer_a), black_box(&signal_b));
            })
        });

        // Scaled add (the composite's output stage)
        let mut buffer_a = signal_a.clone();
        group.bench_with_input(BenchmarkId::new("add_scaled", size), &size, |b, _| {
            b.iter(|| {
                buffer_a.copy_from_slice(&signal_a);
                mix::add_scaled(black_box(&mut buffer_a), black_box(&signal_b), black_box(0.3));
            })
        });

        // Silence scan (worst case: whole buffer is silent)
        let silent = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("is_audible", size), &size, |b, _| {
            b.iter(|| black_box(mix::is_audible(black_box(&silent))))
        });
    }

    group.finish();
}
