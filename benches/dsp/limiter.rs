//! Benchmarks for the output limiter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use touch_synth::dsp::limiter;

use crate::BLOCK_SIZES;

pub fn bench_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/limiter");

    for &size in BLOCK_SIZES {
        // Signal that overshoots the limit on every other sample
        let signal: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin() * 1.5).collect();
        let mut buffer = signal.clone();

        group.bench_with_input(BenchmarkId::new("limit", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&signal);
                limiter::limit(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
