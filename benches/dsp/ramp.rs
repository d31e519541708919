//! Benchmarks for the linear ramp.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use touch_synth::dsp::Ramp;

use crate::BLOCK_SIZES;

pub fn bench_ramp(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/ramp");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Per-sample glide, as used for portamento
        group.bench_with_input(BenchmarkId::new("glide", size), &size, |b, _| {
            b.iter(|| {
                let mut ramp = Ramp::new(220.0, 440.0).with_step(220.0 / size as f32);
                for s in buffer.iter_mut() {
                    *s = ramp.advance();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
