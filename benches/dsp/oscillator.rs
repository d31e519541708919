//! Benchmarks for the waveform generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use touch_synth::dsp::oscillator::{OscillatorBlock, Waveform};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    let waveforms = [
        ("sine", Waveform::Sine),
        ("saw", Waveform::Saw),
        ("square", Waveform::Square),
        ("triangle", Waveform::Triangle),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in waveforms {
            let mut osc = OscillatorBlock::new(waveform);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for s in buffer.iter_mut() {
                        *s = osc.next_sample(black_box(440.0), SAMPLE_RATE);
                    }
                })
            });
        }
    }

    group.finish();
}
