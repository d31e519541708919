//! Benchmarks for low-level DSP primitives.

mod limiter;
mod mix;
mod oscillator;
mod ramp;

pub use limiter::bench_limiter;
pub use mix::bench_mix;
pub use oscillator::bench_oscillator;
pub use ramp::bench_ramp;
