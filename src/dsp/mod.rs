//! Low-level DSP primitives used by the voices.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! call from inside an audio callback. They stay focused on the signal math so
//! the voice layer can handle playback state and composition.

/// Buffer saturation applied before voices mix into a shared buffer.
pub mod limiter;
/// Additive mixing helpers.
pub mod mix;
/// Oscillator waveforms with phase accumulation.
pub mod oscillator;
/// Linear interpolator used for envelopes and portamento.
pub mod ramp;

pub use ramp::Ramp;
