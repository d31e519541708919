//! Buffer limiting
//!
//! Voices that share one output buffer add into it one after another. Before a
//! composite voice adds its own contribution it saturates whatever is already
//! in the buffer, so the running sum never escapes the normalized range.
//!
//! # Transfer Function
//!
//! Hard clip at a fixed bound:
//!   f(x) = clamp(x, -LIMIT, LIMIT)
//!
//! - In-range samples pass through bit-exact, so limiting twice is the same as
//!   limiting once.
//! - NaN samples are replaced with silence. A single NaN would otherwise
//!   poison every later addition into the buffer.

/// Largest sample magnitude allowed through the mixing graph.
pub const LIMIT: f32 = crate::MAX_AMPLITUDE;

/// Clamp a single sample to `[-LIMIT, LIMIT]`.
#[inline]
pub fn limit_sample(sample: f32) -> f32 {
    if sample.is_nan() {
        0.0
    } else {
        sample.clamp(-LIMIT, LIMIT)
    }
}

/// Apply [`limit_sample`] to an entire buffer in place.
pub fn limit(buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = limit_sample(*sample);
    }
}
