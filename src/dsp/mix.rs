//! Additive mixing primitives.

/*
Signal Summing
==============

A composite voice combines its children by ADDING them. Addition is
commutative, so the order in which children are rendered never changes the
mixed signal.

    Child A:  [ 0.5,  0.2, -0.1]
    Child B:  [ 0.1, -0.4,  0.3]
    Sum:      [ 0.6, -0.2,  0.2]

The mixed block is then scaled by a gain (master amplitude times the current
envelope level) and added into the output buffer that other voices share:

    out[i] += gain × mixed[i]

Clipping Risk
-------------

Summing N children that each peak at 1.0 can reach N. Nothing here clamps;
the limiter runs on the shared buffer before the next voice adds into it.
*/

/// Add signal B into signal A in-place (summing).
///
/// ⚠️ WARNING: Can exceed [-1.0, +1.0] range!
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}

/// Add `gain × src` into `out`.
#[inline]
pub fn add_scaled(out: &mut [f32], src: &[f32], gain: f32) {
    debug_assert_eq!(out.len(), src.len());

    for (o, &s) in out.iter_mut().zip(src.iter()) {
        *o += gain * s;
    }
}

/// True if any sample is non-zero.
#[inline]
pub fn is_audible(buffer: &[f32]) -> bool {
    buffer.iter().any(|&s| s != 0.0)
}
