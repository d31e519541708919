//! Composite voice benchmarks.
//!
//! These model how the player drives a voice: a patch of a few oscillators
//! rendered block by block while the envelope moves.

mod composite;

pub use composite::{bench_composite, bench_shared};
