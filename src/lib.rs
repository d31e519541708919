pub mod dsp;
pub mod patch; // Serializable voice descriptors
pub mod synth; // Control/audio thread plumbing
pub mod voice; // Voice contract, composite mixing and envelope

pub use voice::{composite::CompositeVoice, envelope::EnvelopeState, Voice, VoiceId};

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Nominal full-scale amplitude. The limiter clamps to it; gains are not
/// clamped against it.
pub const MAX_AMPLITUDE: f32 = 1.0;
