//! Sound sources and the contract they share.
//!
//! Every source implements [`Voice`]. Leaf voices ([`simple::SimpleOsc`])
//! generate samples directly; [`composite::CompositeVoice`] implements the same
//! trait by broadcasting parameter changes to its children and summing their
//! output under an attack/release envelope.

/// Composite voice: child mixing plus amplitude envelope.
pub mod composite;
/// Attack/release envelope state machine.
pub mod envelope;
/// Single-oscillator leaf voice.
pub mod simple;

use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_VOICE_ID: AtomicU32 = AtomicU32::new(1);

/// Identifier of a composite voice.
///
/// Children record the id of the composite that owns them. It is a label for
/// management and debugging; audio never flows through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId(u32);

impl VoiceId {
    pub(crate) fn next() -> Self {
        Self(NEXT_VOICE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Common contract for anything that produces sound.
pub trait Voice: Send {
    /// Add this voice's output into `buffer`.
    ///
    /// Returns whether non-silent output was produced. Must not allocate.
    fn render(&mut self, buffer: &mut [f32]) -> bool;

    fn is_playing(&self) -> bool;

    fn set_playing(&mut self, playing: bool);

    /// Flip playback. Voices with an envelope override this to fade instead.
    fn toggle_playback(&mut self) {
        let playing = self.is_playing();
        self.set_playing(!playing);
    }

    fn amplitude(&self) -> f32;

    fn set_amplitude(&mut self, amplitude: f32);

    fn frequency(&self) -> f32;

    fn set_frequency(&mut self, frequency: f32);

    /// Frequency multiplier applied when a composite propagates pitch.
    fn harmonic(&self) -> f32;

    fn set_harmonic(&mut self, harmonic: f32);

    fn mod_rate(&self) -> i32;

    fn set_mod_rate(&mut self, rate: i32);

    fn mod_depth(&self) -> i32;

    fn set_mod_depth(&mut self, depth: i32);

    fn lag(&self) -> f32;

    fn set_lag(&mut self, lag: f32);

    /// The composite this voice was attached to, if any.
    fn parent(&self) -> Option<VoiceId>;

    /// Record the owning composite. Called by `fill`.
    fn attach(&mut self, parent: VoiceId);
}

/// Allow boxed voices to be used as voices (for dynamic dispatch)
impl Voice for Box<dyn Voice> {
    fn render(&mut self, buffer: &mut [f32]) -> bool {
        (**self).render(buffer)
    }

    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }

    fn set_playing(&mut self, playing: bool) {
        (**self).set_playing(playing)
    }

    fn toggle_playback(&mut self) {
        (**self).toggle_playback()
    }

    fn amplitude(&self) -> f32 {
        (**self).amplitude()
    }

    fn set_amplitude(&mut self, amplitude: f32) {
        (**self).set_amplitude(amplitude)
    }

    fn frequency(&self) -> f32 {
        (**self).frequency()
    }

    fn set_frequency(&mut self, frequency: f32) {
        (**self).set_frequency(frequency)
    }

    fn harmonic(&self) -> f32 {
        (**self).harmonic()
    }

    fn set_harmonic(&mut self, harmonic: f32) {
        (**self).set_harmonic(harmonic)
    }

    fn mod_rate(&self) -> i32 {
        (**self).mod_rate()
    }

    fn set_mod_rate(&mut self, rate: i32) {
        (**self).set_mod_rate(rate)
    }

    fn mod_depth(&self) -> i32 {
        (**self).mod_depth()
    }

    fn set_mod_depth(&mut self, depth: i32) {
        (**self).set_mod_depth(depth)
    }

    fn lag(&self) -> f32 {
        (**self).lag()
    }

    fn set_lag(&mut self, lag: f32) {
        (**self).set_lag(lag)
    }

    fn parent(&self) -> Option<VoiceId> {
        (**self).parent()
    }

    fn attach(&mut self, parent: VoiceId) {
        (**self).attach(parent)
    }
}
