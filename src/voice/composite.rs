use crate::{
    dsp::{limiter, mix},
    voice::{
        envelope::{AmpEnvelope, EnvelopeEvent, EnvelopeState},
        Voice, VoiceId,
    },
    MAX_BLOCK_SIZE,
};

/*
Composite Voice
===============

A composite voice owns an ordered list of child voices and plays them as one
instrument. It adds nothing to the sound by itself; it sums what the children
produce and shapes the sum with a master amplitude and an attack/release
envelope.

How a render works:
1. If the voice is not playing, return immediately. The buffer is not touched
   and the envelope does not move.
2. Limit the shared output buffer in place. Other voices may already have
   added into it.
3. Clear a private scratch block and let every child add into it, in
   insertion order. The result is the plain sum of the children, so the order
   does not matter numerically.
4. Add `amplitude × envelope_level × scratch[i]` into the output
   (`amplitude × scratch[i]` when the envelope is disabled).
5. Advance the envelope by one step.

The scratch block is allocated once at construction (MAX_BLOCK_SIZE). Longer
buffers are processed in MAX_BLOCK_SIZE chunks with the same gain, and the
envelope still advances only once per call.

Children are forced to play when attached. The composite never stops a child;
when a release finishes the composite itself stops playing and its children
are simply no longer rendered.

Example usage:
  let mut voice = CompositeVoice::new()
      .with_voice(SimpleOsc::sine(48_000.0))
      .with_voice(SimpleOsc::saw(48_000.0).with_harmonic(2.0));

  voice.set_frequency(220.0);   // children get 220 Hz and 440 Hz
  voice.toggle_playback();      // Idle → Attacking
  voice.render(&mut block);     // fades in over the following blocks
*/

pub struct CompositeVoice {
    id: VoiceId,
    parent: Option<VoiceId>,
    children: Vec<Box<dyn Voice>>,

    playing: bool,
    amplitude: f32,
    frequency: f32,
    harmonic: f32,

    envelope_enabled: bool,
    envelope: AmpEnvelope,

    scratch: Vec<f32>,
}

impl CompositeVoice {
    pub fn new() -> Self {
        Self::with_amplitude(1.0)
    }

    pub fn with_amplitude(amplitude: f32) -> Self {
        Self {
            id: VoiceId::next(),
            parent: None,
            children: Vec::new(),
            playing: false,
            amplitude,
            frequency: 0.0,
            harmonic: 1.0,
            envelope_enabled: true,
            envelope: AmpEnvelope::new(),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Builder-style [`fill_one`](Self::fill_one).
    pub fn with_voice<V: Voice + 'static>(mut self, voice: V) -> Self {
        self.fill_one(voice);
        self
    }

    /// Builder-style harmonic ratio, used when this voice is itself a child.
    pub fn with_harmonic(mut self, harmonic: f32) -> Self {
        self.harmonic = harmonic;
        self
    }

    /// Attach several voices in order.
    ///
    /// Each one is forced to play and records this composite as its parent.
    /// Setup-time operation: it may allocate.
    pub fn fill<I>(&mut self, voices: I) -> &mut Self
    where
        I: IntoIterator<Item = Box<dyn Voice>>,
    {
        let before = self.children.len();
        for voice in voices {
            self.attach_child(voice);
        }
        log::debug!(
            "voice {} attached {} children ({} total)",
            self.id.get(),
            self.children.len() - before,
            self.children.len()
        );
        self
    }

    /// Attach a single voice.
    pub fn fill_one<V: Voice + 'static>(&mut self, voice: V) -> &mut Self {
        self.attach_child(Box::new(voice));
        log::debug!(
            "voice {} attached child #{}",
            self.id.get(),
            self.children.len()
        );
        self
    }

    fn attach_child(&mut self, mut voice: Box<dyn Voice>) {
        voice.set_playing(true);
        voice.attach(self.id);
        self.children.push(voice);
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn children(&self) -> &[Box<dyn Voice>] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&dyn Voice> {
        self.children.get(index).map(|c| c.as_ref())
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Box<dyn Voice>> {
        self.children.get_mut(index)
    }

    /// Zero modulation and lag on every child and bypass the envelope.
    ///
    /// Attack and release times are left as they are.
    pub fn reset_effects(&mut self) -> &mut Self {
        self.set_mod_rate(0);
        self.set_mod_depth(0);
        self.set_lag(0.0);
        self.set_envelope_enabled(false);
        self
    }

    // ---- Envelope ----

    pub fn start_attack(&mut self) {
        if self.envelope_enabled {
            self.envelope.start_attack();
        }
        self.playing = true;
    }

    pub fn start_release(&mut self) {
        if self.envelope_enabled {
            self.envelope.start_release();
        } else {
            self.playing = false;
        }
    }

    pub fn state(&self) -> EnvelopeState {
        self.envelope.state(self.playing)
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn is_attacking(&self) -> bool {
        self.envelope.is_attacking()
    }

    pub fn is_releasing(&self) -> bool {
        self.envelope.is_releasing()
    }

    pub fn envelope_enabled(&self) -> bool {
        self.envelope_enabled
    }

    /// Turn the envelope on or off.
    ///
    /// Disabling freezes any phase in progress; output jumps to the bypassed
    /// gain if a fade was under way. Enabling while playing resumes in
    /// Sustained at `max_level`, so a full-scale envelope picks up exactly
    /// where the bypass left off.
    pub fn set_envelope_enabled(&mut self, enabled: bool) {
        if enabled == self.envelope_enabled {
            return;
        }
        self.envelope_enabled = enabled;
        if !enabled {
            self.envelope.hold();
        } else if self.playing {
            self.envelope.sustain_at_peak();
        }
    }

    pub fn attack(&self) -> f32 {
        self.envelope.attack_time()
    }

    pub fn set_attack(&mut self, time: f32) {
        self.envelope.set_attack_time(time);
    }

    pub fn release(&self) -> f32 {
        self.envelope.release_time()
    }

    pub fn set_release(&mut self, time: f32) {
        self.envelope.set_release_time(time);
    }

    pub fn max_level(&self) -> f32 {
        self.envelope.max_level()
    }

    pub fn set_max_level(&mut self, level: f32) {
        self.envelope.set_max_level(level);
    }

    fn update_envelope(&mut self) {
        if self.envelope.update() == EnvelopeEvent::Released {
            self.playing = false;
        }
    }

    /// Render all children into the scratch block and add the scaled sum into `out`.
    fn mix_children(&mut self, out: &mut [f32], gain: f32) -> bool {
        // Slice scratch buffer to match output size (RT-safe, no allocation)
        let scratch = &mut self.scratch[..out.len()];
        scratch.fill(0.0);

        let mut produced = false;
        for child in self.children.iter_mut() {
            produced |= child.render(scratch);
        }

        mix::add_scaled(out, scratch, gain);
        produced
    }
}

impl Default for CompositeVoice {
    fn default() -> Self {
        Self::new()
    }
}

impl Voice for CompositeVoice {
    fn render(&mut self, buffer: &mut [f32]) -> bool {
        if !self.playing {
            return false;
        }

        limiter::limit(buffer);

        let gain = if self.envelope_enabled {
            self.amplitude * self.envelope.level()
        } else {
            self.amplitude
        };

        let mut produced = false;
        for block in buffer.chunks_mut(MAX_BLOCK_SIZE) {
            produced |= self.mix_children(block, gain);
        }

        if self.envelope_enabled {
            self.update_envelope();
        }

        produced
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    /// Starting fades in like [`start_attack`](Self::start_attack); stopping is
    /// immediate and drops the envelope to zero.
    fn set_playing(&mut self, playing: bool) {
        if playing == self.playing {
            return;
        }
        if playing {
            self.start_attack();
        } else {
            self.envelope.reset();
            self.playing = false;
        }
    }

    fn toggle_playback(&mut self) {
        if !self.playing || self.envelope.is_releasing() {
            self.start_attack();
        } else {
            self.start_release();
        }
    }

    fn amplitude(&self) -> f32 {
        self.amplitude
    }

    fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    fn frequency(&self) -> f32 {
        self.frequency
    }

    fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        let child_frequency = frequency * self.harmonic;
        for child in self.children.iter_mut() {
            child.set_frequency(child_frequency);
        }
    }

    fn harmonic(&self) -> f32 {
        self.harmonic
    }

    fn set_harmonic(&mut self, harmonic: f32) {
        self.harmonic = harmonic;
    }

    fn mod_rate(&self) -> i32 {
        self.children.first().map_or(0, |c| c.mod_rate())
    }

    fn set_mod_rate(&mut self, rate: i32) {
        for child in self.children.iter_mut() {
            child.set_mod_rate(rate);
        }
    }

    fn mod_depth(&self) -> i32 {
        self.children.first().map_or(0, |c| c.mod_depth())
    }

    fn set_mod_depth(&mut self, depth: i32) {
        for child in self.children.iter_mut() {
            child.set_mod_depth(depth);
        }
    }

    fn lag(&self) -> f32 {
        self.children.first().map_or(0.0, |c| c.lag())
    }

    fn set_lag(&mut self, lag: f32) {
        for child in self.children.iter_mut() {
            child.set_lag(lag);
        }
    }

    fn parent(&self) -> Option<VoiceId> {
        self.parent
    }

    fn attach(&mut self, parent: VoiceId) {
        self.parent = Some(parent);
    }
}
