use crate::{
    dsp::{
        oscillator::{OscillatorBlock, Waveform},
        Ramp,
    },
    voice::{Voice, VoiceId},
};

/*
Simple Oscillator Voice
=======================

The leaf of the voice tree: one waveform at one pitch, with two performance
effects layered on the pitch.

Vibrato (mod rate / mod depth)
------------------------------

A sine LFO wobbles the pitch.

  mod_rate    LFO speed in Hz. 0 disables vibrato.
  mod_depth   Swing in cents (100 cents = 1 semitone) either side of the
              played pitch.

    frequency × 2^(depth × lfo / 1200)      lfo ∈ [-1, 1]

Lag (portamento)
----------------

With lag > 0 a new frequency is not applied immediately. The pitch glides
there linearly, one ramp step per sample:

  lag = 0.0   jump
  lag = 1.0   glide lasts MAX_GLIDE_SECONDS

This is what makes dragging a finger across the surface sound like a slide
instead of a staircase.
*/

/// Glide duration at full lag.
pub const MAX_GLIDE_SECONDS: f32 = 0.5;

pub struct SimpleOsc {
    osc: OscillatorBlock,
    vibrato: OscillatorBlock,
    glide: Ramp,
    sample_rate: f32,

    playing: bool,
    amplitude: f32,
    frequency: f32,
    harmonic: f32,
    mod_rate: i32,
    mod_depth: i32,
    lag: f32,
    parent: Option<VoiceId>,
}

impl SimpleOsc {
    pub fn new(waveform: Waveform, sample_rate: f32) -> Self {
        let frequency = 440.0;
        Self {
            osc: OscillatorBlock::new(waveform),
            vibrato: OscillatorBlock::new(Waveform::Sine),
            glide: Ramp::new(frequency, frequency),
            sample_rate,
            playing: false,
            amplitude: 1.0,
            frequency,
            harmonic: 1.0,
            mod_rate: 0,
            mod_depth: 0,
            lag: 0.0,
            parent: None,
        }
    }

    pub fn sine(sample_rate: f32) -> Self {
        Self::new(Waveform::Sine, sample_rate)
    }

    pub fn saw(sample_rate: f32) -> Self {
        Self::new(Waveform::Saw, sample_rate)
    }

    pub fn square(sample_rate: f32) -> Self {
        Self::new(Waveform::Square, sample_rate)
    }

    pub fn triangle(sample_rate: f32) -> Self {
        Self::new(Waveform::Triangle, sample_rate)
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Sounding pitch is `frequency × harmonic`.
    pub fn with_harmonic(mut self, harmonic: f32) -> Self {
        self.harmonic = harmonic;
        self.glide = Ramp::new(self.pitch(), self.pitch());
        self
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self.glide = Ramp::new(self.pitch(), self.pitch());
        self
    }

    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    /// Frequency currently sounding (differs from `frequency()` mid-glide).
    pub fn current_frequency(&self) -> f32 {
        self.glide.value()
    }

    fn pitch(&self) -> f32 {
        self.frequency * self.harmonic
    }

    fn glide_to_pitch(&mut self) {
        let from = self.glide.value();
        let target = self.pitch();
        let step = self.glide_step((target - from).abs());
        self.glide = Ramp::new(from, target).with_step(step);
    }

    fn glide_step(&self, distance: f32) -> f32 {
        if self.lag <= 0.0 {
            f32::INFINITY
        } else {
            distance / (self.lag * MAX_GLIDE_SECONDS * self.sample_rate)
        }
    }
}

impl Voice for SimpleOsc {
    fn render(&mut self, buffer: &mut [f32]) -> bool {
        if !self.playing {
            return false;
        }

        let vibrato_on = self.mod_rate > 0 && self.mod_depth != 0;
        let depth = self.mod_depth as f32;
        let rate = self.mod_rate as f32;

        let mut produced = false;
        for sample in buffer.iter_mut() {
            let mut frequency = self.glide.advance();
            if vibrato_on {
                let lfo = self.vibrato.next_sample(rate, self.sample_rate);
                frequency *= 2.0_f32.powf(depth * lfo / 1200.0);
            }

            let out = self.amplitude * self.osc.next_sample(frequency, self.sample_rate);
            produced |= out != 0.0;
            *sample += out;
        }

        produced
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn set_playing(&mut self, playing: bool) {
        if playing && !self.playing {
            self.osc.reset();
            self.vibrato.reset();
        }
        self.playing = playing;
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
        self.glide_to_pitch();
    }

    fn harmonic(&self) -> f32 {
        self.harmonic
    }

    fn set_harmonic(&mut self, harmonic: f32) {
        self.harmonic = harmonic;
        self.glide_to_pitch();
    }

    fn mod_rate(&self) -> i32 {
        self.mod_rate
    }

    fn set_mod_rate(&mut self, rate: i32) {
        self.mod_rate = rate;
    }

    fn mod_depth(&self) -> i32 {
        self.mod_depth
    }

    fn set_mod_depth(&mut self, depth: i32) {
        self.mod_depth = depth;
    }

    fn lag(&self) -> f32 {
        self.lag
    }

    fn set_lag(&mut self, lag: f32) {
        self.lag = lag;
    }

    fn parent(&self) -> Option<VoiceId> {
        self.parent
    }

    fn attach(&mut self, parent: VoiceId) {
        self.parent = Some(parent);
    }
}
