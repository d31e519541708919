use crate::dsp::Ramp;

/*
Attack/Release Envelope
=======================

The composite voice fades its mix in and out with a two-phase envelope. It is
advanced once per rendered block, not once per sample.

Vocabulary
----------

  level       Current output, always within [0, max_level]. The mixed block
              is multiplied by it.

  max_level   Peak the attack climbs to (0.0 - 1.0).

  attack/     Normalized durations (0.0 - 1.0). A time of 1.0 moves the level
  release     across the full 0 → 1 range in RAMP_STEPS_PER_UNIT_TIME blocks.
  time        The default of 0.2 gives a step of 0.1 per block.


The State Machine
-----------------

               toggle                     level stops changing
    ┌──────┐ ─────────→ ┌───────────┐ ─────────────────────→ ┌───────────┐
    │ Idle │            │ Attacking │                        │ Sustained │
    └──────┘            └───────────┘                        └───────────┘
       ↑                  ↑       │ toggle                         │
       │                  │toggle ↓                                │ toggle
       │               ┌───────────┐                               │
       └────────────── │ Releasing │ ←─────────────────────────────┘
     level stops       └───────────┘
     changing

Each trigger rebuilds BOTH ramps from the current level. A release that
interrupts an attack (or the reverse) therefore starts exactly where the
level is, and the output never jumps.

Convergence is detected the simple way: if advancing the active ramp returns
the value we already had, the phase is over. With a linear ramp this happens
on the block after the target is reached.
*/

/// Blocks needed to cross the full 0 → 1 range at a normalized time of 1.0.
pub const RAMP_STEPS_PER_UNIT_TIME: f32 = 50.0;

/// Default attack and release time.
pub const DEFAULT_ENVELOPE_TIME: f32 = 0.2;

/// Observable phase of a composite voice.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeState {
    #[default]
    Idle,
    Attacking,
    Sustained,
    Releasing,
}

/// What happened during one call to [`AmpEnvelope::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeEvent {
    None,
    /// Attack converged; the voice keeps playing at the peak level.
    Sustained,
    /// Release converged; the voice should stop playing.
    Released,
}

#[derive(Debug, Clone)]
pub struct AmpEnvelope {
    max_level: f32,
    level: f32,

    attack_time: f32,
    release_time: f32,
    attack_ramp: Ramp,
    release_ramp: Ramp,

    attacking: bool,
    releasing: bool,
}

impl AmpEnvelope {
    pub fn new() -> Self {
        let mut env = Self {
            max_level: 1.0,
            level: 0.0,
            attack_time: DEFAULT_ENVELOPE_TIME,
            release_time: DEFAULT_ENVELOPE_TIME,
            attack_ramp: Ramp::default(),
            release_ramp: Ramp::default(),
            attacking: false,
            releasing: false,
        };
        env.reset_ramps();
        env
    }

    /// Rebuild both ramps so they start from the current level.
    pub fn reset_ramps(&mut self) {
        self.attack_ramp =
            Ramp::new(self.level, self.max_level).with_step(step_for(self.attack_time));
        self.release_ramp = Ramp::new(self.level, 0.0).with_step(step_for(self.release_time));
    }

    pub fn start_attack(&mut self) {
        self.reset_ramps();
        self.releasing = false;
        self.attacking = true;
    }

    pub fn start_release(&mut self) {
        self.reset_ramps();
        self.attacking = false;
        self.releasing = true;
    }

    /// Stop any phase in progress, freezing the level where it is.
    pub fn hold(&mut self) {
        self.attacking = false;
        self.releasing = false;
    }

    /// Jump to `max_level` with no phase active.
    pub fn sustain_at_peak(&mut self) {
        self.hold();
        self.level = self.max_level;
        self.reset_ramps();
    }

    /// Drop to silence with no phase active.
    pub fn reset(&mut self) {
        self.hold();
        self.level = 0.0;
        self.reset_ramps();
    }

    /// Advance the active ramp by one step.
    ///
    /// No-op unless attacking or releasing.
    pub fn update(&mut self) -> EnvelopeEvent {
        if !self.attacking && !self.releasing {
            return EnvelopeEvent::None;
        }

        let previous = self.level;
        self.level = if self.attacking {
            self.attack_ramp.advance()
        } else {
            self.release_ramp.advance()
        };

        if self.level != previous {
            return EnvelopeEvent::None;
        }

        if self.releasing {
            self.releasing = false;
            EnvelopeEvent::Released
        } else {
            self.attacking = false;
            EnvelopeEvent::Sustained
        }
    }

    /// Derive the phase given the owner's playback flag.
    pub fn state(&self, playing: bool) -> EnvelopeState {
        if self.attacking {
            EnvelopeState::Attacking
        } else if self.releasing {
            EnvelopeState::Releasing
        } else if playing {
            EnvelopeState::Sustained
        } else {
            EnvelopeState::Idle
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn is_releasing(&self) -> bool {
        self.releasing
    }

    pub fn max_level(&self) -> f32 {
        self.max_level
    }

    /// Set the attack peak, clamped to [0, 1]. NaN counts as 0.
    ///
    /// A level above the new peak is pulled down to it.
    pub fn set_max_level(&mut self, max_level: f32) {
        self.max_level = if max_level.is_nan() {
            0.0
        } else {
            max_level.clamp(0.0, 1.0)
        };
        self.level = self.level.min(self.max_level);
        self.reset_ramps();
    }

    pub fn attack_time(&self) -> f32 {
        self.attack_time
    }

    /// Negative times are treated as zero (jump in one block).
    pub fn set_attack_time(&mut self, time: f32) {
        self.attack_time = time.max(0.0);
        self.reset_ramps();
    }

    pub fn release_time(&self) -> f32 {
        self.release_time
    }

    pub fn set_release_time(&mut self, time: f32) {
        self.release_time = time.max(0.0);
        self.reset_ramps();
    }
}

impl Default for AmpEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

fn step_for(time: f32) -> f32 {
    if time <= 0.0 {
        f32::INFINITY
    } else {
        1.0 / (time * RAMP_STEPS_PER_UNIT_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_event(env: &mut AmpEnvelope, limit: usize) -> (usize, EnvelopeEvent) {
        for i in 1..=limit {
            let event = env.update();
            if event != EnvelopeEvent::None {
                return (i, event);
            }
        }
        (limit, EnvelopeEvent::None)
    }

    #[test]
    fn starts_idle() {
        let env = AmpEnvelope::new();
        assert_eq!(env.state(false), EnvelopeState::Idle);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn default_attack_steps_by_a_tenth() {
        let mut env = AmpEnvelope::new();
        env.start_attack();
        env.update();
        assert!((env.level() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn attack_is_monotone_and_converges_to_sustain() {
        let mut env = AmpEnvelope::new();
        env.set_max_level(0.8);
        env.start_attack();

        let mut previous = env.level();
        let mut event = EnvelopeEvent::None;
        for _ in 0..100 {
            event = env.update();
            assert!(env.level() >= previous);
            assert!(env.level() <= 0.8);
            previous = env.level();
            if event != EnvelopeEvent::None {
                break;
            }
        }

        assert_eq!(event, EnvelopeEvent::Sustained);
        assert_eq!(env.level(), 0.8);
        assert_eq!(env.state(true), EnvelopeState::Sustained);
    }

    #[test]
    fn release_is_monotone_and_converges_to_idle() {
        let mut env = AmpEnvelope::new();
        env.start_attack();
        run_until_event(&mut env, 100);

        env.start_release();
        let mut previous = env.level();
        let mut event = EnvelopeEvent::None;
        for _ in 0..100 {
            event = env.update();
            assert!(env.level() <= previous);
            assert!(env.level() >= 0.0);
            previous = env.level();
            if event != EnvelopeEvent::None {
                break;
            }
        }

        assert_eq!(event, EnvelopeEvent::Released);
        assert_eq!(env.level(), 0.0);
        assert_eq!(env.state(false), EnvelopeState::Idle);
    }

    #[test]
    fn reversal_starts_from_current_level() {
        let mut env = AmpEnvelope::new();
        env.start_attack();
        for _ in 0..4 {
            env.update();
        }
        let before = env.level();

        env.start_release();
        assert_eq!(env.level(), before, "switching phases must not move the level");

        env.update();
        let after = env.level();
        assert!(after < before);
        assert!((before - after - 0.1).abs() < 1e-6, "first release step is one ramp step");
    }

    #[test]
    fn attack_time_sets_block_count() {
        let mut env = AmpEnvelope::new();
        env.set_attack_time(1.0);
        env.start_attack();

        // 50 blocks to reach the peak, one more to notice convergence
        let (blocks, event) = run_until_event(&mut env, 200);
        assert_eq!(event, EnvelopeEvent::Sustained);
        assert!((50..=52).contains(&blocks), "took {blocks} blocks");
    }

    #[test]
    fn zero_time_jumps() {
        let mut env = AmpEnvelope::new();
        env.set_attack_time(0.0);
        env.start_attack();
        assert_eq!(env.update(), EnvelopeEvent::None);
        assert_eq!(env.level(), 1.0);
        assert_eq!(env.update(), EnvelopeEvent::Sustained);
    }

    #[test]
    fn out_of_range_parameters_are_clamped() {
        let mut env = AmpEnvelope::new();
        env.set_max_level(3.0);
        assert_eq!(env.max_level(), 1.0);
        env.set_max_level(-1.0);
        assert_eq!(env.max_level(), 0.0);

        env.set_release_time(-2.0);
        assert_eq!(env.release_time(), 0.0);
    }

    #[test]
    fn nan_max_level_keeps_level_bounded() {
        let mut env = AmpEnvelope::new();
        env.set_max_level(f32::NAN);
        assert_eq!(env.max_level(), 0.0);

        env.start_attack();
        let (_, event) = run_until_event(&mut env, 100);
        assert_eq!(event, EnvelopeEvent::Sustained);
        assert_eq!(env.level(), 0.0);

        env.set_attack_time(f32::NAN);
        assert_eq!(env.attack_time(), 0.0);
    }

    #[test]
    fn sustain_at_peak_holds_max_level() {
        let mut env = AmpEnvelope::new();
        env.set_max_level(0.6);
        env.start_attack();
        env.update();

        env.sustain_at_peak();
        assert_eq!(env.level(), 0.6);
        assert_eq!(env.state(true), EnvelopeState::Sustained);
        assert_eq!(env.update(), EnvelopeEvent::None);
        assert_eq!(env.level(), 0.6);
    }

    #[test]
    fn update_without_phase_is_noop() {
        let mut env = AmpEnvelope::new();
        assert_eq!(env.update(), EnvelopeEvent::None);
        assert_eq!(env.level(), 0.0);
    }
}
