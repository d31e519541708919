//! Patch descriptors: a serializable description of a composite voice.
//!
//! A patch is plain data. [`Patch::build`] validates it and turns it into a
//! ready-to-play [`CompositeVoice`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    dsp::oscillator::Waveform,
    voice::{composite::CompositeVoice, envelope::DEFAULT_ENVELOPE_TIME, simple::SimpleOsc, Voice},
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error("patch `{0}` has no oscillators")]
    Empty(String),
    #[error("sample rate must be positive, got {0}")]
    SampleRate(f32),
    #[error("envelope max level must be within 0.0..=1.0, got {0}")]
    MaxLevel(f32),
    #[error("{which} time must be non-negative, got {value}")]
    NegativeTime { which: &'static str, value: f32 },
    #[error("oscillator {index}: harmonic must be positive, got {value}")]
    Harmonic { index: usize, value: f32 },
    #[error("lag must be within 0.0..=1.0, got {0}")]
    Lag(f32),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub name: String,
    pub amplitude: f32,
    pub frequency: f32,
    pub envelope: EnvelopeDescriptor,
    pub effects: EffectsDescriptor,
    pub oscillators: Vec<OscillatorDescriptor>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeDescriptor {
    pub enabled: bool,
    pub max_level: f32,
    pub attack: f32,
    pub release: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectsDescriptor {
    pub mod_rate: i32,
    pub mod_depth: i32,
    pub lag: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct OscillatorDescriptor {
    pub waveform: Waveform,
    pub harmonic: f32,
    pub gain: f32,
}

impl Default for Patch {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            amplitude: 0.5,
            frequency: 220.0,
            envelope: EnvelopeDescriptor::default(),
            effects: EffectsDescriptor::default(),
            oscillators: vec![
                OscillatorDescriptor::default(),
                OscillatorDescriptor {
                    waveform: Waveform::Saw,
                    harmonic: 2.0,
                    gain: 0.3,
                },
            ],
        }
    }
}

impl Default for EnvelopeDescriptor {
    fn default() -> Self {
        Self {
            enabled: true,
            max_level: 1.0,
            attack: DEFAULT_ENVELOPE_TIME,
            release: DEFAULT_ENVELOPE_TIME,
        }
    }
}

impl Default for OscillatorDescriptor {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            harmonic: 1.0,
            gain: 1.0,
        }
    }
}

impl Patch {
    pub fn validate(&self) -> Result<(), PatchError> {
        if self.oscillators.is_empty() {
            return Err(PatchError::Empty(self.name.clone()));
        }

        let env = &self.envelope;
        if !(0.0..=1.0).contains(&env.max_level) {
            return Err(PatchError::MaxLevel(env.max_level));
        }
        if env.attack < 0.0 {
            return Err(PatchError::NegativeTime {
                which: "attack",
                value: env.attack,
            });
        }
        if env.release < 0.0 {
            return Err(PatchError::NegativeTime {
                which: "release",
                value: env.release,
            });
        }

        if !(0.0..=1.0).contains(&self.effects.lag) {
            return Err(PatchError::Lag(self.effects.lag));
        }

        for (index, osc) in self.oscillators.iter().enumerate() {
            if osc.harmonic.is_nan() || osc.harmonic <= 0.0 {
                return Err(PatchError::Harmonic {
                    index,
                    value: osc.harmonic,
                });
            }
        }

        Ok(())
    }

    /// Validate and build a stopped composite voice.
    ///
    /// Each oscillator sounds at the patch frequency times its harmonic, and
    /// keeps that ratio when the composite's pitch changes later.
    pub fn build(&self, sample_rate: f32) -> Result<CompositeVoice, PatchError> {
        if sample_rate.is_nan() || sample_rate <= 0.0 {
            return Err(PatchError::SampleRate(sample_rate));
        }
        self.validate()?;

        let children = self.oscillators.iter().map(|desc| {
            Box::new(
                SimpleOsc::new(desc.waveform, sample_rate)
                    .with_amplitude(desc.gain)
                    .with_harmonic(desc.harmonic)
                    .with_frequency(self.frequency),
            ) as Box<dyn Voice>
        });

        let mut voice = CompositeVoice::with_amplitude(self.amplitude);
        voice.fill(children);

        voice.set_attack(self.envelope.attack);
        voice.set_release(self.envelope.release);
        voice.set_max_level(self.envelope.max_level);
        voice.set_envelope_enabled(self.envelope.enabled);

        voice.set_mod_rate(self.effects.mod_rate);
        voice.set_mod_depth(self.effects.mod_depth);
        voice.set_lag(self.effects.lag);

        log::info!(
            "built patch `{}`: {} oscillators at {} Hz",
            self.name,
            self.oscillators.len(),
            sample_rate
        );

        Ok(voice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnvelopeState;

    #[test]
    fn default_patch_builds() {
        let voice = Patch::default().build(48_000.0).unwrap();
        assert_eq!(voice.children().len(), 2);
        assert_eq!(voice.state(), EnvelopeState::Idle);
        assert!(voice.envelope_enabled());
        assert_eq!(voice.amplitude(), 0.5);
    }

    #[test]
    fn oscillator_frequencies_follow_harmonics() {
        let voice = Patch::default().build(48_000.0).unwrap();
        assert_eq!(voice.child(0).map(|c| c.frequency()), Some(220.0));
        assert_eq!(voice.child(1).map(|c| c.harmonic()), Some(2.0));

        let mut voice = voice;
        voice.set_frequency(110.0);
        assert_eq!(voice.child(1).map(|c| c.frequency()), Some(110.0));
        assert_eq!(voice.child(1).map(|c| c.harmonic()), Some(2.0));
    }

    #[test]
    fn effects_are_applied() {
        let patch = Patch {
            effects: EffectsDescriptor {
                mod_rate: 5,
                mod_depth: 20,
                lag: 0.3,
            },
            ..Patch::default()
        };
        let voice = patch.build(44_100.0).unwrap();
        assert_eq!(voice.mod_rate(), 5);
        assert_eq!(voice.mod_depth(), 20);
        assert_eq!(voice.lag(), 0.3);
    }

    #[test]
    fn rejects_invalid_patches() {
        let empty = Patch {
            oscillators: Vec::new(),
            ..Patch::default()
        };
        assert_eq!(empty.validate(), Err(PatchError::Empty("default".into())));

        let mut loud = Patch::default();
        loud.envelope.max_level = 1.5;
        assert_eq!(loud.validate(), Err(PatchError::MaxLevel(1.5)));

        let mut backwards = Patch::default();
        backwards.envelope.release = -0.1;
        assert!(matches!(
            backwards.validate(),
            Err(PatchError::NegativeTime { which: "release", .. })
        ));

        let mut flat = Patch::default();
        flat.oscillators[1].harmonic = 0.0;
        assert!(matches!(
            flat.validate(),
            Err(PatchError::Harmonic { index: 1, .. })
        ));

        assert_eq!(
            Patch::default().build(0.0).err(),
            Some(PatchError::SampleRate(0.0))
        );
        assert!(matches!(
            Patch::default().build(f32::NAN),
            Err(PatchError::SampleRate(_))
        ));

        let mut nan_harmonic = Patch::default();
        nan_harmonic.oscillators[0].harmonic = f32::NAN;
        assert!(matches!(
            nan_harmonic.validate(),
            Err(PatchError::Harmonic { index: 0, .. })
        ));
    }
}
