use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Saw,
    Square,
    Triangle,
}

/// Phase accumulator producing one waveform sample per call.
///
/// Phase lives in [0.0, 1.0) and wraps every cycle.
#[derive(Debug, Clone)]
pub struct OscillatorBlock {
    waveform: Waveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Emit the sample at the current phase, then advance by `frequency / sample_rate`.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let p = self.phase;
        let out = match self.waveform {
            Waveform::Sine => (p * TAU).sin(),
            Waveform::Saw => 2.0 * p - 1.0,
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
        };

        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();

        out
    }
}
