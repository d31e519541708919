#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::voice::{composite::CompositeVoice, envelope::EnvelopeState, Voice};

/// Control change sent from the interaction thread to the audio thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VoiceMessage {
    TogglePlayback,
    StartAttack,
    StartRelease,
    SetAttack(f32),
    SetRelease(f32),
    SetMaxLevel(f32),
    SetAmplitude(f32),
    SetEnvelopeEnabled(bool),
    SetFrequency(f32),
    SetModRate(i32),
    SetModDepth(i32),
    SetLag(f32),
    ResetEffects,
}

/// Snapshot published by the audio thread after every render.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct VoiceStatus {
    pub state: EnvelopeState,
    pub level: f32,
    pub playing: bool,
    /// Whether the last render produced audio.
    pub produced: bool,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<VoiceMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<VoiceMessage> {
    fn pop(&mut self) -> Option<VoiceMessage> {
        Consumer::pop(self).ok()
    }
}

impl VoiceMessage {
    /// Apply this change to a voice. Realtime-safe.
    pub fn apply(self, voice: &mut CompositeVoice) {
        match self {
            VoiceMessage::TogglePlayback => voice.toggle_playback(),
            VoiceMessage::StartAttack => voice.start_attack(),
            VoiceMessage::StartRelease => voice.start_release(),
            VoiceMessage::SetAttack(time) => voice.set_attack(time),
            VoiceMessage::SetRelease(time) => voice.set_release(time),
            VoiceMessage::SetMaxLevel(level) => voice.set_max_level(level),
            VoiceMessage::SetAmplitude(amplitude) => voice.set_amplitude(amplitude),
            VoiceMessage::SetEnvelopeEnabled(enabled) => voice.set_envelope_enabled(enabled),
            VoiceMessage::SetFrequency(frequency) => voice.set_frequency(frequency),
            VoiceMessage::SetModRate(rate) => voice.set_mod_rate(rate),
            VoiceMessage::SetModDepth(depth) => voice.set_mod_depth(depth),
            VoiceMessage::SetLag(lag) => voice.set_lag(lag),
            VoiceMessage::ResetEffects => {
                voice.reset_effects();
            }
        }
    }
}

/// Apply every pending message in arrival order. Returns how many were applied.
pub fn drain_into<R: MessageReceiver + ?Sized>(rx: &mut R, voice: &mut CompositeVoice) -> usize {
    let mut applied = 0;
    while let Some(msg) = rx.pop() {
        msg.apply(voice);
        applied += 1;
    }
    applied
}
