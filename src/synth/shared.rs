use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer, PushError, RingBuffer};
use thiserror::Error;

use crate::{
    synth::message::{drain_into, VoiceMessage, VoiceStatus},
    voice::{composite::CompositeVoice, envelope::EnvelopeState, Voice},
};

/*
Sharing a Voice Between Threads
===============================

The audio callback must never block, so the composite voice is not wrapped in
a mutex. Instead it is MOVED to the audio thread inside a `SharedVoice`, and
the interaction thread keeps a `VoiceHandle`:

    interaction thread                      audio thread
    ──────────────────                      ────────────
    VoiceHandle ── VoiceMessage ring ─────→ SharedVoice::render
                ←─ StatusCell ────────────    1. drain messages
                                              2. render the voice
                                              3. publish status

Messages are applied at the START of a render, so a parameter change is never
seen half-applied in the middle of a block. `&mut self` on render means two
renders of the same voice cannot overlap.

The message ring is fixed-size and its payload is `Copy`, so nothing allocates
on the audio thread. A full ring is reported to the caller.

Status goes back through a single slot instead of a queue. Each render
overwrites it, so the UI always reads the newest snapshot no matter how long
it went without looking. The snapshot is packed into one `AtomicU64`:

    bits  0..32   envelope level (f32 bits)
    bits 32..34   EnvelopeState
    bit  34       playing
    bit  35       produced
*/

/// Default capacity of the control ring.
pub const DEFAULT_QUEUE_SIZE: usize = 64;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum HandleError {
    #[error("voice message queue is full, dropped {0:?}")]
    QueueFull(VoiceMessage),
}

/// Latest-value slot for [`VoiceStatus`]. Lock-free, never blocks the writer.
struct StatusCell {
    bits: AtomicU64,
}

impl StatusCell {
    const PLAYING: u64 = 1 << 34;
    const PRODUCED: u64 = 1 << 35;

    fn new(status: VoiceStatus) -> Self {
        Self {
            bits: AtomicU64::new(Self::pack(status)),
        }
    }

    fn store(&self, status: VoiceStatus) {
        self.bits.store(Self::pack(status), Ordering::Release);
    }

    fn load(&self) -> VoiceStatus {
        Self::unpack(self.bits.load(Ordering::Acquire))
    }

    fn pack(status: VoiceStatus) -> u64 {
        let state: u64 = match status.state {
            EnvelopeState::Idle => 0,
            EnvelopeState::Attacking => 1,
            EnvelopeState::Sustained => 2,
            EnvelopeState::Releasing => 3,
        };
        let mut bits = u64::from(status.level.to_bits()) | (state << 32);
        if status.playing {
            bits |= Self::PLAYING;
        }
        if status.produced {
            bits |= Self::PRODUCED;
        }
        bits
    }

    fn unpack(bits: u64) -> VoiceStatus {
        let state = match (bits >> 32) & 0b11 {
            0 => EnvelopeState::Idle,
            1 => EnvelopeState::Attacking,
            2 => EnvelopeState::Sustained,
            _ => EnvelopeState::Releasing,
        };
        VoiceStatus {
            state,
            level: f32::from_bits(bits as u32),
            playing: bits & Self::PLAYING != 0,
            produced: bits & Self::PRODUCED != 0,
        }
    }
}

/// Audio-thread side of a shared voice.
pub struct SharedVoice {
    voice: CompositeVoice,
    rx: Consumer<VoiceMessage>,
    status: Arc<StatusCell>,
}

/// Interaction-thread side of a shared voice.
pub struct VoiceHandle {
    tx: Producer<VoiceMessage>,
    status: Arc<StatusCell>,
}

impl SharedVoice {
    pub fn new(voice: CompositeVoice, queue_size: usize) -> (Self, VoiceHandle) {
        let (tx, rx) = RingBuffer::<VoiceMessage>::new(queue_size);
        let status = Arc::new(StatusCell::new(status_of(&voice, false)));

        let node = Self {
            voice,
            rx,
            status: Arc::clone(&status),
        };
        let handle = VoiceHandle { tx, status };

        log::debug!(
            "voice {} shared with queue size {}",
            node.voice.id().get(),
            queue_size
        );

        (node, handle)
    }

    /// Apply pending control messages, render, then publish a status snapshot.
    pub fn render(&mut self, buffer: &mut [f32]) -> bool {
        drain_into(&mut self.rx, &mut self.voice);

        let produced = self.voice.render(buffer);

        self.status.store(status_of(&self.voice, produced));

        produced
    }

    pub fn voice(&self) -> &CompositeVoice {
        &self.voice
    }

    /// Take the voice back, e.g. after the audio stream stops.
    pub fn into_inner(self) -> CompositeVoice {
        self.voice
    }
}

impl VoiceHandle {
    fn send(&mut self, msg: VoiceMessage) -> Result<(), HandleError> {
        match self.tx.push(msg) {
            Ok(()) => {
                log::trace!("queued {msg:?}");
                Ok(())
            }
            Err(PushError::Full(msg)) => {
                log::warn!("voice message queue full, dropping {msg:?}");
                Err(HandleError::QueueFull(msg))
            }
        }
    }

    pub fn toggle_playback(&mut self) -> Result<(), HandleError> {
        self.send(VoiceMessage::TogglePlayback)
    }

    pub fn start_attack(&mut self) -> Result<(), HandleError> {
        self.send(VoiceMessage::StartAttack)
    }

    pub fn start_release(&mut self) -> Result<(), HandleError> {
        self.send(VoiceMessage::StartRelease)
    }

    pub fn set_attack(&mut self, time: f32) -> Result<(), HandleError> {
        self.send(VoiceMessage::SetAttack(time))
    }

    pub fn set_release(&mut self, time: f32) -> Result<(), HandleError> {
        self.send(VoiceMessage::SetRelease(time))
    }

    pub fn set_max_level(&mut self, level: f32) -> Result<(), HandleError> {
        self.send(VoiceMessage::SetMaxLevel(level))
    }

    pub fn set_amplitude(&mut self, amplitude: f32) -> Result<(), HandleError> {
        self.send(VoiceMessage::SetAmplitude(amplitude))
    }

    pub fn set_envelope_enabled(&mut self, enabled: bool) -> Result<(), HandleError> {
        self.send(VoiceMessage::SetEnvelopeEnabled(enabled))
    }

    pub fn set_frequency(&mut self, frequency: f32) -> Result<(), HandleError> {
        self.send(VoiceMessage::SetFrequency(frequency))
    }

    pub fn set_mod_rate(&mut self, rate: i32) -> Result<(), HandleError> {
        self.send(VoiceMessage::SetModRate(rate))
    }

    pub fn set_mod_depth(&mut self, depth: i32) -> Result<(), HandleError> {
        self.send(VoiceMessage::SetModDepth(depth))
    }

    pub fn set_lag(&mut self, lag: f32) -> Result<(), HandleError> {
        self.send(VoiceMessage::SetLag(lag))
    }

    pub fn reset_effects(&mut self) -> Result<(), HandleError> {
        self.send(VoiceMessage::ResetEffects)
    }

    /// Most recent status published by the audio thread.
    pub fn latest_status(&self) -> VoiceStatus {
        self.status.load()
    }
}

impl CompositeVoice {
    /// Split into an audio-thread voice and a control handle.
    pub fn into_shared(self) -> (SharedVoice, VoiceHandle) {
        SharedVoice::new(self, DEFAULT_QUEUE_SIZE)
    }
}

fn status_of(voice: &CompositeVoice, produced: bool) -> VoiceStatus {
    VoiceStatus {
        state: voice.state(),
        level: voice.envelope_level(),
        playing: voice.is_playing(),
        produced,
    }
}
