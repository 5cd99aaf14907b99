//! Discrete effects emitted by the state machine
//!
//! The simulation never touches audio or UI directly. It writes events and
//! cues to an [`EffectSink`] supplied by the caller.

use serde::{Deserialize, Serialize};

use super::state::{GameOverReason, GamePhase};

/// Observable state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    Paused,
    Resumed,
    Collision { lives_left: u8 },
    Delivery { score: u32, time_left: u32 },
    GameOver { reason: GameOverReason, score: u32 },
    ReturnedToMenu { from: GamePhase },
}

/// Audio requests for the playback collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    PlayCollision,
    PlayDelivery,
    MusicStart,
    MusicStop,
}

/// Receiver for simulation side effects
pub trait EffectSink {
    fn event(&mut self, event: GameEvent);
    fn cue(&mut self, cue: Cue);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EffectSink for NullSink {
    fn event(&mut self, _event: GameEvent) {}
    fn cue(&mut self, _cue: Cue) {}
}

/// Buffers effects until the caller drains them
#[derive(Debug, Default, Clone, Serialize)]
pub struct Outbox {
    pub events: Vec<GameEvent>,
    pub cues: Vec<Cue>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.cues.is_empty()
    }

    /// Take the buffered effects, leaving the outbox empty
    pub fn drain(&mut self) -> Outbox {
        std::mem::take(self)
    }
}

impl EffectSink for Outbox {
    fn event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}
