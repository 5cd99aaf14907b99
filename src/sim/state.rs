//! Game state and core simulation types
//!
//! Everything needed to reproduce a run lives here: seed, RNG stream, rules,
//! session counters, player cell, vehicles and the tick accumulators.

use std::time::Duration;

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{Cue, EffectSink, GameEvent};
use super::grid::GridPosition;
use super::vehicle::{Vehicle, spawn_vehicles};
use crate::consts::LOW_TIME_SECS;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no game running
    Menu,
    /// Active gameplay
    Playing,
    /// Game suspended, state retained
    Paused,
    /// Run ended, final score on display
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    LivesDepleted,
    TimeExpired,
}

/// Score, lives and countdown for the current run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub score: u32,
    pub lives: u8,
    /// Whole seconds remaining
    pub time_left: u32,
    pub phase: GamePhase,
    pub over_reason: Option<GameOverReason>,
}

impl GameSession {
    /// Fresh counters, parked in the menu
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives,
            time_left: tuning.time_budget_secs,
            phase: GamePhase::Menu,
            over_reason: None,
        }
    }

    /// A game has been started since the last return to the menu
    pub fn started(&self) -> bool {
        self.phase != GamePhase::Menu
    }

    pub fn paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    /// Bumped on every new game so vehicle phases differ between runs
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }

    /// Advance to a fresh stream and return its generator
    pub fn next_rng(&mut self) -> Pcg32 {
        self.stream = self.stream.wrapping_add(1);
        self.to_rng()
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub tuning: Tuning,
    pub session: GameSession,
    pub player: GridPosition,
    /// Empty while in the menu
    pub vehicles: Vec<Vehicle>,
    /// Simulation ticks run in the current game
    pub time_ticks: u64,
    /// Wall time not yet consumed by a tick
    pub(crate) tick_accumulator: Duration,
    /// Simulated time toward the next countdown second
    pub(crate) countdown_accumulator: Duration,
}

impl GameState {
    /// Create a state in the menu with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            session: GameSession::new(&tuning),
            tuning,
            player: GridPosition::START,
            vehicles: Vec::new(),
            time_ticks: 0,
            tick_accumulator: Duration::ZERO,
            countdown_accumulator: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    fn reset_clocks(&mut self) {
        self.time_ticks = 0;
        self.tick_accumulator = Duration::ZERO;
        self.countdown_accumulator = Duration::ZERO;
    }

    /// Reset counters, respawn traffic with fresh phases, and start playing
    pub fn start_new_game(&mut self, sink: &mut impl EffectSink) {
        let mut rng = self.rng_state.next_rng();
        self.vehicles = spawn_vehicles(&self.tuning.lanes, &mut rng);
        self.session = GameSession::new(&self.tuning);
        self.session.phase = GamePhase::Playing;
        self.player = GridPosition::START;
        self.reset_clocks();

        log::info!(
            "New game (seed {}, stream {})",
            self.seed,
            self.rng_state.stream
        );
        sink.event(GameEvent::GameStarted);
        sink.cue(Cue::MusicStart);
    }

    /// Flip between Playing and Paused; ignored in other phases
    pub fn toggle_pause(&mut self, sink: &mut impl EffectSink) {
        match self.session.phase {
            GamePhase::Playing => {
                self.session.phase = GamePhase::Paused;
                log::info!("Paused with {}s left", self.session.time_left);
                sink.event(GameEvent::Paused);
                sink.cue(Cue::MusicStop);
            }
            GamePhase::Paused => {
                self.session.phase = GamePhase::Playing;
                log::info!("Resumed");
                sink.event(GameEvent::Resumed);
                sink.cue(Cue::MusicStart);
            }
            phase => log::trace!("Pause ignored in {:?}", phase),
        }
    }

    /// Back to the title screen with default counters. Ignored while playing.
    pub fn return_to_menu(&mut self, sink: &mut impl EffectSink) {
        let from = self.session.phase;
        if from == GamePhase::Playing {
            log::trace!("Return to menu ignored while playing");
            return;
        }

        self.session = GameSession::new(&self.tuning);
        self.player = GridPosition::START;
        self.vehicles.clear();
        self.reset_clocks();

        // Music already stopped on pause / game over
        if from != GamePhase::Menu {
            log::info!("Returned to menu from {:?}", from);
            sink.event(GameEvent::ReturnedToMenu { from });
        }
    }

    /// A vehicle hit the cyclist
    pub fn on_collision(&mut self, sink: &mut impl EffectSink) {
        self.session.lives = self.session.lives.saturating_sub(1);
        log::debug!("Collision, {} lives left", self.session.lives);
        sink.event(GameEvent::Collision {
            lives_left: self.session.lives,
        });
        sink.cue(Cue::PlayCollision);

        if self.session.lives == 0 {
            self.end_game(GameOverReason::LivesDepleted, sink);
        } else {
            self.player = GridPosition::START;
        }
    }

    /// The cyclist reached the destination row
    pub fn on_delivery(&mut self, sink: &mut impl EffectSink) {
        self.session.score += 1;
        self.session.time_left = self
            .session
            .time_left
            .saturating_add(self.tuning.delivery_bonus_secs)
            .min(self.tuning.time_budget_secs);
        self.player = GridPosition::START;

        log::debug!(
            "Delivery #{}, {}s left",
            self.session.score,
            self.session.time_left
        );
        sink.event(GameEvent::Delivery {
            score: self.session.score,
            time_left: self.session.time_left,
        });
        sink.cue(Cue::PlayDelivery);
    }

    /// The countdown hit zero
    pub fn on_timer_expire(&mut self, sink: &mut impl EffectSink) {
        self.session.time_left = 0;
        self.end_game(GameOverReason::TimeExpired, sink);
    }

    fn end_game(&mut self, reason: GameOverReason, sink: &mut impl EffectSink) {
        self.session.phase = GamePhase::GameOver;
        self.session.over_reason = Some(reason);
        self.tick_accumulator = Duration::ZERO;
        self.countdown_accumulator = Duration::ZERO;

        log::info!(
            "Game over ({:?}): {} deliveries",
            reason,
            self.session.score
        );
        sink.event(GameEvent::GameOver {
            reason,
            score: self.session.score,
        });
        sink.cue(Cue::MusicStop);
    }

    /// Seconds of play elapsed in the current game
    pub fn elapsed_secs(&self) -> f32 {
        self.time_ticks as f32 * self.tuning.tick_ms as f32 / 1000.0
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot {
        let session = &self.session;
        Snapshot {
            phase: session.phase,
            session: SessionSnapshot {
                score: session.score,
                lives: session.lives,
                time_left: session.time_left,
                started: session.started(),
                paused: session.paused(),
                over: session.over(),
                over_reason: session.over_reason,
                time_fraction: session.time_left as f32 / self.tuning.time_budget_secs as f32,
                time_low: session.time_left < LOW_TIME_SECS,
            },
            player: self.player,
            vehicles: self.vehicles.clone(),
        }
    }
}

/// HUD-facing session fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub score: u32,
    pub lives: u8,
    pub time_left: u32,
    pub started: bool,
    pub paused: bool,
    pub over: bool,
    pub over_reason: Option<GameOverReason>,
    /// Remaining share of the time budget, for the time bar
    pub time_fraction: f32,
    /// Under ten seconds left
    pub time_low: bool,
}

/// One frame of authoritative state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub session: SessionSnapshot,
    pub player: GridPosition,
    pub vehicles: Vec<Vehicle>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::Outbox;

    #[test]
    fn test_new_state_is_menu() {
        let state = GameState::new(1);
        assert_eq!(state.phase(), GamePhase::Menu);
        assert!(!state.session.started());
        assert!(state.vehicles.is_empty());
        assert_eq!(state.session.lives, 3);
        assert_eq!(state.session.time_left, 60);
    }

    #[test]
    fn test_start_new_game_spawns_traffic() {
        let mut state = GameState::new(1);
        let mut out = Outbox::new();
        state.start_new_game(&mut out);

        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.vehicles.len(), 8);
        assert_eq!(state.player, GridPosition::START);
        assert_eq!(out.events, vec![GameEvent::GameStarted]);
        assert_eq!(out.cues, vec![Cue::MusicStart]);
    }

    #[test]
    fn test_each_game_gets_fresh_phases() {
        let mut state = GameState::new(9);
        state.start_new_game(&mut Outbox::new());
        let first = state.vehicles.clone();
        state.start_new_game(&mut Outbox::new());
        assert_ne!(first, state.vehicles);

        // Same seed replays the same sequence
        let mut replay = GameState::new(9);
        replay.start_new_game(&mut Outbox::new());
        assert_eq!(first, replay.vehicles);
    }

    #[test]
    fn test_collision_costs_one_life_and_resets() {
        let mut state = GameState::new(1);
        state.start_new_game(&mut Outbox::new());
        state.player = GridPosition { row: 3, col: 3 };

        let mut out = Outbox::new();
        state.on_collision(&mut out);
        assert_eq!(state.session.lives, 2);
        assert_eq!(state.player, GridPosition::START);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(out.cues, vec![Cue::PlayCollision]);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = GameState::new(1);
        state.start_new_game(&mut Outbox::new());
        state.session.lives = 1;

        let mut out = Outbox::new();
        state.on_collision(&mut out);
        assert_eq!(state.session.lives, 0);
        assert!(state.session.over());
        assert_eq!(state.session.over_reason, Some(GameOverReason::LivesDepleted));
        assert!(out.events.contains(&GameEvent::GameOver {
            reason: GameOverReason::LivesDepleted,
            score: 0
        }));
        assert_eq!(out.cues.last(), Some(&Cue::MusicStop));
    }

    #[test]
    fn test_delivery_bonus_is_capped() {
        let mut state = GameState::new(1);
        state.start_new_game(&mut Outbox::new());

        state.on_delivery(&mut Outbox::new());
        assert_eq!(state.session.score, 1);
        assert_eq!(state.session.time_left, 60);

        state.session.time_left = 20;
        state.on_delivery(&mut Outbox::new());
        assert_eq!(state.session.score, 2);
        assert_eq!(state.session.time_left, 25);
    }

    #[test]
    fn test_huge_bonus_saturates_at_budget() {
        let tuning = Tuning {
            delivery_bonus_secs: u32::MAX,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(1, tuning);
        state.start_new_game(&mut Outbox::new());
        state.session.time_left = 30;

        state.on_delivery(&mut Outbox::new());
        assert_eq!(state.session.time_left, 60);
    }

    #[test]
    fn test_pause_only_from_play() {
        let mut state = GameState::new(1);
        let mut out = Outbox::new();
        state.toggle_pause(&mut out);
        assert_eq!(state.phase(), GamePhase::Menu);
        assert!(out.is_empty());

        state.start_new_game(&mut out);
        state.toggle_pause(&mut out);
        assert!(state.session.paused());
        state.toggle_pause(&mut out);
        assert!(state.session.is_playing());
    }

    #[test]
    fn test_return_to_menu_idempotent() {
        let mut state = GameState::new(5);
        state.start_new_game(&mut Outbox::new());
        state.session.score = 4;
        state.toggle_pause(&mut Outbox::new());

        state.return_to_menu(&mut Outbox::new());
        let once = state.snapshot();
        let mut out = Outbox::new();
        state.return_to_menu(&mut out);
        assert_eq!(state.snapshot(), once);
        assert!(out.is_empty());
        assert_eq!(once.phase, GamePhase::Menu);
        assert_eq!(once.session.score, 0);
        assert!(once.vehicles.is_empty());
    }

    #[test]
    fn test_return_to_menu_ignored_while_playing() {
        let mut state = GameState::new(5);
        state.start_new_game(&mut Outbox::new());
        state.return_to_menu(&mut Outbox::new());
        assert_eq!(state.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_snapshot_flags() {
        let mut state = GameState::new(3);
        state.start_new_game(&mut Outbox::new());
        state.session.time_left = 9;
        let snap = state.snapshot();
        assert!(snap.session.started);
        assert!(!snap.session.paused);
        assert!(!snap.session.over);
        assert!(snap.session.time_low);
        assert!((snap.session.time_fraction - 0.15).abs() < 1e-6);

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"time_left\":9"));
    }
}
