//! Fixed timestep simulation tick
//!
//! `step` is the single authoritative update. It applies the queued commands
//! first, then runs every simulation tick that the elapsed time pays for.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::collision::detect;
use super::events::EffectSink;
use super::player::{Move, apply_move};
use super::state::{GamePhase, GameState};
use super::vehicle::advance_vehicles;
use crate::consts::MAX_SUBSTEPS;

/// One-shot input commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    TogglePause,
    Start,
    Restart,
    QuitToMenu,
}

impl Command {
    pub fn as_move(self) -> Option<Move> {
        match self {
            Command::MoveUp => Some(Move::Up),
            Command::MoveDown => Some(Move::Down),
            Command::MoveLeft => Some(Move::Left),
            Command::MoveRight => Some(Move::Right),
            _ => None,
        }
    }
}

impl From<Move> for Command {
    fn from(mv: Move) -> Self {
        match mv {
            Move::Up => Command::MoveUp,
            Move::Down => Command::MoveDown,
            Move::Left => Command::MoveLeft,
            Move::Right => Command::MoveRight,
        }
    }
}

/// Apply one command; commands that make no sense in the current phase are dropped
pub fn apply_command(state: &mut GameState, command: Command, sink: &mut impl EffectSink) {
    use GamePhase::*;

    match (state.phase(), command.as_move()) {
        (Playing, Some(mv)) => {
            state.player = apply_move(state.player, mv);
            return;
        }
        (phase, Some(_)) => {
            log::trace!("Ignoring {:?} in {:?}", command, phase);
            return;
        }
        _ => {}
    }

    match (state.phase(), command) {
        (Playing | Paused, Command::TogglePause) => state.toggle_pause(sink),
        (Menu | GameOver, Command::Start) => state.start_new_game(sink),
        (Playing | Paused | GameOver, Command::Restart) => state.start_new_game(sink),
        (_, Command::QuitToMenu) => state.return_to_menu(sink),
        (phase, cmd) => log::trace!("Ignoring {:?} in {:?}", cmd, phase),
    }
}

/// Apply `commands`, then advance the simulation by `dt` of wall time.
///
/// Ticks only run while playing. At most `MAX_SUBSTEPS` ticks run per call;
/// any larger backlog is dropped. Returns the number of ticks run.
pub fn step(
    state: &mut GameState,
    commands: &[Command],
    dt: Duration,
    sink: &mut impl EffectSink,
) -> u32 {
    for &command in commands {
        apply_command(state, command, sink);
    }

    if !state.session.is_playing() {
        return 0;
    }

    let period = state.tuning.tick_period();
    state.tick_accumulator += dt;

    let mut substeps = 0;
    while state.tick_accumulator >= period && substeps < MAX_SUBSTEPS {
        state.tick_accumulator -= period;
        tick(state, sink);
        substeps += 1;

        if !state.session.is_playing() {
            break;
        }
    }

    if state.tick_accumulator >= period {
        log::debug!(
            "Dropping {:?} of simulation backlog",
            state.tick_accumulator
        );
        state.tick_accumulator = Duration::ZERO;
    }

    substeps
}

/// Advance the game by exactly one simulation tick
pub fn tick(state: &mut GameState, sink: &mut impl EffectSink) {
    if !state.session.is_playing() {
        return;
    }

    state.time_ticks += 1;
    advance_vehicles(&mut state.vehicles);

    // Reactions reset the player in the same tick, so an overlap costs one life
    let detection = detect(state.player, &state.vehicles, &state.tuning.hitbox);
    if detection.collision {
        state.on_collision(sink);
        if !state.session.is_playing() {
            return;
        }
    }
    if detection.delivery {
        state.on_delivery(sink);
    }

    let countdown = state.tuning.countdown_period();
    state.countdown_accumulator += state.tuning.tick_period();
    while state.countdown_accumulator >= countdown {
        state.countdown_accumulator -= countdown;
        state.session.time_left = state.session.time_left.saturating_sub(1);
        if state.session.time_left == 0 {
            state.on_timer_expire(sink);
            return;
        }
    }
}
