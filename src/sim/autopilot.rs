//! Idle/demo mode player
//!
//! Looks a few ticks ahead and only steps into cells that stay clear. Used by
//! the headless runner and the web idle mode.

use super::collision::HitboxConfig;
use super::grid::GridPosition;
use super::player::{Move, apply_move};
use super::state::GameState;
use super::tick::Command;
use super::vehicle::Vehicle;

/// Ticks of traffic prediction when judging a cell
pub const LOOKAHEAD_TICKS: u32 = 4;

/// Is `pos` free of traffic for each of the next `ticks` ticks?
pub fn cell_stays_clear(
    pos: GridPosition,
    vehicles: &[Vehicle],
    hitbox: &HitboxConfig,
    ticks: u32,
) -> bool {
    let player = hitbox.player_span(pos);
    vehicles.iter().filter(|v| v.row == pos.row).all(|v| {
        (1..=ticks).all(|t| !player.overlaps(&hitbox.vehicle_span_at(v.position_after(t))))
    })
}

/// Pick the next command, or `None` to hold position
pub fn choose_command(state: &GameState) -> Option<Command> {
    if !state.session.is_playing() {
        return None;
    }

    let here = state.player;
    let hitbox = &state.tuning.hitbox;
    let clear = |pos: GridPosition| cell_stays_clear(pos, &state.vehicles, hitbox, LOOKAHEAD_TICKS);

    let up = apply_move(here, Move::Up);
    if up != here && clear(up) {
        return Some(Command::MoveUp);
    }
    if clear(here) {
        return None;
    }

    // Current cell is about to be hit: dodge sideways, then back
    [Move::Left, Move::Right, Move::Down]
        .into_iter()
        .map(|mv| (mv, apply_move(here, mv)))
        .find(|&(_, pos)| pos != here && clear(pos))
        .map(|(mv, _)| {
            log::debug!("Autopilot dodging {:?} from {:?}", mv, here);
            Command::from(mv)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::NullSink;
    use crate::sim::state::GamePhase;
    use crate::sim::tick::step;
    use crate::sim::vehicle::{Direction, LaneConfig, VehicleKind};
    use crate::tuning::Tuning;
    use std::time::Duration;

    fn playing_with_lanes(lanes: Vec<LaneConfig>) -> GameState {
        let tuning = Tuning {
            lanes,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(11, tuning);
        step(&mut state, &[Command::Start], Duration::ZERO, &mut NullSink);
        state
    }

    #[test]
    fn test_idle_outside_play() {
        let state = GameState::new(1);
        assert_eq!(state.phase(), GamePhase::Menu);
        assert_eq!(choose_command(&state), None);
    }

    #[test]
    fn test_empty_road_goes_up() {
        let state = playing_with_lanes(Vec::new());
        assert_eq!(choose_command(&state), Some(Command::MoveUp));
    }

    #[test]
    fn test_waits_for_oncoming_vehicle() {
        let mut state = playing_with_lanes(vec![LaneConfig::new(
            9,
            1.0,
            Direction::Right,
            VehicleKind::Car1,
        )]);
        // Vehicle two ticks away from the player's column in row 9
        state.vehicles[0].x = 40.0;
        assert!(!cell_stays_clear(
            GridPosition { row: 9, col: 5 },
            &state.vehicles,
            &state.tuning.hitbox,
            LOOKAHEAD_TICKS
        ));
        assert_eq!(choose_command(&state), None);

        state.vehicles[0].x = 70.0;
        assert_eq!(choose_command(&state), Some(Command::MoveUp));
    }

    #[test]
    fn test_dodges_when_cell_is_threatened() {
        let mut state = playing_with_lanes(vec![
            LaneConfig::new(8, 1.0, Direction::Right, VehicleKind::Truck),
            LaneConfig::new(9, 1.0, Direction::Right, VehicleKind::Car1),
        ]);
        state.player = GridPosition { row: 9, col: 5 };
        // Row 8 blocks the way up, row 9 is about to hit the player from the left
        state.vehicles[0].x = 45.0;
        state.vehicles[1].x = 44.0;
        assert_eq!(choose_command(&state), Some(Command::MoveRight));
    }

    #[test]
    fn test_sidewalk_above_is_always_clear() {
        let mut state = playing_with_lanes(vec![LaneConfig::new(
            5,
            1.0,
            Direction::Right,
            VehicleKind::Truck,
        )]);
        state.player = GridPosition { row: 5, col: 5 };
        state.vehicles[0].x = 38.0;
        assert_eq!(choose_command(&state), Some(Command::MoveUp));
    }

    #[test]
    fn test_autopilot_crosses_light_traffic() {
        let mut state = playing_with_lanes(vec![LaneConfig::new(
            5,
            0.4,
            Direction::Left,
            VehicleKind::Truck,
        )]);
        let tick = state.tuning.tick_period();
        for _ in 0..1200 {
            let commands: Vec<Command> = choose_command(&state).into_iter().collect();
            step(&mut state, &commands, tick, &mut NullSink);
        }
        assert_eq!(state.session.lives, 3);
        assert!(state.session.score >= 3, "score {}", state.session.score);
        assert_eq!(state.phase(), GamePhase::Playing);
    }
}
