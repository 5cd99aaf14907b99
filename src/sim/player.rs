//! Cyclist movement on the grid
//!
//! One cell per accepted command, clamped at the board edges.

use serde::{Deserialize, Serialize};

use super::grid::GridPosition;

/// A single-cell step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

/// Apply a move, clamping instead of wrapping at the edges
pub fn apply_move(pos: GridPosition, mv: Move) -> GridPosition {
    let GridPosition { row, col } = pos;
    match mv {
        Move::Up => GridPosition::clamped(row.saturating_sub(1), col),
        Move::Down => GridPosition::clamped(row.saturating_add(1), col),
        Move::Left => GridPosition::clamped(row, col.saturating_sub(1)),
        Move::Right => GridPosition::clamped(row, col.saturating_add(1)),
    }
}
