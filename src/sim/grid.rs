//! Grid coordinates and lane classification
//!
//! The board is a fixed 11×10 grid. Rows run top to bottom: row 0 is the
//! destination sidewalk, row 10 the start sidewalk, row 4 a safe median.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What occupies a row of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneKind {
    /// Safe strip, no traffic
    Sidewalk,
    /// Traffic lane
    Road,
}

/// Classify a row. Rows outside the grid are treated as sidewalk.
pub const fn lane_kind(row: u8) -> LaneKind {
    match row {
        DESTINATION_ROW | MEDIAN_ROW | START_ROW => LaneKind::Sidewalk,
        r if r < GRID_ROWS => LaneKind::Road,
        _ => LaneKind::Sidewalk,
    }
}

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: u8,
    pub col: u8,
}

impl GridPosition {
    /// Where the cyclist starts and respawns
    pub const START: GridPosition = GridPosition {
        row: START_ROW,
        col: START_COL,
    };

    /// Build a position clamped onto the board
    pub fn clamped(row: u8, col: u8) -> Self {
        Self {
            row: row.min(GRID_ROWS - 1),
            col: col.min(GRID_COLS - 1),
        }
    }

    pub fn lane(&self) -> LaneKind {
        lane_kind(self.row)
    }

    pub fn is_destination(&self) -> bool {
        self.row == DESTINATION_ROW
    }
}

impl Default for GridPosition {
    fn default() -> Self {
        Self::START
    }
}

/// Cell-size configuration handed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub rows: u8,
    pub cols: u8,
    /// Pixel width of one column
    pub cell_width: f32,
    /// Pixel height of one row
    pub cell_height: f32,
}

impl Default for GridLayout {
    /// The 400×600 px board of the browser version
    fn default() -> Self {
        Self::fit(400.0, 600.0)
    }
}

impl GridLayout {
    /// Layout that fills a board of the given pixel size
    pub fn fit(width: f32, height: f32) -> Self {
        Self {
            rows: GRID_ROWS,
            cols: GRID_COLS,
            cell_width: width / GRID_COLS as f32,
            cell_height: height / GRID_ROWS as f32,
        }
    }

    pub fn board_size(&self) -> Vec2 {
        Vec2::new(
            self.cols as f32 * self.cell_width,
            self.rows as f32 * self.cell_height,
        )
    }

    /// Top-left pixel of a cell
    pub fn cell_origin(&self, pos: GridPosition) -> Vec2 {
        Vec2::new(
            pos.col as f32 * self.cell_width,
            pos.row as f32 * self.cell_height,
        )
    }

    /// Left pixel edge of a vehicle at track position `x` (percent of track width)
    pub fn vehicle_left(&self, x: f32) -> f32 {
        x / TRACK_WIDTH * self.board_size().x
    }

    /// Top pixel edge of a lane
    pub fn lane_top(&self, row: u8) -> f32 {
        row as f32 * self.cell_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_table() {
        let sidewalks: Vec<u8> = (0..GRID_ROWS)
            .filter(|&r| lane_kind(r) == LaneKind::Sidewalk)
            .collect();
        assert_eq!(sidewalks, vec![0, 4, 10]);
        for row in [1, 2, 3, 5, 6, 7, 8, 9] {
            assert_eq!(lane_kind(row), LaneKind::Road);
        }
        assert_eq!(lane_kind(42), LaneKind::Sidewalk);
    }

    #[test]
    fn test_start_cell() {
        let start = GridPosition::START;
        assert_eq!((start.row, start.col), (10, 5));
        assert_eq!(start.lane(), LaneKind::Sidewalk);
        assert!(!start.is_destination());
    }

    #[test]
    fn test_clamped() {
        assert_eq!(GridPosition::clamped(200, 200), GridPosition { row: 10, col: 9 });
        assert_eq!(GridPosition::clamped(3, 4), GridPosition { row: 3, col: 4 });
    }

    #[test]
    fn test_layout_pixels() {
        let layout = GridLayout::default();
        assert!((layout.cell_width - 40.0).abs() < 1e-4);
        assert!((layout.cell_height - 600.0 / 11.0).abs() < 1e-4);

        let origin = layout.cell_origin(GridPosition { row: 2, col: 3 });
        assert!((origin.x - 120.0).abs() < 1e-4);
        assert!((origin.y - 2.0 * 600.0 / 11.0).abs() < 1e-3);

        assert!((layout.lane_top(2) - origin.y).abs() < 1e-4);

        // Track position is a percentage of the board width
        assert!((layout.vehicle_left(50.0) - 200.0).abs() < 1e-4);
        assert!((layout.vehicle_left(-10.0) + 40.0).abs() < 1e-4);
    }
}
