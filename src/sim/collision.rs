//! Collision and delivery detection
//!
//! Axis-aligned interval overlap on the track, scoped to the player's row.
//! Both results are level-triggered: they fire every tick the condition holds,
//! so the caller must move the player out of the way when it reacts.

use serde::{Deserialize, Serialize};

use super::grid::GridPosition;
use super::vehicle::Vehicle;

/// Widths used for overlap tests, in track units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxConfig {
    /// Track distance between adjacent columns
    pub unit_width: f32,
    /// Occupied width of the cyclist (narrower than a unit for some slack)
    pub player_width: f32,
    pub vehicle_length: f32,
}

impl Default for HitboxConfig {
    fn default() -> Self {
        use crate::consts::{PLAYER_WIDTH, UNIT_WIDTH, VEHICLE_LENGTH};
        Self {
            unit_width: UNIT_WIDTH,
            player_width: PLAYER_WIDTH,
            vehicle_length: VEHICLE_LENGTH,
        }
    }
}

/// Half-open interval `[min, max)` on the track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub fn new(min: f32, width: f32) -> Self {
        Self {
            min,
            max: min + width,
        }
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.min < other.max && self.max > other.min
    }
}

impl HitboxConfig {
    pub fn player_span(&self, pos: GridPosition) -> Span {
        Span::new(pos.col as f32 * self.unit_width, self.player_width)
    }

    pub fn vehicle_span_at(&self, x: f32) -> Span {
        Span::new(x, self.vehicle_length)
    }

    pub fn vehicle_span(&self, vehicle: &Vehicle) -> Span {
        self.vehicle_span_at(vehicle.x)
    }
}

/// Outcome of one detection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Detection {
    /// At least one vehicle in the player's row overlaps the player
    pub collision: bool,
    /// The player stands on the destination row
    pub delivery: bool,
}

/// Does any vehicle in the player's row overlap the player?
pub fn player_hit(pos: GridPosition, vehicles: &[Vehicle], hitbox: &HitboxConfig) -> bool {
    let player = hitbox.player_span(pos);
    vehicles
        .iter()
        .filter(|v| v.row == pos.row)
        .any(|v| player.overlaps(&hitbox.vehicle_span(v)))
}

/// Run both checks for the current tick
pub fn detect(pos: GridPosition, vehicles: &[Vehicle], hitbox: &HitboxConfig) -> Detection {
    Detection {
        collision: player_hit(pos, vehicles, hitbox),
        delivery: pos.is_destination(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::vehicle::{Direction, LaneConfig, VehicleKind};
    use proptest::prelude::*;

    fn car(row: u8, x: f32) -> Vehicle {
        Vehicle::from_lane(
            1,
            &LaneConfig::new(row, 1.0, Direction::Right, VehicleKind::Car1),
            x,
        )
    }

    #[test]
    fn test_span_overlap_is_strict() {
        let a = Span::new(30.0, 8.0);
        assert!(a.overlaps(&Span::new(25.0, 10.0)));
        assert!(a.overlaps(&Span::new(37.9, 10.0)));
        // Touching edges do not overlap
        assert!(!a.overlaps(&Span::new(20.0, 10.0)));
        assert!(!a.overlaps(&Span::new(38.0, 10.0)));
    }

    #[test]
    fn test_player_span_uses_forgiveness_margin() {
        let hitbox = HitboxConfig::default();
        let span = hitbox.player_span(GridPosition { row: 3, col: 3 });
        assert_eq!(span, Span { min: 30.0, max: 38.0 });
    }

    #[test]
    fn test_hit_window_for_column_three() {
        let hitbox = HitboxConfig::default();
        let pos = GridPosition { row: 3, col: 3 };
        // Overlap exactly when x is in (20, 38)
        for (x, expected) in [
            (20.0, false),
            (20.1, true),
            (29.0, true),
            (37.9, true),
            (38.0, false),
        ] {
            assert_eq!(
                player_hit(pos, &[car(3, x)], &hitbox),
                expected,
                "x = {x}"
            );
        }
    }

    #[test]
    fn test_multiple_overlaps_collapse() {
        let hitbox = HitboxConfig::default();
        let pos = GridPosition { row: 5, col: 0 };
        let detection = detect(pos, &[car(5, 0.0), car(5, 2.0), car(5, -5.0)], &hitbox);
        assert_eq!(
            detection,
            Detection {
                collision: true,
                delivery: false
            }
        );
    }

    #[test]
    fn test_delivery_independent_of_column() {
        let hitbox = HitboxConfig::default();
        for col in 0..10 {
            let detection = detect(GridPosition { row: 0, col }, &[], &hitbox);
            assert!(detection.delivery);
            assert!(!detection.collision);
        }
        assert!(!detect(GridPosition { row: 1, col: 5 }, &[], &hitbox).delivery);
    }

    proptest! {
        #[test]
        fn prop_other_rows_never_collide(
            player_row in 0u8..=10,
            vehicle_row in 0u8..=10,
            col in 0u8..=9,
            x in -10.0f32..=110.0,
        ) {
            prop_assume!(player_row != vehicle_row);
            let hitbox = HitboxConfig::default();
            let pos = GridPosition { row: player_row, col };
            prop_assert!(!player_hit(pos, &[car(vehicle_row, x)], &hitbox));
        }
    }
}
