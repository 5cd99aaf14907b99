//! Vehicles and their wrap-around motion
//!
//! Each traffic lane carries one vehicle. Vehicles move a fixed distance per
//! tick along a normalized track (0..100 is the visible width) and wrap through
//! a 10-unit buffer on either side instead of despawning.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Travel direction along the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Toward negative x (-1)
    Left,
    /// Toward positive x (+1)
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Vehicle sprite family (renderer picks the art)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    Car1,
    Car2,
    Truck,
    Motorcycle,
}

/// One row of the lane table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneConfig {
    pub row: u8,
    /// Track units per tick
    pub speed: f32,
    pub direction: Direction,
    pub kind: VehicleKind,
}

impl LaneConfig {
    pub const fn new(row: u8, speed: f32, direction: Direction, kind: VehicleKind) -> Self {
        Self {
            row,
            speed,
            direction,
            kind,
        }
    }
}

/// The fixed traffic layout: one vehicle per road row
pub const DEFAULT_LANES: [LaneConfig; 8] = [
    LaneConfig::new(1, 0.6, Direction::Right, VehicleKind::Car1),
    LaneConfig::new(2, 0.8, Direction::Left, VehicleKind::Car2),
    LaneConfig::new(3, 0.5, Direction::Right, VehicleKind::Truck),
    // Row 4 is the median sidewalk
    LaneConfig::new(5, 0.7, Direction::Left, VehicleKind::Car1),
    LaneConfig::new(6, 0.9, Direction::Right, VehicleKind::Motorcycle),
    LaneConfig::new(7, 0.4, Direction::Right, VehicleKind::Truck),
    LaneConfig::new(8, 0.6, Direction::Left, VehicleKind::Car2),
    LaneConfig::new(9, 1.0, Direction::Right, VehicleKind::Car1),
];

/// A vehicle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u32,
    pub row: u8,
    pub speed: f32,
    pub direction: Direction,
    pub kind: VehicleKind,
    /// Left edge on the track, always within [WRAP_MIN, WRAP_MAX]
    pub x: f32,
}

impl Vehicle {
    pub fn from_lane(id: u32, lane: &LaneConfig, x: f32) -> Self {
        Self {
            id,
            row: lane.row,
            speed: lane.speed,
            direction: lane.direction,
            kind: lane.kind,
            x,
        }
    }

    /// Move one tick, wrapping past the buffer edge to the opposite side
    pub fn advance(&mut self) {
        self.x = self.position_after(1);
    }

    /// Track position after `ticks` more ticks, without mutating
    pub fn position_after(&self, ticks: u32) -> f32 {
        let mut x = self.x;
        for _ in 0..ticks {
            x += self.speed * self.direction.sign();
            match self.direction {
                Direction::Right if x > WRAP_MAX => x = WRAP_MIN,
                Direction::Left if x < WRAP_MIN => x = WRAP_MAX,
                _ => {}
            }
        }
        x
    }
}

/// Create one vehicle per lane with a random phase in [0, TRACK_WIDTH)
pub fn spawn_vehicles<R: Rng>(lanes: &[LaneConfig], rng: &mut R) -> Vec<Vehicle> {
    lanes
        .iter()
        .enumerate()
        .map(|(i, lane)| {
            let x = rng.random_range(0.0..TRACK_WIDTH);
            Vehicle::from_lane(i as u32 + 1, lane, x)
        })
        .collect()
}

/// Advance every vehicle by one tick
pub fn advance_vehicles(vehicles: &mut [Vehicle]) {
    for vehicle in vehicles {
        vehicle.advance();
    }
}
