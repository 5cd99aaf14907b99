//! Data-driven game balance
//!
//! Defaults reproduce the classic fixed lane table and rules.
//! A JSON file may override any subset of fields.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::collision::HitboxConfig;
use crate::sim::grid::{LaneKind, lane_kind};
use crate::sim::vehicle::{DEFAULT_LANES, LaneConfig};

/// Rules and traffic layout for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub starting_lives: u8,
    /// Countdown at the start of a game, also the cap for bonuses
    pub time_budget_secs: u32,
    /// Seconds added per delivery
    pub delivery_bonus_secs: u32,
    /// Simulation tick period
    pub tick_ms: u64,
    /// Countdown period
    pub countdown_ms: u64,
    pub hitbox: HitboxConfig,
    pub lanes: Vec<LaneConfig>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            time_budget_secs: TIME_BUDGET_SECS,
            delivery_bonus_secs: DELIVERY_BONUS_SECS,
            tick_ms: SIM_TICK_MS,
            countdown_ms: COUNTDOWN_MS,
            hitbox: HitboxConfig::default(),
            lanes: DEFAULT_LANES.to_vec(),
        }
    }
}

impl Tuning {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn countdown_period(&self) -> Duration {
        Duration::from_millis(self.countdown_ms)
    }

    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json).map_err(TuningError::Parse)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        serde_json::to_string_pretty(self).map_err(TuningError::Parse)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.starting_lives == 0 {
            return Err(TuningError::NoLives);
        }
        if self.time_budget_secs == 0 {
            return Err(TuningError::NoTime);
        }
        if self.delivery_bonus_secs > self.time_budget_secs {
            return Err(TuningError::BonusOverBudget {
                bonus: self.delivery_bonus_secs,
                budget: self.time_budget_secs,
            });
        }
        if self.tick_ms == 0 {
            return Err(TuningError::ZeroPeriod("tick_ms"));
        }
        if self.countdown_ms == 0 {
            return Err(TuningError::ZeroPeriod("countdown_ms"));
        }

        let hb = &self.hitbox;
        let widths = [hb.unit_width, hb.player_width, hb.vehicle_length];
        if widths.iter().any(|w| !w.is_finite() || *w <= 0.0) || hb.player_width > hb.unit_width
        {
            return Err(TuningError::BadHitbox(*hb));
        }

        for lane in &self.lanes {
            // Traffic on a sidewalk would let a delivery and a crash coincide
            if lane_kind(lane.row) != LaneKind::Road {
                return Err(TuningError::LaneOffRoad { row: lane.row });
            }
            if !lane.speed.is_finite() || lane.speed <= 0.0 {
                return Err(TuningError::BadSpeed {
                    row: lane.row,
                    speed: lane.speed,
                });
            }
        }
        Ok(())
    }
}

/// Why a tuning document was rejected
#[derive(Debug)]
pub enum TuningError {
    /// Malformed JSON or wrong field types
    Parse(serde_json::Error),
    NoLives,
    NoTime,
    /// Per-delivery bonus larger than the whole time budget
    BonusOverBudget { bonus: u32, budget: u32 },
    /// A period field is zero
    ZeroPeriod(&'static str),
    BadHitbox(HitboxConfig),
    /// Lane placed on a sidewalk or outside the grid
    LaneOffRoad { row: u8 },
    BadSpeed { row: u8, speed: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "invalid tuning document: {e}"),
            TuningError::NoLives => write!(f, "starting_lives must be at least 1"),
            TuningError::NoTime => write!(f, "time_budget_secs must be at least 1"),
            TuningError::BonusOverBudget { bonus, budget } => write!(
                f,
                "delivery_bonus_secs ({bonus}) exceeds time_budget_secs ({budget})"
            ),
            TuningError::ZeroPeriod(field) => write!(f, "{field} must be greater than zero"),
            TuningError::BadHitbox(hb) => write!(
                f,
                "hitbox widths must be positive and player_width <= unit_width (got {hb:?})"
            ),
            TuningError::LaneOffRoad { row } => write!(f, "lane on row {row} is not a road"),
            TuningError::BadSpeed { row, speed } => {
                write!(f, "lane on row {row} has invalid speed {speed}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            _ => None,
        }
    }
}
