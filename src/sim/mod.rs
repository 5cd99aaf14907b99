//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (vehicles by lane)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod events;
pub mod grid;
pub mod player;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use autopilot::choose_command;
pub use collision::{Detection, HitboxConfig, Span, detect};
pub use events::{Cue, EffectSink, GameEvent, NullSink, Outbox};
pub use grid::{GridLayout, GridPosition, LaneKind, lane_kind};
pub use player::{Move, apply_move};
pub use state::{
    GameOverReason, GamePhase, GameSession, GameState, RngState, SessionSnapshot, Snapshot,
};
pub use tick::{Command, apply_command, step, tick};
pub use vehicle::{
    DEFAULT_LANES, Direction, LaneConfig, Vehicle, VehicleKind, advance_vehicles, spawn_vehicles,
};
