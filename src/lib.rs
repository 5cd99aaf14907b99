//! CrossCity - A street-crossing delivery arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, traffic, collisions, game state)
//! - `platform`: Browser/native input and timing
//! - `audio`: Cue playback boundary
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `highscores`: Session leaderboard

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Grid dimensions
    pub const GRID_ROWS: u8 = 11;
    pub const GRID_COLS: u8 = 10;

    /// Special rows
    pub const DESTINATION_ROW: u8 = 0;
    pub const MEDIAN_ROW: u8 = 4;
    pub const START_ROW: u8 = 10;
    pub const START_COL: u8 = 5;

    /// Track geometry (0..100 is the visible width)
    pub const TRACK_WIDTH: f32 = 100.0;
    pub const WRAP_MIN: f32 = -10.0;
    pub const WRAP_MAX: f32 = 110.0;

    /// Hitbox widths in track units
    pub const UNIT_WIDTH: f32 = 10.0;
    pub const PLAYER_WIDTH: f32 = 8.0;
    pub const VEHICLE_LENGTH: f32 = 10.0;

    /// Fixed simulation timestep (20 Hz)
    pub const SIM_TICK_MS: u64 = 50;
    /// Countdown period
    pub const COUNTDOWN_MS: u64 = 1000;
    /// Maximum ticks per step to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted from the platform clock
    pub const MAX_FRAME_MS: u64 = 100;

    /// Session rules
    pub const STARTING_LIVES: u8 = 3;
    pub const TIME_BUDGET_SECS: u32 = 60;
    pub const DELIVERY_BONUS_SECS: u32 = 5;
    /// HUD warns below this many seconds
    pub const LOW_TIME_SECS: u32 = 10;
}
