//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard → commands)
//! - Time (wall-clock timestamps → frame deltas)

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{CommandQueue, KeyGate, blur_command};
