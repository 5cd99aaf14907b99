//! Keyboard to command mapping
//!
//! Movement is one cell per key press: once a move key is accepted, further
//! moves are dropped until a key is released. Auto-repeat never issues
//! commands.

use std::time::Duration;

use crate::settings::Settings;
use crate::sim::{Command, EffectSink, GamePhase, GameState, step};

/// Map a `KeyboardEvent.key` value to a command
pub fn key_command(key: &str) -> Option<Command> {
    let command = match key.to_lowercase().as_str() {
        "w" | "arrowup" => Command::MoveUp,
        "s" | "arrowdown" => Command::MoveDown,
        "a" | "arrowleft" => Command::MoveLeft,
        "d" | "arrowright" => Command::MoveRight,
        "p" | "escape" => Command::TogglePause,
        "enter" | " " => Command::Start,
        "r" => Command::Restart,
        "q" | "m" => Command::QuitToMenu,
        _ => return None,
    };
    Some(command)
}

/// Press/release edge detector
#[derive(Debug, Default, Clone)]
pub struct KeyGate {
    /// A move was accepted and no key has been released since
    holding: bool,
}

impl KeyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press. Returns the command to forward, if any.
    pub fn press(&mut self, key: &str, repeat: bool) -> Option<Command> {
        if repeat {
            return None;
        }
        let command = key_command(key)?;
        if command.as_move().is_some() {
            if self.holding {
                log::trace!("Move {:?} dropped until release", command);
                return None;
            }
            self.holding = true;
        }
        Some(command)
    }

    /// Any key release re-arms movement
    pub fn release(&mut self) {
        self.holding = false;
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }
}

/// Command to issue when the window loses focus
pub fn blur_command(phase: GamePhase, settings: &Settings) -> Option<Command> {
    (settings.pause_on_blur && phase == GamePhase::Playing).then_some(Command::TogglePause)
}

/// Commands gathered between frames
#[derive(Debug, Default, Clone)]
pub struct CommandQueue {
    pending: Vec<Command>,
    /// Focus was lost since the last frame
    blurred: bool,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.pending.extend(commands);
    }

    /// Note a focus loss; the pause is decided when the frame runs
    pub fn blur(&mut self) {
        self.blurred = true;
    }

    /// Run one frame: queued commands, then the blur pause against the phase
    /// they leave behind, then `dt` of simulation. Returns the ticks run.
    pub fn run_frame(
        &mut self,
        state: &mut GameState,
        settings: &Settings,
        dt: Duration,
        sink: &mut impl EffectSink,
    ) -> u32 {
        let commands = std::mem::take(&mut self.pending);
        step(state, &commands, Duration::ZERO, sink);

        if std::mem::take(&mut self.blurred) {
            if let Some(command) = blur_command(state.phase(), settings) {
                log::info!("Auto-paused (window blur)");
                step(state, &[command], Duration::ZERO, sink);
            }
        }
        step(state, &[], dt, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::NullSink;

    #[test]
    fn test_key_map() {
        assert_eq!(key_command("W"), Some(Command::MoveUp));
        assert_eq!(key_command("ArrowLeft"), Some(Command::MoveLeft));
        assert_eq!(key_command("Escape"), Some(Command::TogglePause));
        assert_eq!(key_command(" "), Some(Command::Start));
        assert_eq!(key_command("x"), None);
    }

    #[test]
    fn test_one_move_per_press() {
        let mut gate = KeyGate::new();
        assert_eq!(gate.press("w", false), Some(Command::MoveUp));
        // Second key while the first is held
        assert_eq!(gate.press("d", false), None);
        gate.release();
        assert_eq!(gate.press("d", false), Some(Command::MoveRight));
    }

    #[test]
    fn test_repeat_ignored() {
        let mut gate = KeyGate::new();
        assert_eq!(gate.press("w", true), None);
        assert!(!gate.is_holding());
        assert_eq!(gate.press("p", true), None);
    }

    #[test]
    fn test_non_moves_bypass_gate() {
        let mut gate = KeyGate::new();
        gate.press("s", false);
        assert_eq!(gate.press("p", false), Some(Command::TogglePause));
        assert_eq!(gate.press("q", false), Some(Command::QuitToMenu));
    }

    #[test]
    fn test_blur_pauses_only_when_playing() {
        let settings = Settings::default();
        assert_eq!(
            blur_command(GamePhase::Playing, &settings),
            Some(Command::TogglePause)
        );
        assert_eq!(blur_command(GamePhase::Paused, &settings), None);
        assert_eq!(blur_command(GamePhase::Menu, &settings), None);

        let settings = Settings {
            pause_on_blur: false,
            ..Settings::default()
        };
        assert_eq!(blur_command(GamePhase::Playing, &settings), None);
    }

    fn playing() -> GameState {
        let mut state = GameState::new(4);
        step(&mut state, &[Command::Start], Duration::ZERO, &mut NullSink);
        state
    }

    #[test]
    fn test_pause_key_and_blur_in_one_frame_stay_paused() {
        let mut state = playing();
        let mut queue = CommandQueue::new();
        queue.push(Command::TogglePause);
        queue.blur();

        let ticks = queue.run_frame(
            &mut state,
            &Settings::default(),
            Duration::from_millis(50),
            &mut NullSink,
        );
        assert_eq!(ticks, 0);
        assert_eq!(state.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_blur_alone_pauses_once() {
        let mut state = playing();
        let mut queue = CommandQueue::new();
        queue.blur();
        queue.run_frame(&mut state, &Settings::default(), Duration::ZERO, &mut NullSink);
        assert_eq!(state.phase(), GamePhase::Paused);

        // Blur is consumed; the next frame leaves the pause alone
        queue.run_frame(&mut state, &Settings::default(), Duration::ZERO, &mut NullSink);
        assert_eq!(state.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_queued_moves_run_before_ticks() {
        let mut state = playing();
        state.vehicles.clear();
        let mut queue = CommandQueue::new();
        queue.extend([Command::MoveUp; 10]);

        let ticks = queue.run_frame(
            &mut state,
            &Settings::default(),
            Duration::from_millis(50),
            &mut NullSink,
        );
        assert_eq!(ticks, 1);
        assert_eq!(state.session.score, 1);
    }
}
