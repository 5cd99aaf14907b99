//! Browser entry point
//!
//! A JavaScript renderer owns the canvas/DOM. It forwards keyboard and focus
//! events here, calls `frame` from `requestAnimationFrame`, and draws the JSON
//! snapshot it gets back.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use crate::audio::{AudioManager, Playback};
use crate::highscores::HighScores;
use crate::platform::{CommandQueue, FrameClock, KeyGate};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, GridLayout, GridPosition, Outbox, choose_command};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("CrossCity starting...");
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Serialization failed: {e}");
        "null".to_string()
    })
}

/// Effects produced since the last `take_effects_json` call
#[derive(Serialize)]
struct EffectBatch {
    events: Vec<GameEvent>,
    audio: Vec<Playback>,
}

/// Game instance holding all state
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    gate: KeyGate,
    clock: FrameClock,
    /// Commands and focus loss received since the last frame
    queue: CommandQueue,
    outbox: Outbox,
    audio: AudioManager,
    scores: HighScores,
    layout: GridLayout,
    /// Autopilot plays the game
    idle_mode: bool,
}

#[wasm_bindgen]
impl WebGame {
    /// `settings_json` may be omitted or partial
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> WebGame {
        let settings = settings_json
            .as_deref()
            .map(Settings::from_json_or_default)
            .unwrap_or_default();
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);

        WebGame {
            state: GameState::new(seed),
            gate: KeyGate::new(),
            clock: FrameClock::new(),
            queue: CommandQueue::new(),
            outbox: Outbox::new(),
            audio: AudioManager::new(settings),
            scores: HighScores::new(),
            layout: GridLayout::default(),
            idle_mode: false,
        }
    }

    /// Handle `keydown`. Returns true when the key belongs to the game.
    pub fn key_down(&mut self, event: &KeyboardEvent) -> bool {
        let key = event.key();
        if key.eq_ignore_ascii_case("i") && !event.repeat() {
            self.idle_mode = !self.idle_mode;
            log::info!("Idle mode: {}", self.idle_mode);
            return true;
        }

        match self.gate.press(&key, event.repeat()) {
            Some(command) => {
                event.prevent_default();
                self.queue.push(command);
                true
            }
            None => false,
        }
    }

    /// Handle `keyup`
    pub fn key_up(&mut self) {
        self.gate.release();
    }

    /// Handle window `blur` / hidden tab
    pub fn blur(&mut self) {
        self.gate.release();
        self.queue.blur();
        self.clock.reset();
    }

    pub fn set_idle_mode(&mut self, on: bool) {
        self.idle_mode = on;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    /// Advance to the `requestAnimationFrame` timestamp
    pub fn frame(&mut self, now_ms: f64) {
        let dt = self.clock.delta(now_ms);
        if self.idle_mode {
            self.queue.extend(choose_command(&self.state));
        }

        let mut frame_out = Outbox::new();
        self.queue
            .run_frame(&mut self.state, self.audio.settings(), dt, &mut frame_out);

        for &cue in &frame_out.cues {
            self.audio.play(cue);
        }
        if frame_out
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }))
        {
            self.scores.record(&self.state, js_sys::Date::now());
        }
        self.outbox.events.extend(frame_out.events);
        self.outbox.cues.extend(frame_out.cues);
    }

    pub fn snapshot_json(&self) -> String {
        to_json(&self.state.snapshot())
    }

    /// Events and resolved audio requests since the last call
    pub fn take_effects_json(&mut self) -> String {
        let batch = EffectBatch {
            events: self.outbox.drain().events,
            audio: self.audio.drain(),
        };
        to_json(&batch)
    }

    /// Resize the pixel layout to the board element
    pub fn resize(&mut self, width: f32, height: f32) {
        self.layout = GridLayout::fit(width, height);
    }

    pub fn layout_json(&self) -> String {
        to_json(&self.layout)
    }

    /// Top-left pixel `[x, y]` of a cell
    pub fn cell_origin(&self, row: u8, col: u8) -> Vec<f32> {
        self.layout
            .cell_origin(GridPosition::clamped(row, col))
            .to_array()
            .to_vec()
    }

    /// Top pixel edge of a lane
    pub fn lane_top(&self, row: u8) -> f32 {
        self.layout.lane_top(row)
    }

    /// Left pixel edge of a vehicle at track position `x`
    pub fn vehicle_left(&self, x: f32) -> f32 {
        self.layout.vehicle_left(x)
    }

    pub fn high_scores_json(&self) -> String {
        to_json(&self.scores)
    }
}
