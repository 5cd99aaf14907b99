//! CrossCity entry point
//!
//! The browser build is driven from JavaScript through `crosscity::web`.
//! Native builds run headless games played by the autopilot.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result};
    use clap::Parser;

    use crosscity::audio::AudioManager;
    use crosscity::sim::{
        Command, GameEvent, GamePhase, GameState, Outbox, choose_command, step,
    };
    use crosscity::{HighScores, Settings, Tuning};

    #[derive(Parser)]
    #[command(name = "crosscity")]
    #[command(about = "Headless CrossCity runs played by the autopilot")]
    struct Cli {
        /// RNG seed for vehicle phases (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of games to play back to back
        #[arg(long, default_value = "1")]
        games: u32,

        /// Abandon a game after this many simulated seconds
        #[arg(long, default_value = "600")]
        max_seconds: u64,

        /// JSON file overriding the default tuning
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Print a JSON snapshot every N simulated seconds (0 = never)
        #[arg(long, default_value = "0")]
        snapshot_every: u64,

        /// Drop audio cues instead of logging them
        #[arg(long)]
        mute: bool,
    }

    fn load_tuning(path: &Path) -> Result<Tuning> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        let tuning = Tuning::from_json(&text)
            .with_context(|| format!("invalid tuning in {}", path.display()))?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    fn now_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    }

    /// Play one game to completion (or the time cap)
    fn play_game(
        state: &mut GameState,
        audio: &mut AudioManager,
        max_seconds: u64,
        snapshot_every: u64,
    ) -> Result<()> {
        let mut out = Outbox::new();
        step(state, &[Command::Start], Duration::ZERO, &mut out);

        let tick = state.tuning.tick_period();
        let max_ticks = max_seconds * 1000 / state.tuning.tick_ms;
        let snapshot_ticks = snapshot_every * 1000 / state.tuning.tick_ms;

        while state.session.is_playing() && state.time_ticks < max_ticks {
            let commands: Vec<Command> = choose_command(state).into_iter().collect();
            step(state, &commands, tick, &mut out);

            let batch = out.drain();
            for cue in batch.cues {
                audio.play(cue);
            }
            for event in batch.events {
                match event {
                    GameEvent::Delivery { score, time_left } => {
                        log::info!("Delivery #{score} ({time_left}s left)")
                    }
                    GameEvent::Collision { lives_left } => {
                        log::info!("Hit by traffic, {lives_left} lives left")
                    }
                    other => log::debug!("{:?}", other),
                }
            }
            // No audio device in headless mode
            audio.drain();

            if snapshot_ticks > 0 && state.time_ticks % snapshot_ticks == 0 {
                println!("{}", serde_json::to_string(&state.snapshot())?);
            }
        }

        if state.session.is_playing() {
            log::warn!("Abandoning game after {max_seconds}s");
            step(state, &[Command::TogglePause], Duration::ZERO, &mut out);
        }
        Ok(())
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();

        let tuning = match &cli.tuning {
            Some(path) => load_tuning(path)?,
            None => Tuning::default(),
        };
        let seed = cli.seed.unwrap_or_else(rand::random);
        log::info!("CrossCity (native) starting with seed {seed}");

        let settings = if cli.mute {
            Settings::silent()
        } else {
            Settings::default()
        };
        let mut audio = AudioManager::new(settings);
        let mut scores = HighScores::new();
        let mut state = GameState::with_tuning(seed, tuning);

        for game in 1..=cli.games {
            play_game(&mut state, &mut audio, cli.max_seconds, cli.snapshot_every)?;

            let session = &state.session;
            let reason = match session.over_reason {
                Some(reason) => format!("{reason:?}"),
                None => "abandoned".to_string(),
            };
            println!(
                "Game {game}: {} deliveries, {} lives left, {:.1}s played ({reason})",
                session.score,
                session.lives,
                state.elapsed_secs()
            );
            scores.record(&state, now_ms());

            let mut out = Outbox::new();
            step(&mut state, &[Command::QuitToMenu], Duration::ZERO, &mut out);
            debug_assert_eq!(state.phase(), GamePhase::Menu);
        }

        if let Some(best) = scores.top_score() {
            println!("Leaderboard (best {best}):");
            for (rank, entry) in scores.entries.iter().enumerate() {
                println!(
                    "  {:>2}. {:>3} deliveries  {:>6.1}s  {:?}",
                    rank + 1,
                    entry.score,
                    entry.survived_secs,
                    entry.reason
                );
            }
        } else {
            println!("No deliveries made.");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is crosscity::web::start, this is just to satisfy the compiler
}
