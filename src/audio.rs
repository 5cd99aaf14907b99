//! Audio boundary
//!
//! Turns simulation cues into playback requests at the user's volume. The
//! simulation owns no audio state; music on/off is tracked here.

use serde::Serialize;

use crate::settings::Settings;
use crate::sim::Cue;

/// A resolved playback request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Playback {
    /// One-shot sound effect
    Effect { cue: Cue, volume: f32 },
    StartMusic { volume: f32 },
    StopMusic,
}

/// Audio manager for the game
#[derive(Debug, Default)]
pub struct AudioManager {
    settings: Settings,
    music_playing: bool,
    /// Requests not yet taken by the platform player
    pending: Vec<Playback>,
}

impl AudioManager {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            music_playing: false,
            pending: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        if muted && self.music_playing {
            self.pending.push(Playback::StopMusic);
        } else if !muted && self.music_playing {
            let volume = self.settings.effective_music_volume();
            self.pending.push(Playback::StartMusic { volume });
        }
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    /// Handle one cue
    pub fn play(&mut self, cue: Cue) {
        let request = match cue {
            Cue::MusicStart => {
                if self.music_playing {
                    return;
                }
                self.music_playing = true;
                Playback::StartMusic {
                    volume: self.settings.effective_music_volume(),
                }
            }
            Cue::MusicStop => {
                if !self.music_playing {
                    return;
                }
                self.music_playing = false;
                Playback::StopMusic
            }
            Cue::PlayCollision | Cue::PlayDelivery => Playback::Effect {
                cue,
                volume: self.settings.effective_sfx_volume(),
            },
        };

        // Music state is still tracked while muted so unmuting resumes it
        if self.settings.muted {
            log::trace!("Muted: {:?}", request);
            return;
        }
        log::debug!("Audio: {:?}", request);
        self.pending.push(request);
    }

    /// Take queued playback requests
    pub fn drain(&mut self) -> Vec<Playback> {
        std::mem::take(&mut self.pending)
    }
}
