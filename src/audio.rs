//! Audio mixing
//!
//! The mixer owns the volume model (master times per-channel, from
//! [`Settings`]) and forwards cue requests to a backend sink. The sink is a
//! trait so the simulation and menus can be exercised headless in tests.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Run started from the start screen or a restart
    StartGame,
    /// Any pickup collected
    PickupCollect,
    /// Shield absorbed a hit
    ShieldBreak,
    /// Snow patch materialized
    PatchSpawn,
    /// Life ended
    GameOver,
    /// New high score recorded
    HighScore,
}

/// Playback backend. Implementations map cues onto an actual output device.
pub trait AudioSink {
    /// Play one cue at the given pre-mixed volume (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32);
    /// Adjust the looping background track gain
    fn set_music_gain(&mut self, gain: f32);
}

/// Sink that discards everything; used in tests and headless runs
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
    fn set_music_gain(&mut self, _gain: f32) {}
}

/// Audio mixer for the game
pub struct AudioMixer {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    music_volume: f32,
    sfx_volume: f32,
}

impl AudioMixer {
    pub fn new(sink: Box<dyn AudioSink>, settings: &Settings) -> Self {
        let mut mixer = Self {
            sink,
            master_volume: settings.master_volume,
            music_volume: settings.music_volume,
            sfx_volume: settings.sfx_volume,
        };
        mixer.push_music_gain();
        mixer
    }

    /// Set master volume (0.0 - 1.0); also rescales the music track
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.push_music_gain();
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.push_music_gain();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_music_volume(settings.music_volume);
        self.set_sfx_volume(settings.sfx_volume);
    }

    fn push_music_gain(&mut self) {
        self.sink.set_music_gain(self.master_volume * self.music_volume);
    }

    /// Get effective cue volume
    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        let base = self.master_volume * self.sfx_volume;
        match effect {
            // The patch cue fires often, keep it in the background
            SoundEffect::PatchSpawn => base * 0.35,
            _ => base,
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }
}
