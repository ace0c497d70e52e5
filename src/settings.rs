//! Game settings and preferences
//!
//! Persisted as JSON, separately from the flat meta-progression files.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Volume preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background track volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 0.10,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults on a missing or unreadable
    /// file. Parse failures never propagate.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(mut settings) => {
                    settings.clamp();
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Malformed settings file ({err}), using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings; the caller decides whether a write failure matters.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }

    fn clamp(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("snow-dodge-settings-{name}-{}", std::process::id()));
        p.push("settings.json");
        p
    }

    #[test]
    fn roundtrip() {
        let path = temp_path("roundtrip");
        let settings = Settings {
            master_volume: 0.5,
            music_volume: 0.25,
            sfx_volume: 0.75,
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path);
        assert_eq!(loaded.master_volume, 0.5);
        assert_eq!(loaded.music_volume, 0.25);
        assert_eq!(loaded.sfx_volume, 0.75);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let loaded = Settings::load(Path::new("/nonexistent/settings.json"));
        assert_eq!(loaded.music_volume, 0.10);
        assert_eq!(loaded.master_volume, 1.0);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let path = temp_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        let loaded = Settings::load(&path);
        assert_eq!(loaded.sfx_volume, 1.0);
    }

    #[test]
    fn out_of_range_values_are_clamped_on_load() {
        let path = temp_path("clamp");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{"master_volume": 4.0, "music_volume": -1.0, "sfx_volume": 0.5}"#,
        )
        .unwrap();
        let loaded = Settings::load(&path);
        assert_eq!(loaded.master_volume, 1.0);
        assert_eq!(loaded.music_volume, 0.0);
    }
}
