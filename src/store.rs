//! Flat-file meta-progression store
//!
//! Each value lives in its own small file under the save directory, one key
//! per file. Reads fall back to a default when the file is missing or
//! unparseable so a corrupt save never blocks play; writes report failures to
//! the caller.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lifetime fish collected across all lives
pub const KEY_FISH_TOTAL: &str = "fish-total";
/// Best survival score
pub const KEY_HIGH_SCORE: &str = "high-score";
/// Owned cosmetic ids, one per line
pub const KEY_OWNED_COSMETICS: &str = "owned-cosmetics";
/// Currently selected cosmetic id
pub const KEY_SELECTED_COSMETIC: &str = "selected-cosmetic";

/// Persistent store rooted at a save directory
#[derive(Debug, Clone)]
pub struct MetaStore {
    dir: PathBuf,
}

impl MetaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location next to the executable's working directory
    pub fn default_location() -> Self {
        Self::new("saves")
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read an integer value, falling back to `default` when the file is
    /// missing or does not parse.
    pub fn load_int(&self, key: &str, default: i64) -> i64 {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(text) => match text.trim().parse::<i64>() {
                Ok(v) => v,
                Err(err) => {
                    log::warn!("Unreadable value for '{key}' ({err}), using {default}");
                    default
                }
            },
            Err(_) => default,
        }
    }

    pub fn save_int(&self, key: &str, value: i64) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.key_path(key), value.to_string())
    }

    /// Read a newline-separated set of strings. A missing file yields the
    /// provided defaults.
    pub fn load_string_set(&self, key: &str, defaults: &[&str]) -> BTreeSet<String> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(text) => {
                let mut set: BTreeSet<String> = text
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect();
                for d in defaults {
                    set.insert((*d).to_string());
                }
                set
            }
            Err(_) => defaults.iter().map(|d| (*d).to_string()).collect(),
        }
    }

    pub fn save_string_set(&self, key: &str, set: &BTreeSet<String>) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut text = String::new();
        for item in set {
            text.push_str(item);
            text.push('\n');
        }
        fs::write(self.key_path(key), text)
    }

    pub fn load_string(&self, key: &str, default: &str) -> String {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    default.to_string()
                } else {
                    trimmed.to_string()
                }
            }
            Err(_) => default.to_string(),
        }
    }

    pub fn save_string(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.key_path(key), value)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
