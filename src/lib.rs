//! Snow Dodge - a top-down arcade dodger
//!
//! Core modules:
//! - `sim`: Fixed-target-rate simulation (movement, collisions, spawning, effects)
//! - `app`: Top-level screen machine (menus, game over replay, meta-progression)
//! - `store`: Flat-file persistence for fish currency, high score and owned skins
//! - `settings`: Volume preferences
//! - `audio`: Mixer facade over an injectable playback sink
//! - `skins`: Cosmetic catalog

pub mod app;
pub mod audio;
pub mod settings;
pub mod sim;
pub mod skins;
pub mod store;

pub use settings::Settings;
pub use store::MetaStore;

/// Game configuration constants
pub mod consts {
    /// Viewport dimensions (the player is always drawn inside this window)
    pub const VIEW_W: f32 = 800.0;
    pub const VIEW_H: f32 = 600.0;

    /// One nominal frame slice at the 60 Hz target rate, in milliseconds.
    /// Velocities are expressed per slice and scaled by `dt / FRAME_MS`;
    /// timers accumulate raw milliseconds.
    pub const FRAME_MS: f32 = 16.0;

    /// Score accrues once per this many milliseconds of play
    pub const SCORE_TICK_MS: f32 = 2000.0;

    /// Shield stack cap
    pub const MAX_SHIELDS: u8 = 3;

    /// Invulnerability window granted when a shield absorbs a hit
    pub const INVULN_MS: f32 = 1000.0;

    /// Score multiplier duration
    pub const MULTIPLIER_MS: f32 = 30_000.0;

    /// Pending-marker preview delays before an entity materializes
    pub const PICKUP_PREVIEW_MS: f32 = 750.0;
    pub const PATCH_PREVIEW_MS: f32 = 900.0;

    /// Hazards removed by the shovel within this world-space radius
    pub const SHOVEL_CLEAR_RADIUS: f32 = 200.0;

    /// Hazards despawn once this far outside the camera view
    pub const HAZARD_DESPAWN_MARGIN: f32 = 200.0;
}
