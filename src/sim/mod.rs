//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies
//! - Real elapsed milliseconds flow in as frame deltas; velocities are
//!   per-frame-slice values scaled by `dt / FRAME_MS`

pub mod camera;
pub mod entities;
pub mod geom;
pub mod player;
pub mod spawn;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use entities::{Pickup, PickupKind, SnowPatch, Snowball};
pub use geom::{Rect, circle_rect_overlap, circles_overlap};
pub use player::{Facing, Player};
pub use spawn::{Interval, Slot, Spawner, hazard_interval_ms};
pub use state::{GameEvent, GameState};
pub use tick::{FrameInput, tick};
