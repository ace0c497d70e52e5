//! Per-life game state
//!
//! Everything the simulation owns for one life lives here: the player, the
//! camera, every entity collection and every spawn slot. Created fresh on
//! each restart.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{PATCH_PREVIEW_MS, PICKUP_PREVIEW_MS};
use crate::sim::camera::Camera;
use crate::sim::entities::{Pickup, PickupKind, SnowPatch, Snowball};
use crate::sim::geom::Rect;
use crate::sim::player::Player;
use crate::sim::spawn::{Interval, Slot, Spawner};

/// Spawn-delay bonus cap from fish pickups
pub const MAX_SPAWN_BONUS: u32 = 30;
/// Bonus granted per fish
pub const SPAWN_BONUS_PER_FISH: u32 = 5;

/// Pickup/tool spawn margin from the viewport edge
const SPAWN_MARGIN: f32 = 60.0;

/// Things that happened during a tick that the outside world may react to
/// (sounds, persistence). The sim itself has no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PickupCollected(PickupKind),
    ShieldAbsorbedHit,
    PatchMaterialized,
    ScoreTick,
    GameOver,
}

/// Complete state for one life
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,

    pub player: Player,
    pub camera: Camera,

    /// Live hazards; cleared wholesale when a shield absorbs a hit
    pub hazards: Vec<Snowball>,
    pub hazard_timer_ms: f32,
    /// Hazard-spawn reprieve from fish pickups, capped at [`MAX_SPAWN_BONUS`]
    pub spawn_bonus: u32,

    pub fish: Slot<Pickup>,
    pub pebble: Slot<Pickup>,
    pub multiplier: Slot<Pickup>,
    pub shovel: Slot<Pickup>,
    /// Patches materialize out of this slot into `patches`
    pub pending_patch: Slot<SnowPatch>,
    pub patches: Vec<SnowPatch>,

    pub fish_spawner: Spawner,
    pub pebble_spawner: Spawner,
    pub multiplier_spawner: Spawner,
    pub shovel_spawner: Spawner,
    pub patch_spawner: Spawner,

    pub shield_count: u8,
    /// Remaining invulnerability window, ms
    pub invuln_ms: f32,
    /// Remaining score-doubling window, ms
    pub multiplier_ms: f32,

    pub score: u32,
    pub score_timer_ms: f32,
    /// Fish collected this life; banked into the persistent total on game over
    pub fish_collected: u32,

    /// Set once a hazard ends the life; the tick becomes a no-op after this
    pub over: bool,
}

impl GameState {
    /// Start a fresh life. `player_radius` comes from the selected skin.
    /// `first_patch_due_ms` lets a restart push the first patch out past the
    /// normal cadence.
    pub fn new(seed: u64, player_radius: f32, first_patch_due_ms: Option<f32>) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let fish_spawner = Spawner::new(Interval::Fixed(3500.0), PICKUP_PREVIEW_MS, &mut rng);
        let pebble_spawner = Spawner::new(
            Interval::Uniform(15_000.0, 25_000.0),
            PICKUP_PREVIEW_MS,
            &mut rng,
        );
        let multiplier_spawner = Spawner::new(
            Interval::Uniform(20_000.0, 30_000.0),
            PICKUP_PREVIEW_MS,
            &mut rng,
        );
        let shovel_spawner = Spawner::new(Interval::Fixed(45_000.0), PICKUP_PREVIEW_MS, &mut rng);
        let mut patch_spawner = Spawner::new(
            Interval::Uniform(2500.0, 4500.0),
            PATCH_PREVIEW_MS,
            &mut rng,
        );
        if let Some(first_due) = first_patch_due_ms {
            patch_spawner = patch_spawner.with_first_due(first_due);
        }

        Self {
            seed,
            rng,
            player: Player::new(player_radius),
            camera: Camera::new(),
            hazards: Vec::new(),
            hazard_timer_ms: 0.0,
            spawn_bonus: 0,
            fish: Slot::Empty,
            pebble: Slot::Empty,
            multiplier: Slot::Empty,
            shovel: Slot::Empty,
            pending_patch: Slot::Empty,
            patches: Vec::new(),
            fish_spawner,
            pebble_spawner,
            multiplier_spawner,
            shovel_spawner,
            patch_spawner,
            shield_count: 0,
            invuln_ms: 0.0,
            multiplier_ms: 0.0,
            score: 0,
            score_timer_ms: 0.0,
            fish_collected: 0,
            over: false,
        }
    }

    #[inline]
    pub fn multiplier_active(&self) -> bool {
        self.multiplier_ms > 0.0
    }

    #[inline]
    pub fn invulnerable(&self) -> bool {
        self.invuln_ms > 0.0
    }

    /// Random pickup position inside the current camera view, margin-inset,
    /// in world coordinates
    pub(crate) fn roll_pickup_pos(rng: &mut Pcg32, view: &Rect) -> Vec2 {
        Vec2::new(
            view.x + rng.random_range(SPAWN_MARGIN..view.w - SPAWN_MARGIN),
            view.y + rng.random_range(SPAWN_MARGIN..view.h - SPAWN_MARGIN),
        )
    }

    /// Random patch top-left corner inside the current camera view, in world
    /// coordinates (inset so the largest footprint still fits on screen)
    pub(crate) fn roll_patch_pos(rng: &mut Pcg32, view: &Rect) -> Vec2 {
        Vec2::new(
            view.x + rng.random_range(0.0..(view.w - 200.0).max(1.0)),
            view.y + rng.random_range(0.0..(view.h - 160.0).max(1.0)),
        )
    }

    /// Random patch footprint dimensions
    pub(crate) fn roll_patch_size(rng: &mut Pcg32) -> (f32, f32) {
        (
            rng.random_range(160.0..=240.0),
            rng.random_range(120.0..=190.0),
        )
    }
}
