//! Hazards, power-ups and terrain patches
//!
//! Every entity owns its world position, collision radius and animation
//! phase from construction; screen positions are derived per frame through
//! the camera.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{FRAME_MS, HAZARD_DESPAWN_MARGIN};
use crate::sim::geom::Rect;

/// Millisecond-accumulator frame cycler shared by all animated entities
#[derive(Debug, Clone, Copy)]
pub struct FrameAnim {
    pub frame: usize,
    frame_count: usize,
    delay_ms: f32,
    timer_ms: f32,
}

impl FrameAnim {
    pub fn new(frame_count: usize, delay_ms: f32) -> Self {
        Self {
            frame: 0,
            frame_count,
            delay_ms,
            timer_ms: 0.0,
        }
    }

    pub fn advance(&mut self, dt_ms: f32) {
        self.timer_ms += dt_ms;
        while self.timer_ms >= self.delay_ms {
            self.timer_ms -= self.delay_ms;
            self.frame = (self.frame + 1) % self.frame_count;
        }
    }

    pub fn reset(&mut self) {
        self.frame = 0;
        self.timer_ms = 0.0;
    }
}

/// A snowball projectile aimed toward the player's screen region at spawn
#[derive(Debug, Clone)]
pub struct Snowball {
    /// World position
    pub pos: Vec2,
    /// Velocity in pixels per frame slice, fixed at spawn
    pub vel: Vec2,
    pub radius: f32,
    /// Cosmetic spin, degrees
    pub rotation_deg: f32,
}

impl Snowball {
    /// Spawn on a random edge of the current camera view, aimed at a random
    /// point in the middle third of the viewport. Speed scales with score.
    pub fn spawn(rng: &mut Pcg32, view: &Rect, score: u32) -> Self {
        let radius = rng.random_range(6.0..=10.0_f32).round();
        let (w, h) = (view.w, view.h);

        let pos = match rng.random_range(0..4u8) {
            0 => Vec2::new(view.x + rng.random_range(0.0..w), view.y - radius),
            1 => Vec2::new(view.right() + radius, view.y + rng.random_range(0.0..h)),
            2 => Vec2::new(view.x + rng.random_range(0.0..w), view.bottom() + radius),
            _ => Vec2::new(view.x - radius, view.y + rng.random_range(0.0..h)),
        };

        let target = Vec2::new(
            view.x + rng.random_range(w / 3.0..w * 2.0 / 3.0),
            view.y + rng.random_range(h / 3.0..h * 2.0 / 3.0),
        );

        let speed = (2.0 + score as f32 * 0.1).min(6.0);
        let vel = (target - pos).normalize_or_zero() * speed;

        Self {
            pos,
            vel,
            radius,
            rotation_deg: 0.0,
        }
    }

    pub fn advance(&mut self, dt_ms: f32) {
        let slices = dt_ms / FRAME_MS;
        self.pos += self.vel * slices;
        self.rotation_deg = (self.rotation_deg + 5.0 * slices) % 360.0;
    }

    /// True once the snowball is far enough outside the camera view to drop
    pub fn out_of_view(&self, view: &Rect) -> bool {
        let m = HAZARD_DESPAWN_MARGIN;
        self.pos.x < view.left() - m
            || self.pos.x > view.right() + m
            || self.pos.y < view.top() - m
            || self.pos.y > view.bottom() + m
    }
}

/// The four power-up variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    /// Currency; also buys a little breathing room from the hazard spawner
    Fish,
    /// Stacks a shield, up to the cap
    Pebble,
    /// Doubles score accrual for a fixed duration
    Multiplier,
    /// Clears nearby hazards and melts every live snow patch
    Shovel,
}

impl PickupKind {
    pub fn radius(self) -> f32 {
        match self {
            PickupKind::Fish => 16.0,
            PickupKind::Pebble => 20.0,
            PickupKind::Multiplier => 16.0,
            PickupKind::Shovel => 22.0,
        }
    }

    /// Animation frame delay; sprite sheets are 3x3 grids
    pub fn anim_delay_ms(self) -> f32 {
        match self {
            PickupKind::Shovel => 120.0,
            _ => 100.0,
        }
    }
}

/// Frames in each pickup sprite sheet
pub const PICKUP_FRAMES: usize = 9;

/// A live, collectible power-up
#[derive(Debug, Clone)]
pub struct Pickup {
    pub kind: PickupKind,
    /// World position
    pub pos: Vec2,
    pub anim: FrameAnim,
}

impl Pickup {
    pub fn new(kind: PickupKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            anim: FrameAnim::new(PICKUP_FRAMES, kind.anim_delay_ms()),
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.kind.radius()
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.anim.advance(dt_ms);
    }
}

/// Snow patch lifetime before it melts away on its own
pub const PATCH_LIFETIME_MS: f32 = 45_000.0;

/// Cosmetic flake counts for the preview and the live patch
pub const PATCH_FLAKES_PREVIEW: usize = 45;
pub const PATCH_FLAKES_ACTIVE: usize = 30;

/// A drifting snowflake confined to a patch footprint
#[derive(Debug, Clone, Copy)]
pub struct Flake {
    pub pos: Vec2,
    pub size: f32,
    speed: f32,
}

impl Flake {
    fn new(rng: &mut Pcg32, rect: &Rect) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(rect.left()..rect.right()),
                rng.random_range(rect.top() - 20.0..rect.top()),
            ),
            size: rng.random_range(1.0..=3.0_f32).round(),
            speed: rng.random_range(0.3..1.0),
        }
    }

    fn advance(&mut self, dt_ms: f32, rect: &Rect, rng: &mut Pcg32) {
        self.pos.y += self.speed * dt_ms / FRAME_MS;
        if self.pos.y > rect.bottom() {
            *self = Flake::new(rng, rect);
        }
    }
}

/// A hazard-terrain patch: slows the player while their foot point overlaps
/// it, and expires by time only (never by collision)
#[derive(Debug, Clone)]
pub struct SnowPatch {
    /// World-space footprint
    pub rect: Rect,
    pub age_ms: f32,
    pub flakes: Vec<Flake>,
}

impl SnowPatch {
    pub fn new(rect: Rect, rng: &mut Pcg32) -> Self {
        let flakes = (0..PATCH_FLAKES_ACTIVE)
            .map(|_| Flake::new(rng, &rect))
            .collect();
        Self {
            rect,
            age_ms: 0.0,
            flakes,
        }
    }

    pub fn update(&mut self, dt_ms: f32, rng: &mut Pcg32) {
        self.age_ms += dt_ms;
        for flake in &mut self.flakes {
            flake.advance(dt_ms, &self.rect, rng);
        }
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.age_ms > PATCH_LIFETIME_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    fn view() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn snowball_spawns_on_view_edge_aimed_inward() {
        let mut rng = rng();
        for _ in 0..50 {
            let sb = Snowball::spawn(&mut rng, &view(), 0);
            let outside = sb.pos.x <= 0.0
                || sb.pos.x >= 800.0
                || sb.pos.y <= 0.0
                || sb.pos.y >= 600.0;
            assert!(outside, "spawned inside the view: {:?}", sb.pos);
            assert!(sb.vel.length() > 0.0);
            assert!((6.0..=10.0).contains(&sb.radius));
        }
    }

    #[test]
    fn snowball_speed_scales_with_score_and_caps() {
        let mut rng = rng();
        let slow = Snowball::spawn(&mut rng, &view(), 0);
        assert!((slow.vel.length() - 2.0).abs() < 0.01);

        let fast = Snowball::spawn(&mut rng, &view(), 1000);
        assert!((fast.vel.length() - 6.0).abs() < 0.01);
    }

    #[test]
    fn snowball_despawns_outside_margin() {
        let sb = Snowball {
            pos: Vec2::new(-201.0, 300.0),
            vel: Vec2::ZERO,
            radius: 8.0,
            rotation_deg: 0.0,
        };
        assert!(sb.out_of_view(&view()));

        let inside = Snowball {
            pos: Vec2::new(-150.0, 300.0),
            ..sb
        };
        assert!(!inside.out_of_view(&view()));
    }

    #[test]
    fn frame_anim_cycles_and_resets() {
        let mut anim = FrameAnim::new(3, 100.0);
        anim.advance(99.0);
        assert_eq!(anim.frame, 0);
        anim.advance(1.0);
        assert_eq!(anim.frame, 1);
        anim.advance(250.0);
        assert_eq!(anim.frame, 0); // wrapped past frame 2
        anim.reset();
        assert_eq!(anim.frame, 0);
    }

    #[test]
    fn patch_expires_by_age() {
        let mut rng = rng();
        let mut patch = SnowPatch::new(Rect::new(0.0, 0.0, 200.0, 150.0), &mut rng);
        assert!(!patch.expired());
        patch.update(PATCH_LIFETIME_MS + 1.0, &mut rng);
        assert!(patch.expired());
    }

    #[test]
    fn patch_flakes_stay_bound_to_footprint() {
        let mut rng = rng();
        let rect = Rect::new(100.0, 100.0, 200.0, 150.0);
        let mut patch = SnowPatch::new(rect, &mut rng);
        for _ in 0..1000 {
            patch.update(16.0, &mut rng);
        }
        for flake in &patch.flakes {
            assert!(flake.pos.x >= rect.left() && flake.pos.x <= rect.right());
            assert!(flake.pos.y <= rect.bottom());
        }
    }
}
