//! Player avatar
//!
//! Movement is intent-as-acceleration with multiplicative friction, clamped
//! to the viewport in screen space while the true position advances in world
//! space. Diagonal movement is deliberately not normalized, so it is faster
//! than a single axis.

use glam::Vec2;

use crate::consts::{FRAME_MS, VIEW_H, VIEW_W};
use crate::sim::entities::SnowPatch;
use crate::sim::geom::circle_rect_overlap;

/// Acceleration per axis of held input, pixels per frame slice
const ACCEL: f32 = 0.5;
/// Velocity retained per frame slice on normal ground
const FRICTION_ICE: f32 = 0.90;
/// Velocity retained per frame slice while standing in a snow patch
const FRICTION_SNOW: f32 = 0.70;
/// Walk-cycle frame delay
const FRAME_DELAY_MS: f32 = 150.0;
/// Frames per directional walk cycle
const WALK_FRAMES: usize = 3;

/// Eight-way facing for the directional sprite sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Down,
    DownLeft,
    DownRight,
    Left,
    Right,
    Up,
    UpLeft,
    UpRight,
}

impl Facing {
    /// Facing from a movement intent; `None` when idle
    pub fn from_intent(dx: i8, dy: i8) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (0, 0) => None,
            (-1, -1) => Some(Facing::UpLeft),
            (1, -1) => Some(Facing::UpRight),
            (-1, 1) => Some(Facing::DownLeft),
            (1, 1) => Some(Facing::DownRight),
            (0, -1) => Some(Facing::Up),
            (0, 1) => Some(Facing::Down),
            (-1, 0) => Some(Facing::Left),
            _ => Some(Facing::Right),
        }
    }
}

/// The player-controlled avatar for one life
#[derive(Debug, Clone)]
pub struct Player {
    /// True position in unbounded world space
    pub world_pos: Vec2,
    /// Camera-relative position, always within the viewport
    pub screen_pos: Vec2,
    /// Velocity in pixels per frame slice
    pub vel: Vec2,
    pub radius: f32,
    pub facing: Facing,
    pub anim_frame: usize,
    anim_timer_ms: f32,
}

impl Player {
    /// Spawn centered in the viewport; world and screen coincide until the
    /// camera starts moving
    pub fn new(radius: f32) -> Self {
        let center = Vec2::new(VIEW_W / 2.0, VIEW_H / 2.0);
        Self {
            world_pos: center,
            screen_pos: center,
            vel: Vec2::ZERO,
            radius,
            facing: Facing::Down,
            anim_frame: 0,
            anim_timer_ms: 0.0,
        }
    }

    /// World-space foot point, used for patch overlap instead of the center
    pub fn foot_point(&self) -> Vec2 {
        self.world_pos + Vec2::new(0.0, self.radius * 0.8)
    }

    pub fn foot_radius(&self) -> f32 {
        (self.radius * 0.45).max(5.0)
    }

    /// Advance one frame: animation, acceleration, friction, integration
    /// and viewport clamping. The clamped screen delta is what moves the
    /// world position, so the avatar can never leave the visible screen.
    pub fn update(&mut self, dx: i8, dy: i8, dt_ms: f32, patches: &[SnowPatch]) {
        self.animate(dx, dy, dt_ms);

        let slices = dt_ms / FRAME_MS;
        self.vel += Vec2::new(dx as f32, dy as f32) * ACCEL * slices;

        let on_snow = patches
            .iter()
            .any(|p| circle_rect_overlap(self.foot_point(), self.foot_radius(), &p.rect));
        let friction = if on_snow { FRICTION_SNOW } else { FRICTION_ICE };
        self.vel *= friction.powf(slices);

        let proposed = self.screen_pos + self.vel * slices;
        let clamped = Vec2::new(
            proposed.x.clamp(self.radius, VIEW_W - self.radius),
            proposed.y.clamp(self.radius, VIEW_H - self.radius),
        );

        self.world_pos += clamped - self.screen_pos;
        self.screen_pos = clamped;
    }

    fn animate(&mut self, dx: i8, dy: i8, dt_ms: f32) {
        match Facing::from_intent(dx, dy) {
            Some(facing) => {
                if facing != self.facing {
                    self.facing = facing;
                    self.anim_frame = 0;
                    self.anim_timer_ms = 0.0;
                }
                self.anim_timer_ms += dt_ms;
                while self.anim_timer_ms >= FRAME_DELAY_MS {
                    self.anim_timer_ms -= FRAME_DELAY_MS;
                    self.anim_frame = (self.anim_frame + 1) % WALK_FRAMES;
                }
            }
            None => {
                self.anim_frame = 0;
                self.anim_timer_ms = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geom::Rect;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn accelerates_when_held() {
        let mut p = Player::new(36.0);
        let start = p.screen_pos;
        for _ in 0..30 {
            p.update(1, 0, 16.0, &[]);
        }
        assert!(p.screen_pos.x > start.x);
        assert_eq!(p.screen_pos.y, start.y);
    }

    #[test]
    fn diagonal_is_faster_than_single_axis() {
        let mut straight = Player::new(36.0);
        let mut diagonal = Player::new(36.0);
        for _ in 0..30 {
            straight.update(1, 0, 16.0, &[]);
            diagonal.update(1, 1, 16.0, &[]);
        }
        let d_straight = straight.world_pos.distance(Vec2::new(VIEW_W / 2.0, VIEW_H / 2.0));
        let d_diagonal = diagonal.world_pos.distance(Vec2::new(VIEW_W / 2.0, VIEW_H / 2.0));
        assert!(d_diagonal > d_straight);
    }

    #[test]
    fn snow_patch_slows_movement() {
        let everywhere = {
            let mut rng = Pcg32::seed_from_u64(1);
            SnowPatch::new(Rect::new(-10_000.0, -10_000.0, 20_000.0, 20_000.0), &mut rng)
        };

        let mut on_ice = Player::new(36.0);
        let mut on_snow = Player::new(36.0);
        for _ in 0..30 {
            on_ice.update(1, 0, 16.0, &[]);
            on_snow.update(1, 0, 16.0, std::slice::from_ref(&everywhere));
        }
        assert!(on_snow.vel.length() < on_ice.vel.length());
    }

    #[test]
    fn direction_change_resets_walk_frame() {
        let mut p = Player::new(36.0);
        p.update(1, 0, 160.0, &[]);
        assert_eq!(p.facing, Facing::Right);
        assert!(p.anim_frame > 0);

        p.update(0, 1, 16.0, &[]);
        assert_eq!(p.facing, Facing::Down);
        assert_eq!(p.anim_frame, 0);
    }

    #[test]
    fn idle_resets_to_first_frame() {
        let mut p = Player::new(36.0);
        p.update(1, 0, 160.0, &[]);
        assert!(p.anim_frame > 0);
        p.update(0, 0, 16.0, &[]);
        assert_eq!(p.anim_frame, 0);
    }

    #[test]
    fn world_tracks_clamped_screen_delta() {
        let mut p = Player::new(36.0);
        // Push hard against the right wall
        for _ in 0..600 {
            p.update(1, 0, 16.0, &[]);
        }
        assert_eq!(p.screen_pos.x, VIEW_W - p.radius);
        // World stopped advancing once the screen position pinned
        let world_before = p.world_pos;
        p.update(1, 0, 16.0, &[]);
        assert_eq!(p.world_pos, world_before);
    }

    proptest! {
        /// Screen position stays within the viewport for any frame delta
        /// and any held input.
        #[test]
        fn screen_pos_always_in_viewport(
            steps in proptest::collection::vec((0.0f32..200.0, -1i8..=1, -1i8..=1), 1..200)
        ) {
            let mut p = Player::new(36.0);
            for (dt, dx, dy) in steps {
                p.update(dx, dy, dt, &[]);
                prop_assert!(p.screen_pos.x >= p.radius && p.screen_pos.x <= VIEW_W - p.radius);
                prop_assert!(p.screen_pos.y >= p.radius && p.screen_pos.y <= VIEW_H - p.radius);
            }
        }
    }
}
