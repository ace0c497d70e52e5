//! Dead-zone follow camera
//!
//! The camera only moves when the tracked position leaves a central
//! rectangular region of the viewport, and eases toward its target instead
//! of snapping. World-to-screen conversion for any entity is
//! `screen = world - camera`.

use glam::Vec2;

use crate::consts::{VIEW_H, VIEW_W};
use crate::sim::geom::Rect;

/// Dead-zone dimensions (centered on the viewport)
pub const DEADZONE_W: f32 = VIEW_W * 0.55;
pub const DEADZONE_H: f32 = VIEW_H * 0.45;

/// Fraction of the remaining distance covered per frame
const EASE: f32 = 0.12;

/// Viewport camera (top-left corner in world space)
#[derive(Debug, Clone, Copy, Default)]
pub struct Camera {
    pub pos: Vec2,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow `target` (the player's world position) for one frame.
    ///
    /// Each axis corrects independently: the target camera position only
    /// shifts on an axis when the tracked point exits the dead-zone on that
    /// axis. The camera then eases a fixed fraction toward the target.
    pub fn follow(&mut self, target: Vec2) {
        let mut goal = self.pos;

        let center = self.pos + Vec2::new(VIEW_W / 2.0, VIEW_H / 2.0);
        let half_w = DEADZONE_W / 2.0;
        let half_h = DEADZONE_H / 2.0;

        if target.x < center.x - half_w {
            goal.x = target.x + half_w - VIEW_W / 2.0;
        } else if target.x > center.x + half_w {
            goal.x = target.x - half_w - VIEW_W / 2.0;
        }

        if target.y < center.y - half_h {
            goal.y = target.y + half_h - VIEW_H / 2.0;
        } else if target.y > center.y + half_h {
            goal.y = target.y - half_h - VIEW_H / 2.0;
        }

        self.pos += (goal - self.pos) * EASE;
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.pos
    }

    /// The world-space rectangle currently visible
    pub fn view_rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, VIEW_W, VIEW_H)
    }
}
