//! Spawn scheduling
//!
//! Every non-hazard entity kind appears through the same two-phase lifecycle:
//! a translucent pending marker is placed first, and the live entity
//! materializes at that position after a fixed preview delay. A kind never
//! has more than one pending-or-live instance at a time.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

/// Hazard spawn interval in milliseconds: strictly non-increasing in score,
/// floored at 250 ms. `bonus` is the temporary reprieve granted by fish
/// pickups.
pub fn hazard_interval_ms(score: u32, bonus: u32) -> f32 {
    let frames = 60 - 2 * score as i64 + bonus as i64;
    (frames * 16).max(250) as f32
}

/// One pending-or-live slot for a spawn kind
#[derive(Debug, Clone)]
pub enum Slot<T> {
    Empty,
    /// Preview marker placed in the world, counting up to materialization
    Pending { pos: Vec2, elapsed_ms: f32 },
    Live(T),
}

impl<T> Slot<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn live(&self) -> Option<&T> {
        match self {
            Slot::Live(t) => Some(t),
            _ => None,
        }
    }

    pub fn live_mut(&mut self) -> Option<&mut T> {
        match self {
            Slot::Live(t) => Some(t),
            _ => None,
        }
    }

    /// Take the live value, leaving the slot empty
    pub fn take_live(&mut self) -> Option<T> {
        if matches!(self, Slot::Live(_)) {
            match std::mem::replace(self, Slot::Empty) {
                Slot::Live(t) => Some(t),
                _ => unreachable!(),
            }
        } else {
            None
        }
    }
}

/// Spawn interval policy for a kind
#[derive(Debug, Clone, Copy)]
pub enum Interval {
    /// Fixed period
    Fixed(f32),
    /// Uniformly random period, re-rolled after each spawn
    Uniform(f32, f32),
}

impl Interval {
    fn roll(&self, rng: &mut Pcg32) -> f32 {
        match *self {
            Interval::Fixed(ms) => ms,
            Interval::Uniform(lo, hi) => rng.random_range(lo..=hi),
        }
    }
}

/// Per-kind spawn timer driving a [`Slot`] through Empty -> Pending -> Live
#[derive(Debug, Clone)]
pub struct Spawner {
    interval: Interval,
    preview_ms: f32,
    timer_ms: f32,
    due_ms: f32,
}

impl Spawner {
    pub fn new(interval: Interval, preview_ms: f32, rng: &mut Pcg32) -> Self {
        let due_ms = interval.roll(rng);
        Self {
            interval,
            preview_ms,
            timer_ms: 0.0,
            due_ms,
        }
    }

    /// Override the first interval only (used for the post-restart patch
    /// grace period); later spawns re-roll from the normal policy.
    pub fn with_first_due(mut self, first_due_ms: f32) -> Self {
        self.due_ms = first_due_ms;
        self
    }

    /// Advance one frame. When the timer elapses and the slot is empty, a
    /// pending marker is placed at `place(rng)`; once the preview delay has
    /// passed the marker is replaced with `materialize(pos, rng)`.
    ///
    /// Returns `true` on the frame the live entity materializes.
    pub fn advance<T>(
        &mut self,
        slot: &mut Slot<T>,
        dt_ms: f32,
        rng: &mut Pcg32,
        place: impl FnOnce(&mut Pcg32) -> Vec2,
        materialize: impl FnOnce(Vec2, &mut Pcg32) -> T,
    ) -> bool {
        match slot {
            Slot::Empty => {
                self.timer_ms += dt_ms;
                if self.timer_ms >= self.due_ms {
                    *slot = Slot::Pending {
                        pos: place(rng),
                        elapsed_ms: 0.0,
                    };
                    self.timer_ms = 0.0;
                    self.due_ms = self.interval.roll(rng);
                }
                false
            }
            Slot::Pending { pos, elapsed_ms } => {
                *elapsed_ms += dt_ms;
                if *elapsed_ms >= self.preview_ms {
                    let pos = *pos;
                    *slot = Slot::Live(materialize(pos, rng));
                    true
                } else {
                    false
                }
            }
            Slot::Live(_) => false,
        }
    }
}
