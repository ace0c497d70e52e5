//! Per-frame simulation step
//!
//! Advances one life by one frame: promote pending spawns, follow the
//! camera, move the player, resolve collisions and effects, accrue score.
//! The tick mutates state and reports what happened as [`GameEvent`]s; it
//! never touches audio or persistence itself.

use crate::consts::{
    INVULN_MS, MAX_SHIELDS, MULTIPLIER_MS, SCORE_TICK_MS, SHOVEL_CLEAR_RADIUS,
};
use crate::sim::entities::{Pickup, PickupKind, SnowPatch, Snowball};
use crate::sim::geom::{Rect, circles_overlap};
use crate::sim::player::Player;
use crate::sim::spawn::{Slot, hazard_interval_ms};
use crate::sim::state::{GameEvent, GameState, MAX_SPAWN_BONUS, SPAWN_BONUS_PER_FISH};

/// Held movement input sampled once per frame. Each axis is -1, 0 or 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub dx: i8,
    pub dy: i8,
}

impl FrameInput {
    pub fn from_held(left: bool, right: bool, up: bool, down: bool) -> Self {
        Self {
            dx: right as i8 - left as i8,
            dy: down as i8 - up as i8,
        }
    }
}

/// Advance the life by one frame of `dt_ms` elapsed real time.
pub fn tick(state: &mut GameState, input: FrameInput, dt_ms: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.over {
        return events;
    }

    state.invuln_ms = (state.invuln_ms - dt_ms).max(0.0);
    state.multiplier_ms = (state.multiplier_ms - dt_ms).max(0.0);

    advance_spawns(state, dt_ms, &mut events);

    // Patch aging and expiry (time-based only)
    for patch in &mut state.patches {
        patch.update(dt_ms, &mut state.rng);
    }
    state.patches.retain(|p| !p.expired());

    // Player moves against the pre-follow camera, then the camera chases
    state.player.screen_pos = state.camera.world_to_screen(state.player.world_pos);
    state.player.update(input.dx, input.dy, dt_ms, &state.patches);
    state.camera.follow(state.player.world_pos);
    state.player.screen_pos = state.camera.world_to_screen(state.player.world_pos);

    resolve_pickups(state, dt_ms, &mut events);
    resolve_hazards(state, dt_ms, &mut events);
    if state.over {
        return events;
    }

    // Score accrual
    state.score_timer_ms += dt_ms;
    if state.score_timer_ms >= SCORE_TICK_MS {
        state.score_timer_ms = 0.0;
        state.score += if state.multiplier_active() { 2 } else { 1 };
        events.push(GameEvent::ScoreTick);
    }

    events
}

/// Drive every pending->live slot forward for one frame
fn advance_spawns(state: &mut GameState, dt_ms: f32, events: &mut Vec<GameEvent>) {
    let view = state.camera.view_rect();

    state.fish_spawner.advance(
        &mut state.fish,
        dt_ms,
        &mut state.rng,
        |rng| GameState::roll_pickup_pos(rng, &view),
        |pos, _| Pickup::new(PickupKind::Fish, pos),
    );
    state.pebble_spawner.advance(
        &mut state.pebble,
        dt_ms,
        &mut state.rng,
        |rng| GameState::roll_pickup_pos(rng, &view),
        |pos, _| Pickup::new(PickupKind::Pebble, pos),
    );
    state.multiplier_spawner.advance(
        &mut state.multiplier,
        dt_ms,
        &mut state.rng,
        |rng| GameState::roll_pickup_pos(rng, &view),
        |pos, _| Pickup::new(PickupKind::Multiplier, pos),
    );
    state.shovel_spawner.advance(
        &mut state.shovel,
        dt_ms,
        &mut state.rng,
        |rng| GameState::roll_pickup_pos(rng, &view),
        |pos, _| Pickup::new(PickupKind::Shovel, pos),
    );

    let materialized = state.patch_spawner.advance(
        &mut state.pending_patch,
        dt_ms,
        &mut state.rng,
        |rng| GameState::roll_patch_pos(rng, &view),
        |pos, rng| {
            let (w, h) = GameState::roll_patch_size(rng);
            SnowPatch::new(Rect::new(pos.x, pos.y, w, h), rng)
        },
    );
    if materialized {
        events.push(GameEvent::PatchMaterialized);
    }
    // A materialized patch joins the long-lived collection; its slot frees
    // immediately so the next patch cycle can begin
    if let Some(patch) = state.pending_patch.take_live() {
        state.patches.push(patch);
    }
}

/// Animate live pickups, collect on contact and apply effects
fn resolve_pickups(state: &mut GameState, dt_ms: f32, events: &mut Vec<GameEvent>) {
    for kind in [
        PickupKind::Fish,
        PickupKind::Pebble,
        PickupKind::Multiplier,
        PickupKind::Shovel,
    ] {
        let slot = match kind {
            PickupKind::Fish => &mut state.fish,
            PickupKind::Pebble => &mut state.pebble,
            PickupKind::Multiplier => &mut state.multiplier,
            PickupKind::Shovel => &mut state.shovel,
        };

        if collect_on_contact(slot, &state.player, dt_ms).is_none() {
            continue;
        }

        match kind {
            PickupKind::Fish => {
                state.fish_collected += 1;
                state.spawn_bonus =
                    (state.spawn_bonus + SPAWN_BONUS_PER_FISH).min(MAX_SPAWN_BONUS);
            }
            PickupKind::Pebble => {
                state.shield_count = (state.shield_count + 1).min(MAX_SHIELDS);
            }
            PickupKind::Multiplier => {
                state.multiplier_ms = MULTIPLIER_MS;
            }
            PickupKind::Shovel => {
                let center = state.player.world_pos;
                state
                    .hazards
                    .retain(|sb| sb.pos.distance_squared(center) > SHOVEL_CLEAR_RADIUS.powi(2));
                state.patches.clear();
            }
        }
        events.push(GameEvent::PickupCollected(kind));
    }
}

/// Animate a live pickup and take it out of its slot on player contact
fn collect_on_contact(
    slot: &mut Slot<Pickup>,
    player: &Player,
    dt_ms: f32,
) -> Option<PickupKind> {
    let pickup = slot.live_mut()?;
    pickup.update(dt_ms);
    let hit = circles_overlap(
        pickup.pos,
        pickup.radius(),
        player.world_pos,
        player.radius,
    );
    if hit {
        slot.take_live().map(|p| p.kind)
    } else {
        None
    }
}

/// Spawn, advance and collide hazards
fn resolve_hazards(state: &mut GameState, dt_ms: f32, events: &mut Vec<GameEvent>) {
    let view = state.camera.view_rect();

    state.hazard_timer_ms += dt_ms;
    if state.hazard_timer_ms >= hazard_interval_ms(state.score, state.spawn_bonus) {
        state.hazard_timer_ms = 0.0;
        let snowball = Snowball::spawn(&mut state.rng, &view, state.score);
        state.hazards.push(snowball);
    }

    for hazard in &mut state.hazards {
        hazard.advance(dt_ms);
    }

    if !state.invulnerable() {
        let hit = state.hazards.iter().position(|sb| {
            circles_overlap(
                sb.pos,
                sb.radius,
                state.player.world_pos,
                state.player.radius,
            )
        });
        if hit.is_some() {
            if state.shield_count > 0 {
                // Full-board reset: one shield eats the hit and every live
                // hazard goes with it
                state.shield_count -= 1;
                state.hazards.clear();
                state.invuln_ms = INVULN_MS;
                events.push(GameEvent::ShieldAbsorbedHit);
            } else {
                state.over = true;
                events.push(GameEvent::GameOver);
                return;
            }
        }
    }

    state.hazards.retain(|sb| !sb.out_of_view(&view));
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn fresh() -> GameState {
        GameState::new(1234, 36.0, None)
    }

    fn hazard_at(pos: Vec2) -> Snowball {
        Snowball {
            pos,
            vel: Vec2::ZERO,
            radius: 8.0,
            rotation_deg: 0.0,
        }
    }

    fn pickup_on_player(state: &GameState, kind: PickupKind) -> Slot<Pickup> {
        Slot::Live(Pickup::new(kind, state.player.world_pos))
    }

    #[test]
    fn shield_absorbs_hit_and_clears_board() {
        let mut state = fresh();
        state.shield_count = 2;
        state.hazards.push(hazard_at(state.player.world_pos));
        state.hazards.push(hazard_at(Vec2::new(-500.0, -500.0)));

        let events = tick(&mut state, FrameInput::default(), 16.0);

        assert_eq!(state.shield_count, 1);
        assert!(state.hazards.is_empty());
        assert!(!state.over);
        assert!(state.invulnerable());
        assert!(events.contains(&GameEvent::ShieldAbsorbedHit));
        assert!(!events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn unshielded_hit_ends_life_exactly_once() {
        let mut state = fresh();
        state.hazards.push(hazard_at(state.player.world_pos));

        let events = tick(&mut state, FrameInput::default(), 16.0);
        assert!(state.over);
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::GameOver).count(),
            1
        );

        // Subsequent frames are inert
        let events = tick(&mut state, FrameInput::default(), 16.0);
        assert!(events.is_empty());
    }

    #[test]
    fn invulnerability_window_ignores_hits() {
        let mut state = fresh();
        state.invuln_ms = 500.0;
        state.hazards.push(hazard_at(state.player.world_pos));

        let events = tick(&mut state, FrameInput::default(), 16.0);
        assert!(!state.over);
        assert!(!events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn fish_grants_bonus_up_to_cap() {
        let mut state = fresh();
        for i in 1..=8u32 {
            state.fish = pickup_on_player(&state, PickupKind::Fish);
            tick(&mut state, FrameInput::default(), 16.0);
            assert_eq!(state.fish_collected, i);
            assert_eq!(state.spawn_bonus, (i * SPAWN_BONUS_PER_FISH).min(MAX_SPAWN_BONUS));
            assert!(state.fish.is_empty());
        }
    }

    #[test]
    fn shields_stack_to_cap() {
        let mut state = fresh();
        for _ in 0..5 {
            state.pebble = pickup_on_player(&state, PickupKind::Pebble);
            tick(&mut state, FrameInput::default(), 16.0);
        }
        assert_eq!(state.shield_count, MAX_SHIELDS);
    }

    #[test]
    fn multiplier_doubles_score_accrual() {
        let mut state = fresh();
        state.score_timer_ms = SCORE_TICK_MS - 1.0;
        tick(&mut state, FrameInput::default(), 16.0);
        assert_eq!(state.score, 1);

        state.multiplier = pickup_on_player(&state, PickupKind::Multiplier);
        tick(&mut state, FrameInput::default(), 16.0);
        assert!(state.multiplier_active());

        state.score_timer_ms = SCORE_TICK_MS - 1.0;
        tick(&mut state, FrameInput::default(), 16.0);
        assert_eq!(state.score, 3);
    }

    #[test]
    fn multiplier_expires() {
        let mut state = fresh();
        state.multiplier_ms = 100.0;
        tick(&mut state, FrameInput::default(), 200.0);
        assert!(!state.multiplier_active());
    }

    #[test]
    fn shovel_clears_nearby_hazards_and_all_patches() {
        let mut state = fresh();
        let player = state.player.world_pos;
        state.hazards.push(hazard_at(player + Vec2::new(100.0, 0.0)));
        state.hazards.push(hazard_at(player + Vec2::new(150.0, 300.0)));

        let rect = Rect::new(player.x, player.y, 200.0, 150.0);
        let patch = SnowPatch::new(rect, &mut state.rng);
        state.patches.push(patch);

        state.shovel = pickup_on_player(&state, PickupKind::Shovel);
        tick(&mut state, FrameInput::default(), 16.0);

        assert_eq!(state.hazards.len(), 1, "only the far hazard survives");
        assert!(state.hazards[0].pos.distance(player) > SHOVEL_CLEAR_RADIUS);
        assert!(state.patches.is_empty());
    }

    #[test]
    fn first_hazard_spawns_after_base_interval() {
        let mut state = fresh();
        // 959 ms in: nothing yet (score 0 => 960 ms interval)
        for _ in 0..59 {
            tick(&mut state, FrameInput::default(), 16.25);
        }
        assert!(state.hazards.is_empty());
        tick(&mut state, FrameInput::default(), 16.25);
        assert_eq!(state.hazards.len(), 1);
    }

    #[test]
    fn fish_slot_goes_pending_then_live() {
        let mut state = fresh();
        // Keep stray hazards from ending the life mid-test
        state.invuln_ms = f32::INFINITY;

        // Walk up to the fish cadence (3500 ms)
        let mut elapsed = 0.0;
        while elapsed < 3500.0 {
            tick(&mut state, FrameInput::default(), 100.0);
            elapsed += 100.0;
        }
        assert!(matches!(state.fish, Slot::Pending { .. }));

        // Preview delay passes; the pickup materializes
        for _ in 0..8 {
            tick(&mut state, FrameInput::default(), 100.0);
        }
        assert!(state.fish.live().is_some());
    }

    #[test]
    fn collected_kind_respawns_through_a_fresh_cycle() {
        let mut state = fresh();
        state.invuln_ms = f32::INFINITY;

        // First fish materializes (3500 ms cadence + 750 ms preview)
        let mut frames = 0;
        while state.fish.live().is_none() {
            tick(&mut state, FrameInput::default(), 50.0);
            frames += 1;
            assert!(frames < 200, "fish never materialized");
        }

        // Collect it; the slot frees and a whole new cycle follows
        let pos = state.fish.live().unwrap().pos;
        state.player.world_pos = pos;
        tick(&mut state, FrameInput::default(), 16.0);
        assert!(state.fish.is_empty());
        assert_eq!(state.fish_collected, 1);

        let mut frames = 0;
        while state.fish.live().is_none() {
            tick(&mut state, FrameInput::default(), 50.0);
            frames += 1;
            assert!(frames < 300, "fish never respawned");
        }
    }

    #[test]
    fn patch_materializes_into_collection() {
        let mut state = fresh();
        state.invuln_ms = f32::INFINITY;
        let mut saw_patch_event = false;
        for _ in 0..600 {
            let events = tick(&mut state, FrameInput::default(), 16.0);
            if events.contains(&GameEvent::PatchMaterialized) {
                saw_patch_event = true;
                break;
            }
        }
        assert!(saw_patch_event);
        assert_eq!(state.patches.len(), 1);
        assert!(state.pending_patch.is_empty());
    }
}
