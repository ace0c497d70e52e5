//! Top-level application state
//!
//! Owns the screen machine (start, playing, game over, menus), the
//! meta-progression (fish currency, high score, owned skins) and the reaction
//! to simulation events: sounds, high-score persistence and the one-time
//! fish bank when a life ends. The game-over screen runs a non-interactive
//! replay purely for show.

use std::collections::BTreeSet;
use std::path::PathBuf;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioMixer, AudioSink, SoundEffect};
use crate::consts::{FRAME_MS, VIEW_H, VIEW_W};
use crate::settings::Settings;
use crate::sim::{Camera, FrameInput, GameEvent, GameState, Snowball, tick};
use crate::skins;
use crate::store::{
    KEY_FISH_TOTAL, KEY_HIGH_SCORE, KEY_OWNED_COSMETICS, KEY_SELECTED_COSMETIC, MetaStore,
};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    GameOver,
    SkinMenu,
    VolumeMenu,
}

/// Edge-triggered keys the screen machine reacts to. Held movement keys go
/// through [`FrameInput`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Space,
    Enter,
    Up,
    Down,
    Left,
    Right,
    A,
    D,
    S,
    V,
}

/// Rows of the volume menu, top to bottom
pub const VOLUME_ROWS: &[&str] = &["Master", "Music", "SFX", "Back"];

/// Grace period before the first snow patch after a restart
const RESTART_PATCH_GRACE_MS: (f32, f32) = (8000.0, 14_000.0);

pub struct App {
    pub screen: Screen,
    /// Where a menu returns to on back or escape
    prev_screen: Screen,

    pub game: GameState,
    pub replay: Option<ReplaySim>,

    store: MetaStore,
    settings: Settings,
    settings_path: PathBuf,
    pub mixer: AudioMixer,
    rng: Pcg32,

    pub fish_total: i64,
    pub high_score: i64,
    pub owned: BTreeSet<String>,
    pub selected_skin: String,
    skin_cursor: usize,
    vol_cursor: usize,

    /// Guards the end-of-life fish bank so it runs exactly once per life
    fish_banked: bool,
    /// Set the first time this life's score beats the stored high score
    new_high: bool,

    pub quit_requested: bool,
}

impl App {
    pub fn new(store: MetaStore, settings_path: PathBuf, sink: Box<dyn AudioSink>, seed: u64) -> Self {
        let settings = Settings::load(&settings_path);
        let mixer = AudioMixer::new(sink, &settings);
        let mut rng = Pcg32::seed_from_u64(seed);

        let fish_total = store.load_int(KEY_FISH_TOTAL, 0).max(0);
        let high_score = store.load_int(KEY_HIGH_SCORE, 0).max(0);
        let owned = store.load_string_set(KEY_OWNED_COSMETICS, &[skins::DEFAULT_SKIN]);
        let stored = store.load_string(KEY_SELECTED_COSMETIC, skins::DEFAULT_SKIN);
        let selected_skin = if owned.contains(&stored) && skins::by_id(&stored).is_some() {
            stored
        } else {
            skins::DEFAULT_SKIN.to_string()
        };
        let skin_cursor = skins::index_of(&selected_skin);

        let radius = skins::resolve(&selected_skin).radius;
        let game = GameState::new(rng.random(), radius, None);

        Self {
            screen: Screen::Start,
            prev_screen: Screen::Start,
            game,
            replay: None,
            store,
            settings,
            settings_path,
            mixer,
            rng,
            fish_total,
            high_score,
            owned,
            selected_skin,
            skin_cursor,
            vol_cursor: 0,
            fish_banked: false,
            new_high: false,
            quit_requested: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn skin_cursor(&self) -> usize {
        self.skin_cursor
    }

    pub fn volume_cursor(&self) -> usize {
        self.vol_cursor
    }

    pub fn new_high(&self) -> bool {
        self.new_high
    }

    /// Handle one key-down edge
    pub fn handle_key(&mut self, key: Key) {
        if key == Key::Escape {
            if matches!(self.screen, Screen::SkinMenu | Screen::VolumeMenu) {
                self.screen = self.prev_screen;
            } else {
                self.quit_requested = true;
            }
            return;
        }

        match self.screen {
            Screen::Start => match key {
                Key::Space => {
                    self.mixer.play(SoundEffect::StartGame);
                    self.start_life(None);
                }
                Key::S => self.open_menu(Screen::SkinMenu),
                Key::V => self.open_menu(Screen::VolumeMenu),
                _ => {}
            },
            Screen::GameOver => {
                if key == Key::Space {
                    let (lo, hi) = RESTART_PATCH_GRACE_MS;
                    let grace = self.rng.random_range(lo..=hi);
                    self.start_life(Some(grace));
                }
            }
            Screen::SkinMenu => self.skin_menu_key(key),
            Screen::VolumeMenu => self.volume_menu_key(key),
            Screen::Playing => {}
        }
    }

    /// Advance one frame of whatever the active screen runs
    pub fn frame(&mut self, input: FrameInput, dt_ms: f32) {
        match self.screen {
            Screen::Playing => {
                for event in tick(&mut self.game, input, dt_ms) {
                    self.react(event);
                }
            }
            Screen::GameOver => {
                if let Some(replay) = &mut self.replay {
                    replay.update(dt_ms, &mut self.rng);
                }
            }
            _ => {}
        }
    }

    fn react(&mut self, event: GameEvent) {
        match event {
            GameEvent::PickupCollected(_) => self.mixer.play(SoundEffect::PickupCollect),
            GameEvent::ShieldAbsorbedHit => self.mixer.play(SoundEffect::ShieldBreak),
            GameEvent::PatchMaterialized => self.mixer.play(SoundEffect::PatchSpawn),
            GameEvent::ScoreTick => {
                if i64::from(self.game.score) > self.high_score {
                    self.high_score = i64::from(self.game.score);
                    if let Err(err) = self.store.save_int(KEY_HIGH_SCORE, self.high_score) {
                        log::error!("Failed to persist high score: {err}");
                    }
                    if !self.new_high {
                        self.new_high = true;
                        self.mixer.play(SoundEffect::HighScore);
                    }
                }
            }
            GameEvent::GameOver => self.enter_game_over(),
        }
    }

    fn start_life(&mut self, first_patch_due_ms: Option<f32>) {
        let radius = skins::resolve(&self.selected_skin).radius;
        self.game = GameState::new(self.rng.random(), radius, first_patch_due_ms);
        self.replay = None;
        self.fish_banked = false;
        self.new_high = false;
        self.screen = Screen::Playing;
    }

    fn enter_game_over(&mut self) {
        self.mixer.play(SoundEffect::GameOver);
        if !self.fish_banked {
            self.fish_banked = true;
            self.fish_total += i64::from(self.game.fish_collected);
            self.persist_fish_total();
            log::info!(
                "Life over: score {}, banked {} fish (total {})",
                self.game.score,
                self.game.fish_collected,
                self.fish_total
            );
        }
        self.replay = Some(ReplaySim::new());
        self.screen = Screen::GameOver;
    }

    fn open_menu(&mut self, menu: Screen) {
        self.mixer.play(SoundEffect::PickupCollect);
        self.prev_screen = self.screen;
        self.screen = menu;
    }

    fn skin_menu_key(&mut self, key: Key) {
        let count = skins::SKINS.len();
        match key {
            Key::Left | Key::A => self.skin_cursor = (self.skin_cursor + count - 1) % count,
            Key::Right | Key::D => self.skin_cursor = (self.skin_cursor + 1) % count,
            Key::Enter => {
                let skin = &skins::SKINS[self.skin_cursor];
                if self.owned.contains(skin.id) {
                    self.select_skin(skin.id);
                    self.mixer.play(SoundEffect::PickupCollect);
                    self.screen = self.prev_screen;
                } else if self.fish_total >= skin.price {
                    // Deduct and mark owned together, then persist both
                    self.fish_total -= skin.price;
                    self.owned.insert(skin.id.to_string());
                    self.persist_fish_total();
                    self.persist_owned();
                    self.select_skin(skin.id);
                    self.mixer.play(SoundEffect::PickupCollect);
                    self.screen = self.prev_screen;
                }
                // Insufficient fish: stay in the menu, no error
            }
            _ => {}
        }
    }

    fn volume_menu_key(&mut self, key: Key) {
        let rows = VOLUME_ROWS.len();
        match key {
            Key::Up => self.vol_cursor = (self.vol_cursor + rows - 1) % rows,
            Key::Down => self.vol_cursor = (self.vol_cursor + 1) % rows,
            Key::Left => self.adjust_volume(-0.05),
            Key::Right => self.adjust_volume(0.05),
            Key::Enter if VOLUME_ROWS[self.vol_cursor] == "Back" => {
                if let Err(err) = self.settings.save(&self.settings_path) {
                    log::error!("Failed to persist settings: {err}");
                }
                self.screen = self.prev_screen;
            }
            _ => {}
        }
    }

    fn adjust_volume(&mut self, delta: f32) {
        let slot = match VOLUME_ROWS[self.vol_cursor] {
            "Master" => &mut self.settings.master_volume,
            "Music" => &mut self.settings.music_volume,
            "SFX" => &mut self.settings.sfx_volume,
            _ => return,
        };
        *slot = (*slot + delta).clamp(0.0, 1.0);
        self.mixer.apply_settings(&self.settings);
    }

    fn select_skin(&mut self, id: &str) {
        self.selected_skin = id.to_string();
        if let Err(err) = self.store.save_string(KEY_SELECTED_COSMETIC, id) {
            log::error!("Failed to persist skin selection: {err}");
        }
    }

    fn persist_fish_total(&self) {
        if let Err(err) = self.store.save_int(KEY_FISH_TOTAL, self.fish_total) {
            log::error!("Failed to persist fish total: {err}");
        }
    }

    fn persist_owned(&self) {
        if let Err(err) = self.store.save_string_set(KEY_OWNED_COSMETICS, &self.owned) {
            log::error!("Failed to persist owned skins: {err}");
        }
    }
}

/// Penguin forward drift per frame slice on the game-over screen
const REPLAY_DRIFT_X: f32 = 0.6;
/// Snowballs within this horizontal distance push the penguin vertically
const REPLAY_DODGE_RANGE: f32 = 240.0;
/// Spring pulling the penguin back to its start row
const REPLAY_ANCHOR_SPRING: f32 = 0.015;
const REPLAY_DAMPING: f32 = 0.88;
const REPLAY_MAX_VY: f32 = 2.2;
/// Non-stop snowball stream cadence
const REPLAY_SPAWN_MS: f32 = 180.0;

/// Non-interactive flourish shown behind the game-over text: the penguin
/// drifts right forever, weaving between an endless snowball stream.
pub struct ReplaySim {
    pub pos: Vec2,
    vy: f32,
    anchor_y: f32,
    pub camera: Camera,
    pub hazards: Vec<Snowball>,
    spawn_timer_ms: f32,
}

impl ReplaySim {
    pub fn new() -> Self {
        let pos = Vec2::new(-200.0, VIEW_H / 2.0);
        Self {
            pos,
            vy: 0.0,
            anchor_y: pos.y,
            camera: Camera::new(),
            hazards: Vec::new(),
            spawn_timer_ms: 0.0,
        }
    }

    pub fn update(&mut self, dt_ms: f32, rng: &mut Pcg32) {
        let slices = dt_ms / FRAME_MS;
        self.pos.x += REPLAY_DRIFT_X * slices;

        // Steer away from nearby snowballs, spring back toward the anchor row
        let mut force_y = 0.0;
        for sb in &self.hazards {
            let dx = sb.pos.x - self.pos.x;
            if dx.abs() < REPLAY_DODGE_RANGE {
                let dy = sb.pos.y - self.pos.y;
                force_y += (-dy / (dy * dy + 1200.0)) * 85_000.0;
            }
        }
        force_y += (self.anchor_y - self.pos.y) * REPLAY_ANCHOR_SPRING;
        self.vy = ((self.vy + force_y) * REPLAY_DAMPING).clamp(-REPLAY_MAX_VY, REPLAY_MAX_VY);
        self.pos.y += self.vy * slices;

        self.camera.follow(self.pos);

        self.spawn_timer_ms += dt_ms;
        if self.spawn_timer_ms > REPLAY_SPAWN_MS {
            self.spawn_timer_ms = 0.0;
            self.hazards.push(Snowball {
                pos: Vec2::new(
                    self.pos.x + VIEW_W + rng.random_range(0.0..=120.0),
                    rng.random_range(self.pos.y - VIEW_H / 2.0..self.pos.y + VIEW_H / 2.0),
                ),
                vel: Vec2::new(-rng.random_range(1.8..3.0), 0.0),
                radius: rng.random_range(6.0..=10.0_f32).round(),
                rotation_deg: 0.0,
            });
        }

        for sb in &mut self.hazards {
            sb.advance(dt_ms);
        }
        let cutoff = self.pos.x - VIEW_W;
        self.hazards.retain(|sb| sb.pos.x >= cutoff);
    }
}

impl Default for ReplaySim {
    fn default() -> Self {
        Self::new()
    }
}
