//! Snow Dodge entry point
//!
//! Runs a short headless session of the simulation. Rendering and real input
//! live behind the app's collaborator interfaces and are wired up by a
//! platform front end.

use snow_dodge::app::{App, Key, Screen};
use snow_dodge::audio::NullSink;
use snow_dodge::consts::FRAME_MS;
use snow_dodge::sim::FrameInput;
use snow_dodge::store::MetaStore;

fn main() {
    env_logger::init();
    log::info!("Snow Dodge starting (headless demo)...");

    let store = MetaStore::default_location();
    let settings_path = std::path::PathBuf::from("saves/settings.json");
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut app = App::new(store, settings_path, Box::new(NullSink), seed);

    log::info!(
        "Loaded meta-progression: {} fish, high score {}, skin '{}'",
        app.fish_total,
        app.high_score,
        app.selected_skin
    );

    // Scripted life: wander in a loop until a snowball connects
    app.handle_key(Key::Space);
    let mut frames = 0u32;
    while app.screen == Screen::Playing && frames < 60 * 60 * 5 {
        let phase = frames / 45 % 4;
        let input = match phase {
            0 => FrameInput { dx: 1, dy: 0 },
            1 => FrameInput { dx: 0, dy: 1 },
            2 => FrameInput { dx: -1, dy: 0 },
            _ => FrameInput { dx: 0, dy: -1 },
        };
        app.frame(input, FRAME_MS);
        frames += 1;
    }

    log::info!(
        "Life ended after {:.1}s: score {}, fish collected {}, high score {}{}",
        frames as f32 * FRAME_MS / 1000.0,
        app.game.score,
        app.game.fish_collected,
        app.high_score,
        if app.new_high() { " (new!)" } else { "" }
    );

    // Let the game-over replay run a moment, then quit
    for _ in 0..120 {
        app.frame(FrameInput::default(), FRAME_MS);
    }
    app.handle_key(Key::Escape);
    log::info!("Done.");
}
