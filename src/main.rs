//! Honey Rush headless driver
//!
//! Runs the simulation in attract mode (autopilot) at a fixed 60 Hz frame
//! rate, restarting on game over, then prints the final snapshot as JSON.
//!
//! Usage: `honey-rush [seed] [frames]`
//! Set `HONEY_RUSH_SETTINGS` to a JSON settings file to override defaults.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use honey_rush::audio::{AudioManager, LogSink};
    use honey_rush::sim::{FrameInput, GameStatus, LifecycleCommand, Store, lifecycle, tick};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const DEFAULT_FRAMES: u32 = 60 * 60;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    let frames = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let settings = load_settings();
    log::info!("Honey Rush (headless) starting with seed {seed}, {frames} frames");

    let mut store = Store::with_settings(seed, &settings);
    let mut audio = AudioManager::new(LogSink, &settings);

    // HUD stand-in: report score/lives changes
    let mut last_hud = (0u64, 0u8);
    store.subscribe(move |state| {
        let now = (state.score, state.lives);
        if last_hud != now {
            log::debug!("HUD: score {} lives {}", state.score, state.lives);
            last_hud = now;
        }
    });

    lifecycle::apply(&mut store, LifecycleCommand::Play);

    let input = FrameInput {
        autopilot: true,
        ..Default::default()
    };
    let mut sessions = 1u32;
    let mut best = 0u64;

    for _ in 0..frames {
        let events = tick(&mut store, &input, FRAME_DT);
        audio.handle_events(&events);
        audio.sync_music(store.state());

        if store.state().status == GameStatus::GameOver {
            best = best.max(store.state().score);
            lifecycle::apply(&mut store, LifecycleCommand::Restart);
            sessions += 1;
        }
    }

    let state = store.snapshot();
    best = best.max(state.score);
    log::info!("Finished: {sessions} session(s), best score {best}");

    match serde_json::to_string_pretty(&*state) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize snapshot: {err}"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings() -> honey_rush::Settings {
    use honey_rush::Settings;

    let Ok(path) = std::env::var("HONEY_RUSH_SETTINGS") else {
        return Settings::default();
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(err) => {
            log::warn!("Could not read {path}: {err}; using defaults");
            return Settings::default();
        }
    };
    match Settings::from_json(&json) {
        Ok(settings) => {
            log::info!("Loaded settings from {path}");
            settings
        }
        Err(err) => {
            log::warn!("{err}; using defaults");
            Settings::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build drives `honey_rush::sim` from its own render loop
}
