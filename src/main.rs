//! Pedych Game: a small tile-based platformer
//!
//! Run right, jump between platforms, grab coins. Fall off the bottom of
//! the map and it's game over; press R to start again.
//!
//! Controls: Left/A and Right/D to move, Up/W to jump, R to restart.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod engine;
mod game;

use std::fmt::Display;

use log::{error, info};
use macroquad::prelude::*;

use config::{GameConfig, CONFIG_PATH};
use engine::{FrameClock, MapSource};
use game::{draw_session, GameKey, GameSession, Textures};

fn window_conf() -> Conf {
    // Errors are reported properly once the logger is up in main()
    let config = GameConfig::load(CONFIG_PATH).unwrap_or_default();
    Conf {
        window_title: config.title,
        window_width: config.screen_width as i32,
        window_height: config.screen_height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

/// Log a startup failure and quit
fn fatal(what: &str, err: impl Display) -> ! {
    error!("Failed to load {}: {}", what, err);
    std::process::exit(1);
}

fn window_size() -> (u32, u32) {
    (screen_width() as u32, screen_height() as u32)
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("=== Pedych Game v{} ===", VERSION);

    let config = GameConfig::load(CONFIG_PATH).unwrap_or_else(|e| fatal(CONFIG_PATH, e));

    let source = MapSource::load(&config.map_path).unwrap_or_else(|e| fatal(&config.map_path, e));
    let background = Color::from_rgba(config.background.0, config.background.1, config.background.2, 255);
    let player_texture = config.player_texture.clone();

    let mut session = GameSession::new(config, &source).unwrap_or_else(|e| fatal("level", e));
    let textures = Textures::load(&player_texture, session.scene().tilesets())
        .await
        .unwrap_or_else(|e| fatal("textures", e));

    let mut last_size = window_size();
    session.on_resize(last_size.0, last_size.1);

    let mut clock = FrameClock::default();

    loop {
        let size = window_size();
        if size != last_size {
            session.on_resize(size.0, size.1);
            last_size = size;
        }

        for key in get_keys_pressed() {
            if let Some(key) = GameKey::from_keycode(key) {
                session.on_key_press(key);
            }
        }
        for key in get_keys_released() {
            if let Some(key) = GameKey::from_keycode(key) {
                session.on_key_release(key);
            }
        }

        let steps = clock.advance(get_frame_time() as f64);
        for _ in 0..steps {
            session.on_update(clock.step_seconds());
        }

        draw_session(&session, &textures, background);

        next_frame().await;
    }
}
