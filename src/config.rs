//! Game configuration
//!
//! Window, scaling, physics and asset settings. Every field has a default
//! matching the shipped game, so the RON file only needs the values that
//! differ. A missing file means "all defaults"; a malformed one is an error.

use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};

/// Where the game looks for its config at startup
pub const CONFIG_PATH: &str = "assets/config.ron";

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub screen_width: u32,
    pub screen_height: u32,

    /// Player sprite scale relative to `player_size`
    pub character_scaling: f32,
    /// Scale applied to map tiles (and map grid positions)
    pub tile_scaling: f32,
    /// Scale applied to coin tiles
    pub coin_scaling: f32,

    /// Horizontal speed in pixels per update step
    pub player_movement_speed: f32,
    /// Downward acceleration in pixels per step per step
    pub gravity: f32,
    /// Upward velocity applied by a jump, pixels per step
    pub player_jump_speed: f32,

    /// Player center at start and after every restart
    pub spawn: (f32, f32),
    /// Unscaled player size in pixels
    pub player_size: (f32, f32),

    pub map_path: String,
    pub player_texture: String,
    /// Clear color (RGB)
    pub background: (u8, u8, u8),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Pedych Game".to_string(),
            screen_width: 1000,
            screen_height: 650,

            character_scaling: 1.0,
            tile_scaling: 0.5,
            coin_scaling: 0.5,

            player_movement_speed: 10.0,
            gravity: 1.0,
            player_jump_speed: 20.0,

            spawn: (128.0, 128.0),
            player_size: (96.0, 128.0),

            map_path: "assets/maps/map.json".to_string(),
            player_texture: "assets/sprites/player_idle.png".to_string(),
            background: (255, 0, 0),
        }
    }
}

impl GameConfig {
    /// Parse config from a RON string
    pub fn from_ron(contents: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(contents)?)
    }

    /// Load config from disk, falling back to defaults when the file is absent
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match fs::read_to_string(path.as_ref()) {
            Ok(contents) => Self::from_ron(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Scaled player size in world pixels
    pub fn player_dimensions(&self) -> (f32, f32) {
        (
            self.player_size.0 * self.character_scaling,
            self.player_size.1 * self.character_scaling,
        )
    }
}
