//! Game Session
//!
//! Everything that changes while playing: the level's sprite lists, the
//! player, both cameras, the score and whether the player is still alive.
//! The frame loop feeds it key events, fixed update steps and resizes;
//! the renderer only reads from it.
//!
//! Nothing here touches the window, so the whole game loop runs in tests.

use std::collections::HashMap;

use log::{debug, info, trace};

use crate::config::GameConfig;
use crate::engine::{
    check_for_collision_with_list, Camera, LayerOptions, MapSource, PhysicsEnginePlatformer,
    Scene, Sprite, SpriteImage, TileMapError,
};
use super::input::{GameKey, InputTracker};

/// Static collision geometry
pub const PLATFORMS_LAYER: &str = "Platforms";
/// Collectibles
pub const COINS_LAYER: &str = "Coins";

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Playing,
    /// Player fell off the world; waiting for restart
    GameOver,
}

/// Camera origin that centers the player, never past the map's lower-left corner
pub fn camera_target(player: &Sprite, viewport_width: f32, viewport_height: f32) -> (f32, f32) {
    let x = player.center_x - viewport_width / 2.0;
    let y = player.center_y - viewport_height / 2.0;
    (x.max(0.0), y.max(0.0))
}

pub struct GameSession {
    config: GameConfig,
    /// Freshly built level, cloned on every restart
    pristine: Scene,
    scene: Scene,
    player: Sprite,
    physics: PhysicsEnginePlatformer,
    camera_sprites: Camera,
    camera_gui: Camera,
    score: u32,
    phase: GamePhase,
    input: InputTracker,
    window_size: (u32, u32),
}

impl GameSession {
    /// Build the level from a parsed map and start playing
    pub fn new(config: GameConfig, source: &MapSource) -> Result<Self, TileMapError> {
        let pristine = build_scene(&config, source)?;
        let window_size = (config.screen_width, config.screen_height);
        let mut session = Self {
            physics: PhysicsEnginePlatformer::new(config.gravity),
            player: spawn_player(&config),
            scene: pristine.clone(),
            pristine,
            camera_sprites: Camera::world(window_size.0, window_size.1),
            camera_gui: Camera::screen(window_size.0, window_size.1),
            score: 0,
            phase: GamePhase::Playing,
            input: InputTracker::default(),
            window_size,
            config,
        };
        session.setup();
        Ok(session)
    }

    /// Reset everything but held keys: fresh level, player at spawn, score 0
    pub fn setup(&mut self) {
        let (w, h) = self.window_size;
        self.camera_sprites = Camera::world(w, h);
        self.camera_gui = Camera::screen(w, h);
        self.scene = self.pristine.clone();
        self.player = spawn_player(&self.config);
        self.physics = PhysicsEnginePlatformer::new(self.config.gravity);
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.update_player_speed();
    }

    // =========================================================================
    // Event handlers
    // =========================================================================

    pub fn on_key_press(&mut self, key: GameKey) {
        match key {
            GameKey::Jump => {
                if let Some(walls) = self.scene.get(PLATFORMS_LAYER) {
                    if self.physics.can_jump(&self.player, walls) {
                        self.player.change_y = self.config.player_jump_speed;
                    }
                }
            }
            GameKey::MoveLeft | GameKey::MoveRight => {
                self.input.press(key);
                self.update_player_speed();
            }
            GameKey::Restart => {
                if self.phase == GamePhase::GameOver {
                    info!("Restarting");
                    self.setup();
                }
            }
        }
    }

    pub fn on_key_release(&mut self, key: GameKey) {
        if self.input.release(key) {
            self.update_player_speed();
        }
    }

    /// One fixed simulation step
    pub fn on_update(&mut self, _delta_time: f32) {
        if self.phase == GamePhase::GameOver {
            return;
        }

        if let Some(walls) = self.scene.get(PLATFORMS_LAYER) {
            let step = self.physics.update(&mut self.player, walls);
            if step.hit_ceiling || step.hit_wall {
                trace!("Player blocked at ({}, {}): {:?}", self.player.center_x, self.player.center_y, step);
            }
        }

        if self.player.bottom() < 0.0 {
            self.phase = GamePhase::GameOver;
            info!("Game over, score {}", self.score);
        }

        self.collect_coins();
        self.center_camera_to_player();
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        debug!("Resize to {}x{}", width, height);
        self.window_size = (width, height);
        self.camera_sprites.resize(width, height);
        self.camera_gui.resize(width, height);
    }

    // =========================================================================
    // Systems
    // =========================================================================

    fn update_player_speed(&mut self) {
        self.player.change_x = self.input.horizontal_velocity(self.config.player_movement_speed);
    }

    /// Remove every coin the player touches and score it. Returns the count.
    fn collect_coins(&mut self) -> u32 {
        let Some(coins) = self.scene.get_mut(COINS_LAYER) else { return 0 };
        let hits = check_for_collision_with_list(&self.player, coins);
        if hits.is_empty() {
            return 0;
        }
        let collected = coins.remove_many(&hits).len() as u32;
        self.score += collected;
        debug!("Collected {} coin(s), score {}", collected, self.score);
        collected
    }

    fn center_camera_to_player(&mut self) {
        let target = camera_target(
            &self.player,
            self.camera_sprites.viewport_width,
            self.camera_sprites.viewport_height,
        );
        self.camera_sprites.move_to(target);
    }

    // =========================================================================
    // Read access for rendering
    // =========================================================================

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn player(&self) -> &Sprite {
        &self.player
    }

    pub fn camera_sprites(&self) -> &Camera {
        &self.camera_sprites
    }

    pub fn camera_gui(&self) -> &Camera {
        &self.camera_gui
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

fn layer_options(config: &GameConfig) -> HashMap<String, LayerOptions> {
    let mut options = HashMap::new();
    options.insert(
        PLATFORMS_LAYER.to_string(),
        LayerOptions { use_spatial_hash: true, scaling: None },
    );
    options.insert(
        COINS_LAYER.to_string(),
        LayerOptions { use_spatial_hash: false, scaling: Some(config.coin_scaling) },
    );
    options
}

fn build_scene(config: &GameConfig, source: &MapSource) -> Result<Scene, TileMapError> {
    let map = source.build(config.tile_scaling, &layer_options(config))?;
    let scene = Scene::from_tilemap(map);
    for required in [PLATFORMS_LAYER, COINS_LAYER] {
        if !scene.has_layer(required) {
            return Err(TileMapError::MissingLayer(required.to_string()));
        }
    }
    info!(
        "Level built: {}x{} px, {} platforms, {} coins",
        scene.width,
        scene.height,
        scene.get(PLATFORMS_LAYER).map_or(0, |l| l.len()),
        scene.get(COINS_LAYER).map_or(0, |l| l.len()),
    );
    Ok(scene)
}

fn spawn_player(config: &GameConfig) -> Sprite {
    let (w, h) = config.player_dimensions();
    Sprite::new(SpriteImage::Player, w, h).with_position(config.spawn.0, config.spawn.1)
}
