//! Engine layer
//!
//! The general-purpose 2D pieces the game is built on:
//! - Tiled JSON map loading into sprite lists
//! - Sprites, sprite lists and overlap queries (with an optional spatial hash)
//! - Platformer physics (gravity, wall collision, grounded check)
//! - Scrolling and fixed cameras on top of macroquad's `Camera2D`
//! - A fixed-step clock for frame-rate independent updates
//!
//! Nothing here knows about scores, coins or game over.

mod bounds;
mod camera;
mod clock;
mod physics;
mod scene;
mod spatial_hash;
mod sprite;
mod tilemap;

pub use bounds::Bounds;
pub use camera::Camera;
pub use clock::FrameClock;
pub use physics::PhysicsEnginePlatformer;
pub use scene::Scene;
pub use sprite::{check_for_collision_with_list, Sprite, SpriteImage};
pub use tilemap::{LayerOptions, MapSource, TileMapError, Tileset};
