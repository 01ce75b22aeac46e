//! Scene
//!
//! Runtime container for a level: the map's named sprite lists in draw
//! order plus the tilesets needed to draw them.

use super::sprite::SpriteList;
use super::tilemap::{TileMap, Tileset};

/// A named sprite list with its draw settings
#[derive(Debug, Clone)]
pub struct SceneLayer {
    pub name: String,
    pub opacity: f32,
    pub sprites: SpriteList,
}

#[derive(Debug, Clone)]
pub struct Scene {
    layers: Vec<SceneLayer>,
    tilesets: Vec<Tileset>,
    /// Map size in world pixels
    pub width: f32,
    pub height: f32,
}

impl Scene {
    pub fn from_tilemap(map: TileMap) -> Self {
        let (width, height) = map.size_px();
        let layers = map
            .layers
            .into_iter()
            .map(|l| SceneLayer {
                name: l.name,
                opacity: l.opacity,
                sprites: l.sprites,
            })
            .collect();
        Self {
            layers,
            tilesets: map.tilesets,
            width,
            height,
        }
    }

    /// Layers in draw order
    pub fn layers(&self) -> &[SceneLayer] {
        &self.layers
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&SpriteList> {
        self.layers.iter().find(|l| l.name == name).map(|l| &l.sprites)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SpriteList> {
        self.layers.iter_mut().find(|l| l.name == name).map(|l| &mut l.sprites)
    }

    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    /// Tileset that owns a gid
    pub fn tileset_for(&self, gid: u32) -> Option<&Tileset> {
        self.tilesets.iter().find(|ts| ts.contains(gid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sprite::{Sprite, SpriteImage};
    use crate::engine::tilemap::TileLayer;
    use std::path::PathBuf;

    fn map() -> TileMap {
        let mut ground = SpriteList::new();
        ground.push(Sprite::new(SpriteImage::Tile { gid: 1 }, 64.0, 64.0).with_position(32.0, 32.0));
        TileMap {
            width: 10,
            height: 5,
            tile_width: 64.0,
            tile_height: 64.0,
            layers: vec![
                TileLayer { name: "Background".into(), opacity: 0.5, sprites: SpriteList::new() },
                TileLayer { name: "Platforms".into(), opacity: 1.0, sprites: ground },
            ],
            tilesets: vec![Tileset {
                name: "tiles".into(),
                first_gid: 1,
                tile_count: 2,
                image: PathBuf::from("tiles.png"),
                tile_width: 128,
                tile_height: 128,
                columns: 2,
                margin: 0,
                spacing: 0,
            }],
        }
    }

    #[test]
    fn test_from_tilemap_keeps_order_and_size() {
        let scene = Scene::from_tilemap(map());
        let names: Vec<&str> = scene.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Background", "Platforms"]);
        assert_eq!((scene.width, scene.height), (640.0, 320.0));
        assert_eq!(scene.get("Platforms").map(|l| l.len()), Some(1));
        assert!(scene.get("Coins").is_none());
    }

    #[test]
    fn test_tileset_lookup() {
        let scene = Scene::from_tilemap(map());
        assert_eq!(scene.tileset_for(2).map(|t| t.name.as_str()), Some("tiles"));
        assert!(scene.tileset_for(3).is_none());
    }
}
