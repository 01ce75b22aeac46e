//! Sprites and sprite lists
//!
//! A sprite is a positioned, sized box with a per-step velocity and a
//! reference to the image it is drawn with. Sprite lists hold one map layer
//! each and optionally keep a spatial hash for fast overlap queries.

use super::bounds::Bounds;
use super::spatial_hash::SpatialHash;

/// What a sprite is drawn with. Resolved to textures by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteImage {
    /// A tile from the map's tilesets, by Tiled global id
    Tile { gid: u32 },
    /// The player character texture
    Player,
}

/// A single drawable, collidable box
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal velocity in pixels per update step
    pub change_x: f32,
    /// Vertical velocity in pixels per update step (positive is up)
    pub change_y: f32,
    pub image: SpriteImage,
}

impl Sprite {
    pub fn new(image: SpriteImage, width: f32, height: f32) -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            width,
            height,
            change_x: 0.0,
            change_y: 0.0,
            image,
        }
    }

    pub fn with_position(mut self, center_x: f32, center_y: f32) -> Self {
        self.center_x = center_x;
        self.center_y = center_y;
        self
    }

    pub fn left(&self) -> f32 {
        self.center_x - self.width * 0.5
    }

    pub fn right(&self) -> f32 {
        self.center_x + self.width * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.center_y - self.height * 0.5
    }

    pub fn top(&self) -> f32 {
        self.center_y + self.height * 0.5
    }

    pub fn set_left(&mut self, left: f32) {
        self.center_x = left + self.width * 0.5;
    }

    pub fn set_right(&mut self, right: f32) {
        self.center_x = right - self.width * 0.5;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.center_y = bottom + self.height * 0.5;
    }

    pub fn set_top(&mut self, top: f32) {
        self.center_y = top - self.height * 0.5;
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_center(self.center_x, self.center_y, self.width, self.height)
    }
}

/// An ordered group of sprites
#[derive(Debug, Clone, Default)]
pub struct SpriteList {
    sprites: Vec<Sprite>,
    spatial_hash: Option<SpatialHash>,
    pub visible: bool,
}

impl SpriteList {
    pub fn new() -> Self {
        Self {
            sprites: Vec::new(),
            spatial_hash: None,
            visible: true,
        }
    }

    /// List that keeps a spatial hash of its sprites
    pub fn with_spatial_hash() -> Self {
        Self {
            sprites: Vec::new(),
            spatial_hash: Some(SpatialHash::default()),
            visible: true,
        }
    }

    #[cfg(test)]
    pub fn uses_spatial_hash(&self) -> bool {
        self.spatial_hash.is_some()
    }

    pub fn push(&mut self, sprite: Sprite) {
        let index = self.sprites.len();
        if let Some(hash) = &mut self.spatial_hash {
            hash.insert(index, &sprite.bounds());
        }
        self.sprites.push(sprite);
    }

    /// Remove several sprites at once (indices may be in any order)
    pub fn remove_many(&mut self, indices: &[usize]) -> Vec<Sprite> {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut removed = Vec::with_capacity(sorted.len());
        for &index in sorted.iter().rev() {
            if index < self.sprites.len() {
                removed.push(self.sprites.remove(index));
            }
        }
        removed.reverse();
        self.rebuild_hash();
        removed
    }

    fn rebuild_hash(&mut self) {
        if let Some(hash) = &mut self.spatial_hash {
            hash.clear();
            for (i, sprite) in self.sprites.iter().enumerate() {
                hash.insert(i, &sprite.bounds());
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Indices of sprites overlapping `bounds`, ascending
    pub fn overlapping(&self, bounds: &Bounds) -> Vec<usize> {
        match &self.spatial_hash {
            Some(hash) => hash
                .query(bounds)
                .into_iter()
                .filter(|&i| self.sprites[i].bounds().intersects(bounds))
                .collect(),
            None => self
                .sprites
                .iter()
                .enumerate()
                .filter(|(_, s)| s.bounds().intersects(bounds))
                .map(|(i, _)| i)
                .collect(),
        }
    }
}

/// Indices of every sprite in `list` that overlaps `sprite`, ascending
pub fn check_for_collision_with_list(sprite: &Sprite, list: &SpriteList) -> Vec<usize> {
    list.overlapping(&sprite.bounds())
}
