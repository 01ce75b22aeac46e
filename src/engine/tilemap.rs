//! Tile map loading
//!
//! Reads maps saved by the Tiled editor in its JSON format and turns every
//! tile layer into a `SpriteList` of tile sprites.
//!
//! Coordinates: Tiled rows run top to bottom, the world is y-up with the
//! map's lower-left corner at (0, 0). Row 0 therefore ends up at the top.
//!
//! Only the subset this game needs is supported: orthogonal tile layers
//! stored as plain arrays or uncompressed base64, and atlas tilesets embedded
//! in the map. Object, image and group layers are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use log::debug;
use serde::Deserialize;

use super::sprite::{Sprite, SpriteImage, SpriteList};

/// Validation limits to reject broken or hostile map files early
pub mod limits {
    /// Maximum map width or height in tiles
    pub const MAX_MAP_DIMENSION: u32 = 4096;
    /// Maximum tile width or height in pixels
    pub const MAX_TILE_SIZE: u32 = 1024;
    /// Maximum number of layers
    pub const MAX_LAYERS: usize = 64;
}

/// Tiled stores flip/rotation flags in the top four bits of each gid
const GID_FLAG_MASK: u32 = 0xF000_0000;

/// Error type for tile map loading
#[derive(Debug)]
pub enum TileMapError {
    IoError(std::io::Error),
    ParseError(serde_json::Error),
    ValidationError(String),
    MissingLayer(String),
}

impl From<std::io::Error> for TileMapError {
    fn from(e: std::io::Error) -> Self {
        TileMapError::IoError(e)
    }
}

impl From<serde_json::Error> for TileMapError {
    fn from(e: serde_json::Error) -> Self {
        TileMapError::ParseError(e)
    }
}

impl std::fmt::Display for TileMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileMapError::IoError(e) => write!(f, "IO error: {}", e),
            TileMapError::ParseError(e) => write!(f, "Parse error: {}", e),
            TileMapError::ValidationError(e) => write!(f, "Validation error: {}", e),
            TileMapError::MissingLayer(name) => write!(f, "Map has no layer named '{}'", name),
        }
    }
}

impl std::error::Error for TileMapError {}

// =============================================================================
// Tiled JSON document
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

/// Top-level Tiled map document
#[derive(Debug, Clone, Deserialize)]
pub struct TiledMap {
    pub width: u32,
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub layers: Vec<TiledLayer>,
    #[serde(default)]
    pub tilesets: Vec<TiledTileset>,
}

/// Raw layer cells: a JSON array, or a string when the layer has an encoding
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LayerData {
    Cells(Vec<u32>),
    Encoded(String),
}

impl Default for LayerData {
    fn default() -> Self {
        LayerData::Cells(Vec::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledLayer {
    pub name: String,
    /// "tilelayer", "objectgroup", "imagelayer" or "group"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub data: LayerData,
    /// "csv" or "base64"
    pub encoding: Option<String>,
    /// "", "zlib", "gzip" or "zstd"
    pub compression: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

impl TiledLayer {
    /// Decoded cell gids. Empty until `decode_data` has run on encoded layers.
    pub fn cells(&self) -> &[u32] {
        match &self.data {
            LayerData::Cells(cells) => cells,
            LayerData::Encoded(_) => &[],
        }
    }

    /// Turn base64 layer data into plain cells (little-endian u32 per cell)
    fn decode_data(&mut self) -> Result<(), TileMapError> {
        let LayerData::Encoded(text) = &self.data else {
            return Ok(());
        };
        let invalid =
            |msg: String| TileMapError::ValidationError(format!("layer '{}': {}", self.name, msg));

        match self.compression.as_deref().unwrap_or("") {
            "" => {}
            other => return Err(invalid(format!("{} compressed data is not supported", other))),
        }
        match self.encoding.as_deref() {
            Some("base64") => {}
            Some(other) => return Err(invalid(format!("unsupported data encoding '{}'", other))),
            None => return Err(invalid("string data without an encoding".to_string())),
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(text.trim())
            .map_err(|e| invalid(format!("bad base64 data: {}", e)))?;
        if bytes.len() % 4 != 0 {
            return Err(invalid(format!("{} data bytes is not a whole number of cells", bytes.len())));
        }
        let cells = bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        self.data = LayerData::Cells(cells);
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledTileset {
    pub firstgid: u32,
    #[serde(default)]
    pub name: String,
    pub image: Option<String>,
    #[serde(default)]
    pub imagewidth: u32,
    #[serde(default)]
    pub imageheight: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    pub tilecount: u32,
    pub columns: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub spacing: u32,
}

// =============================================================================
// Loaded map
// =============================================================================

/// Per-layer load settings, keyed by layer name
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerOptions {
    /// Build a spatial hash for the layer (static collision geometry)
    pub use_spatial_hash: bool,
    /// Sprite scaling for this layer (defaults to the map scaling)
    pub scaling: Option<f32>,
}

/// A tileset atlas ready for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    pub name: String,
    pub first_gid: u32,
    pub tile_count: u32,
    /// Image path resolved against the map file's directory
    pub image: PathBuf,
    pub tile_width: u32,
    pub tile_height: u32,
    pub columns: u32,
    pub margin: u32,
    pub spacing: u32,
}

impl Tileset {
    pub fn contains(&self, gid: u32) -> bool {
        gid >= self.first_gid && gid - self.first_gid < self.tile_count
    }

    /// Source rectangle `(x, y, w, h)` of a gid inside the atlas image
    pub fn source_rect(&self, gid: u32) -> Option<(f32, f32, f32, f32)> {
        if !self.contains(gid) || self.columns == 0 {
            return None;
        }
        let local = u64::from(gid - self.first_gid);
        let columns = u64::from(self.columns);
        let (col, row) = (local % columns, local / columns);
        let x = u64::from(self.margin) + col * (u64::from(self.tile_width) + u64::from(self.spacing));
        let y = u64::from(self.margin) + row * (u64::from(self.tile_height) + u64::from(self.spacing));
        Some((x as f32, y as f32, self.tile_width as f32, self.tile_height as f32))
    }
}

/// A named layer of tile sprites
#[derive(Debug, Clone)]
pub struct TileLayer {
    pub name: String,
    pub opacity: f32,
    pub sprites: SpriteList,
}

/// A map converted to sprites in world space
#[derive(Debug, Clone)]
pub struct TileMap {
    /// Size in tiles
    pub width: u32,
    pub height: u32,
    /// Scaled tile size in world pixels
    pub tile_width: f32,
    pub tile_height: f32,
    /// Tile layers in file (draw) order
    pub layers: Vec<TileLayer>,
    pub tilesets: Vec<Tileset>,
}

impl TileMap {
    /// Map size in world pixels
    pub fn size_px(&self) -> (f32, f32) {
        (self.width as f32 * self.tile_width, self.height as f32 * self.tile_height)
    }
}

/// A parsed map document plus the directory its relative paths resolve from.
///
/// Kept around so a level can be rebuilt without touching the disk again.
#[derive(Debug, Clone)]
pub struct MapSource {
    pub document: TiledMap,
    pub base_dir: PathBuf,
}

impl MapSource {
    /// Read and parse a map file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TileMapError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_json(&json, base_dir)
    }

    /// Parse map JSON already in memory
    pub fn from_json(json: &str, base_dir: impl Into<PathBuf>) -> Result<Self, TileMapError> {
        let mut document: TiledMap = serde_json::from_str(json)?;
        for layer in document.layers.iter_mut().filter(|l| l.kind == "tilelayer") {
            layer.decode_data()?;
        }
        validate_document(&document)?;
        Ok(Self {
            document,
            base_dir: base_dir.into(),
        })
    }

    /// Build world-space sprites for every tile layer
    pub fn build(
        &self,
        scaling: f32,
        layer_options: &HashMap<String, LayerOptions>,
    ) -> Result<TileMap, TileMapError> {
        let doc = &self.document;
        let tile_w = doc.tilewidth as f32 * scaling;
        let tile_h = doc.tileheight as f32 * scaling;

        let tilesets: Vec<Tileset> = doc
            .tilesets
            .iter()
            .filter_map(|ts| {
                let image = ts.image.as_ref()?;
                Some(Tileset {
                    name: ts.name.clone(),
                    first_gid: ts.firstgid,
                    tile_count: ts.tilecount,
                    image: self.base_dir.join(image),
                    tile_width: ts.tilewidth,
                    tile_height: ts.tileheight,
                    columns: ts.columns,
                    margin: ts.margin,
                    spacing: ts.spacing,
                })
            })
            .collect();

        let mut layers = Vec::new();
        for layer in &doc.layers {
            if layer.kind != "tilelayer" {
                debug!("Skipping {} layer '{}'", layer.kind, layer.name);
                continue;
            }

            let options = layer_options.get(&layer.name).copied().unwrap_or_default();
            let layer_scaling = options.scaling.unwrap_or(scaling);
            let sprite_w = doc.tilewidth as f32 * layer_scaling;
            let sprite_h = doc.tileheight as f32 * layer_scaling;

            let mut sprites = if options.use_spatial_hash {
                SpriteList::with_spatial_hash()
            } else {
                SpriteList::new()
            };
            sprites.visible = layer.visible;

            for (i, raw) in layer.cells().iter().enumerate() {
                let gid = raw & !GID_FLAG_MASK;
                if gid == 0 {
                    continue;
                }
                if !tilesets.iter().any(|ts| ts.contains(gid)) {
                    return Err(TileMapError::ValidationError(format!(
                        "layer '{}': gid {} is not in any tileset",
                        layer.name, gid
                    )));
                }
                let col = (i as u32 % layer.width) as f32;
                let row = (i as u32 / layer.width) as f32;
                let center_x = (col + 0.5) * tile_w;
                let center_y = (layer.height as f32 - row - 0.5) * tile_h;
                sprites.push(
                    Sprite::new(SpriteImage::Tile { gid }, sprite_w, sprite_h)
                        .with_position(center_x, center_y),
                );
            }

            layers.push(TileLayer {
                name: layer.name.clone(),
                opacity: layer.opacity,
                sprites,
            });
        }

        Ok(TileMap {
            width: doc.width,
            height: doc.height,
            tile_width: tile_w,
            tile_height: tile_h,
            layers,
            tilesets,
        })
    }
}

fn validate_document(doc: &TiledMap) -> Result<(), TileMapError> {
    let fail = |msg: String| -> Result<(), TileMapError> {
        Err(TileMapError::ValidationError(msg))
    };

    if doc.width == 0 || doc.height == 0 {
        return fail(format!("map size {}x{} is empty", doc.width, doc.height));
    }
    if doc.width > limits::MAX_MAP_DIMENSION || doc.height > limits::MAX_MAP_DIMENSION {
        return fail(format!(
            "map size {}x{} exceeds {}",
            doc.width, doc.height, limits::MAX_MAP_DIMENSION
        ));
    }
    if doc.tilewidth == 0 || doc.tileheight == 0
        || doc.tilewidth > limits::MAX_TILE_SIZE || doc.tileheight > limits::MAX_TILE_SIZE
    {
        return fail(format!("invalid tile size {}x{}", doc.tilewidth, doc.tileheight));
    }
    if doc.layers.len() > limits::MAX_LAYERS {
        return fail(format!("too many layers ({} > {})", doc.layers.len(), limits::MAX_LAYERS));
    }

    for layer in doc.layers.iter().filter(|l| l.kind == "tilelayer") {
        if layer.width == 0 || layer.height == 0 {
            return fail(format!("layer '{}': empty size", layer.name));
        }
        let expected = layer.width as usize * layer.height as usize;
        if layer.cells().len() != expected {
            return fail(format!(
                "layer '{}': data has {} cells, expected {}",
                layer.name, layer.cells().len(), expected
            ));
        }
    }

    for ts in &doc.tilesets {
        if ts.firstgid == 0 {
            return fail(format!("tileset '{}': firstgid must be >= 1", ts.name));
        }
        if ts.firstgid.checked_add(ts.tilecount).is_none() {
            return fail(format!(
                "tileset '{}': gid range {}+{} overflows",
                ts.name, ts.firstgid, ts.tilecount
            ));
        }
        if ts.tilewidth > limits::MAX_TILE_SIZE || ts.tileheight > limits::MAX_TILE_SIZE
            || ts.margin > limits::MAX_TILE_SIZE || ts.spacing > limits::MAX_TILE_SIZE
        {
            return fail(format!(
                "tileset '{}': tile {}x{}, margin {}, spacing {} exceed {}",
                ts.name, ts.tilewidth, ts.tileheight, ts.margin, ts.spacing, limits::MAX_TILE_SIZE
            ));
        }
        if ts.image.is_some() {
            if ts.columns == 0 || ts.tilewidth == 0 || ts.tileheight == 0 {
                return fail(format!("tileset '{}': atlas with zero columns or tile size", ts.name));
            }
            validate_atlas_size(ts)?;
        }
    }

    Ok(())
}

/// The atlas image must hold every tile the tileset claims.
/// Skipped when the map doesn't record the image size.
fn validate_atlas_size(ts: &TiledTileset) -> Result<(), TileMapError> {
    if ts.imagewidth == 0 || ts.imageheight == 0 {
        return Ok(());
    }
    let span = |count: u64, tile: u32| -> u64 {
        u64::from(ts.margin) + count * (u64::from(tile) + u64::from(ts.spacing)) - u64::from(ts.spacing)
    };
    let columns = u64::from(ts.columns);
    let rows = u64::from(ts.tilecount).div_ceil(columns).max(1);
    let (need_w, need_h) = (span(columns, ts.tilewidth), span(rows, ts.tileheight));
    if need_w > u64::from(ts.imagewidth) || need_h > u64::from(ts.imageheight) {
        return Err(TileMapError::ValidationError(format!(
            "tileset '{}': {}x{} image is too small for {} columns of {}x{} tiles ({}x{} needed)",
            ts.name, ts.imagewidth, ts.imageheight, ts.columns, ts.tilewidth, ts.tileheight, need_w, need_h
        )));
    }
    Ok(())
}
