//! Level data and the level collaborator contract
//!
//! A level is an ordered list of named layers. Tile layers feed rendering and
//! the static [`TileIndex`]; object layers carry spawn points, platforms and
//! waypoints. [`LevelData`] is the serde form, loadable from RON or TOML
//! through [`Config`].

use crate::config::{require_positive, Config, ConfigError};
use crate::foundation::math::{Rect, Vec2};
use crate::spatial::TileIndex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Level loading and lookup errors
#[derive(Debug, Error)]
pub enum LevelError {
    /// No layer with this name
    #[error("Level has no layer named '{0}'")]
    MissingLayer(String),

    /// Layer exists but holds objects
    #[error("Layer '{0}' is not a tile layer")]
    NotATileLayer(String),

    /// Layer exists but holds tiles
    #[error("Layer '{0}' is not an object layer")]
    NotAnObjectLayer(String),

    /// Required object absent from a layer
    #[error("Layer '{layer}' has no object named '{name}'")]
    MissingObject {
        /// Layer searched
        layer: String,
        /// Object name
        name: String,
    },

    /// Tile dimensions must be finite and positive
    #[error("Invalid tile size {width}x{height}")]
    InvalidTileSize {
        /// Tile width
        width: f32,
        /// Tile height
        height: f32,
    },

    /// Level file could not be read or parsed
    #[error("Failed to parse level: {0}")]
    Parse(#[from] ConfigError),
}

/// One occupied cell of a tile layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePlacement {
    /// Grid column
    pub column: i32,
    /// Grid row
    pub row: i32,
    /// Global tile id
    pub gid: u32,
}

/// Named rectangle on an object layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    /// Object name, e.g. "Player" or "Border"
    pub name: String,
    /// Left edge in world units
    pub x: f32,
    /// Top edge in world units (bottom edge for tile objects)
    pub y: f32,
    /// Width in world units
    pub width: f32,
    /// Height in world units
    pub height: f32,
    /// Tile id for objects drawn with a tile image
    #[serde(default)]
    pub gid: Option<u32>,
}

impl MapObject {
    /// Object position as a vector
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Object size as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Rectangle with `y` treated as the top edge
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Layer payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerContent {
    /// Grid of tiles
    Tiles(Vec<TilePlacement>),
    /// Free-placed objects
    Objects(Vec<MapObject>),
}

/// Named level layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name
    pub name: String,
    /// Layer payload
    pub content: LayerContent,
}

/// Serializable level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// Tile width in world units
    pub tile_width: f32,
    /// Tile height in world units
    pub tile_height: f32,
    /// Layers in draw order
    pub layers: Vec<Layer>,
}

impl Default for LevelData {
    fn default() -> Self {
        Self {
            tile_width: 32.0,
            tile_height: 32.0,
            layers: Vec::new(),
        }
    }
}

impl Config for LevelData {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("tile_width", self.tile_width)?;
        require_positive("tile_height", self.tile_height)
    }
}

impl LevelData {
    /// Load a level file, `.ron` or `.toml`
    pub fn load(path: &str) -> Result<Self, LevelError> {
        let level = Self::load_from_file(path).map_err(|error| {
            log::error!("Failed to load level {}: {}", path, error);
            LevelError::from(error)
        })?;
        log::info!("Loaded level {} with {} layers", path, level.layers.len());
        Ok(level)
    }

    fn layer(&self, name: &str) -> Result<&Layer, LevelError> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .ok_or_else(|| LevelError::MissingLayer(name.to_string()))
    }
}

/// Level queries used to build a scene
pub trait LevelSource {
    /// Size of one tile in world units
    fn tile_size(&self) -> Vec2;

    /// Number of layers
    fn layer_count(&self) -> usize;

    /// Draw-order index of a named layer
    fn layer_index(&self, name: &str) -> Option<usize>;

    /// Objects of a named object layer
    fn tile_object_data(&self, layer: &str) -> Result<&[MapObject], LevelError>;

    /// Cells of a named tile layer
    fn static_tiles(&self, layer: &str) -> Result<&[TilePlacement], LevelError>;

    /// First object called `name` on `layer`
    fn find_object(&self, layer: &str, name: &str) -> Result<&MapObject, LevelError> {
        self.tile_object_data(layer)?
            .iter()
            .find(|object| object.name == name)
            .ok_or_else(|| LevelError::MissingObject {
                layer: layer.to_string(),
                name: name.to_string(),
            })
    }

    /// Build the collision index from a tile layer
    fn build_tile_index(&self, layer: &str, depth: u32) -> Result<TileIndex, LevelError> {
        let size = self.tile_size();
        if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(LevelError::InvalidTileSize {
                width: size.x,
                height: size.y,
            });
        }
        let tiles = self.static_tiles(layer)?;
        let index = TileIndex::from_tiles(
            size,
            depth,
            tiles.iter().map(|tile| ((tile.column, tile.row), tile.gid)),
        );
        log::debug!("Indexed {} tiles from layer '{}'", index.len(), layer);
        Ok(index)
    }
}

impl LevelSource for LevelData {
    fn tile_size(&self) -> Vec2 {
        Vec2::new(self.tile_width, self.tile_height)
    }

    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.name == name)
    }

    fn tile_object_data(&self, layer: &str) -> Result<&[MapObject], LevelError> {
        match &self.layer(layer)?.content {
            LayerContent::Objects(objects) => Ok(objects),
            LayerContent::Tiles(_) => Err(LevelError::NotAnObjectLayer(layer.to_string())),
        }
    }

    fn static_tiles(&self, layer: &str) -> Result<&[TilePlacement], LevelError> {
        match &self.layer(layer)?.content {
            LayerContent::Tiles(tiles) => Ok(tiles),
            LayerContent::Objects(_) => Err(LevelError::NotATileLayer(layer.to_string())),
        }
    }
}
