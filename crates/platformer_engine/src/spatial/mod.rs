//! Spatial partitioning data structures
//!
//! Provides the tile-grid index used to find static level geometry
//! overlapping a rectangle.

mod tile_index;

pub use tile_index::{TileCoord, TileIndex, TileView};
