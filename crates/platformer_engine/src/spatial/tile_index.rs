//! Tile-grid spatial index
//!
//! Sparse map from integer grid cell to static tile. Built once per level
//! load and read-only afterwards. Region queries touch only the cells covered
//! by the query rectangle.

use crate::foundation::math::{Rect, Vec2};
use crate::scene::GameObject;
use std::collections::HashMap;
use std::ops::Range;

/// Integer grid coordinate (column, row)
pub type TileCoord = (i32, i32);

/// Lightweight view of one occupied cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileView {
    /// Grid coordinate of the cell
    pub coord: TileCoord,

    /// Tile id from the level data
    pub tile_id: u32,

    /// World-space bounding box of the cell
    pub bounds: Rect,

    depth: u32,
}

impl GameObject for TileView {
    fn global_bounds(&self) -> Rect {
        self.bounds
    }

    fn depth(&self) -> u32 {
        self.depth
    }
}

/// Static level geometry indexed by grid cell
#[derive(Debug, Clone)]
pub struct TileIndex {
    tile_size: Vec2,
    depth: u32,
    tiles: HashMap<TileCoord, u32>,
}

impl TileIndex {
    /// Build an index from occupied cells
    ///
    /// `depth` is the render layer the geometry belongs to. Later duplicates of
    /// a coordinate replace earlier ones.
    pub fn from_tiles<I>(tile_size: Vec2, depth: u32, tiles: I) -> Self
    where
        I: IntoIterator<Item = (TileCoord, u32)>,
    {
        debug_assert!(tile_size.x > 0.0 && tile_size.y > 0.0, "tile size must be positive");
        Self {
            tile_size,
            depth,
            tiles: tiles.into_iter().collect(),
        }
    }

    /// Index with no geometry
    pub fn empty(tile_size: Vec2) -> Self {
        Self::from_tiles(tile_size, 0, std::iter::empty())
    }

    /// Size of one grid cell in world units
    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no cell is occupied
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Grid ranges covered by `region`
    ///
    /// Columns span `floor(left / w) .. ceil(right / w)`; rows likewise. A
    /// rectangle whose edge lies exactly on a grid line does not reach into the
    /// next cell.
    pub fn cell_range(&self, region: &Rect) -> (Range<i32>, Range<i32>) {
        let start_x = (region.left / self.tile_size.x).floor() as i32;
        let start_y = (region.top / self.tile_size.y).floor() as i32;
        let end_x = (region.right() / self.tile_size.x).ceil() as i32;
        let end_y = (region.bottom() / self.tile_size.y).ceil() as i32;
        (start_x..end_x, start_y..end_y)
    }

    /// View of the tile at `coord`, if occupied
    pub fn tile_at(&self, coord: TileCoord) -> Option<TileView> {
        self.tiles.get(&coord).map(|tile_id| TileView {
            coord,
            tile_id: *tile_id,
            bounds: Rect::new(
                coord.0 as f32 * self.tile_size.x,
                coord.1 as f32 * self.tile_size.y,
                self.tile_size.x,
                self.tile_size.y,
            ),
            depth: self.depth,
        })
    }

    /// Occupied cells overlapping `region`, row by row from the top-left
    pub fn query_region(&self, region: Rect) -> impl Iterator<Item = TileView> + '_ {
        let (columns, rows) = self.cell_range(&region);
        rows.flat_map(move |y| columns.clone().map(move |x| (x, y)))
            .filter_map(move |coord| self.tile_at(coord))
    }

    /// Whether any occupied cell overlaps `region`
    pub fn any_in_region(&self, region: Rect) -> bool {
        self.query_region(region).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: &[TileCoord]) -> TileIndex {
        TileIndex::from_tiles(Vec2::new(32.0, 32.0), 2, cells.iter().map(|c| (*c, 1)))
    }

    fn coords(index: &TileIndex, region: Rect) -> Vec<TileCoord> {
        index.query_region(region).map(|tile| tile.coord).collect()
    }

    #[test]
    fn test_exact_tile_rect_returns_single_tile() {
        let index = grid(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(coords(&index, Rect::new(0.0, 0.0, 32.0, 32.0)), vec![(0, 0)]);
    }

    #[test]
    fn test_rect_straddling_corner_returns_four_tiles() {
        let index = grid(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(
            coords(&index, Rect::new(31.0, 31.0, 2.0, 2.0)),
            vec![(0, 0), (1, 0), (0, 1), (1, 1)]
        );
    }

    #[test]
    fn test_empty_cells_are_skipped() {
        let index = grid(&[(1, 1)]);
        assert_eq!(coords(&index, Rect::new(0.0, 0.0, 64.0, 64.0)), vec![(1, 1)]);
        assert!(!index.any_in_region(Rect::new(0.0, 0.0, 32.0, 32.0)));
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index = TileIndex::empty(Vec2::new(16.0, 16.0));
        assert_eq!(index.query_region(Rect::new(-100.0, -100.0, 500.0, 500.0)).count(), 0);
    }

    #[test]
    fn test_negative_coordinates_floor() {
        let index = grid(&[(-1, -1)]);
        let (columns, rows) = index.cell_range(&Rect::new(-1.0, -1.0, 2.0, 2.0));
        assert_eq!(columns, -1..1);
        assert_eq!(rows, -1..1);
        assert_eq!(coords(&index, Rect::new(-1.0, -1.0, 2.0, 2.0)), vec![(-1, -1)]);
    }

    #[test]
    fn test_tile_view_bounds_are_world_space() {
        let index = grid(&[(3, 2)]);
        let tile = index.tile_at((3, 2)).expect("occupied");
        assert_eq!(tile.bounds, Rect::new(96.0, 64.0, 32.0, 32.0));
        assert_eq!(tile.hitbox(), tile.bounds);
        assert_eq!(tile.depth(), 2);
    }
}
