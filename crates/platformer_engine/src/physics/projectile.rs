//! Projectile hit tests

use super::collision::Obstacle;
use super::pixel_mask::{masks_overlap, PlacedMask};
use crate::foundation::math::Rect;
use crate::spatial::TileIndex;

/// Whether a projectile touches level geometry or a collision obstacle
pub fn hits_level(hitbox: Rect, tiles: &TileIndex, obstacles: &[Obstacle]) -> bool {
    tiles.any_in_region(hitbox)
        || obstacles
            .iter()
            .any(|obstacle| obstacle.hitbox.intersects(&hitbox))
}

/// Two-stage hit test: bounding boxes first, then opaque pixels
pub fn confirm_hit(
    projectile_bounds: Rect,
    projectile_mask: PlacedMask<'_>,
    target_bounds: Rect,
    target_mask: PlacedMask<'_>,
) -> bool {
    projectile_bounds.intersects(&target_bounds) && masks_overlap(projectile_mask, target_mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::physics::PixelMask;

    #[test]
    fn test_hits_level_tile_and_obstacle() {
        let tiles = TileIndex::from_tiles(Vec2::new(32.0, 32.0), 2, [((1, 0), 1)]);
        assert!(hits_level(Rect::new(30.0, 4.0, 4.0, 4.0), &tiles, &[]));
        assert!(!hits_level(Rect::new(4.0, 4.0, 4.0, 4.0), &tiles, &[]));

        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let obstacle = Obstacle {
            hitbox: rect,
            previous_hitbox: rect,
            velocity: Vec2::zeros(),
            source: None,
        };
        assert!(hits_level(Rect::new(4.0, 4.0, 4.0, 4.0), &tiles, &[obstacle]));
    }

    #[test]
    fn test_confirm_hit_requires_pixels() {
        let ring = PixelMask::from_fn(16, 16, |x, y| x == 0 || y == 0 || x == 15 || y == 15);
        let dot = PixelMask::solid(2, 2);
        let target = Rect::new(0.0, 0.0, 16.0, 16.0);

        // Inside the hollow middle
        let inner = Rect::new(7.0, 7.0, 2.0, 2.0);
        assert!(!confirm_hit(
            inner,
            PlacedMask::at(&dot, inner.position(), false),
            target,
            PlacedMask::at(&ring, target.position(), false),
        ));

        let edge = Rect::new(14.0, 7.0, 2.0, 2.0);
        assert!(confirm_hit(
            edge,
            PlacedMask::at(&dot, edge.position(), false),
            target,
            PlacedMask::at(&ring, target.position(), false),
        ));
    }
}
