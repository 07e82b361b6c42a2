//! Game object capability
//!
//! The registry is generic over its object type; the collision and draw
//! passes only need the geometric view exposed here.

use crate::foundation::math::{Rect, Vec2};

/// Geometric capability shared by every simulated object
pub trait GameObject {
    /// Transform-derived bounds of the rendered sprite
    fn global_bounds(&self) -> Rect;

    /// Authoritative collision rectangle (defaults to the global bounds)
    fn hitbox(&self) -> Rect {
        self.global_bounds()
    }

    /// Hitbox at the start of the current step
    fn previous_hitbox(&self) -> Rect {
        self.hitbox()
    }

    /// Velocity in world units per second (zero for static objects)
    fn velocity(&self) -> Vec2 {
        Vec2::zeros()
    }

    /// Render layer index
    fn depth(&self) -> u32;
}
