//! Math utilities and types
//!
//! Provides the 2D vector alias and the axis-aligned rectangle used for
//! bounds and hitboxes. Screen space: +X right, +Y down.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Axis-aligned rectangle in world space
///
/// Edge setters (`set_left`, `set_bottom`, ...) translate the rectangle so the
/// given edge lands on the value; they never resize it. This is what collision
/// resolution relies on when clamping a hitbox flush against an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge (minimum X)
    pub left: f32,

    /// Top edge (minimum Y)
    pub top: f32,

    /// Horizontal extent
    pub width: f32,

    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Create a rectangle from a position and a size vector
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    /// Right edge (maximum X)
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge (maximum Y)
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Width and height as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Horizontal center
    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }

    /// Vertical center
    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.center_y())
    }

    /// Move so the left edge sits at `value`
    pub fn set_left(&mut self, value: f32) {
        self.left = value;
    }

    /// Move so the right edge sits at `value`
    pub fn set_right(&mut self, value: f32) {
        self.left = value - self.width;
    }

    /// Move so the top edge sits at `value`
    pub fn set_top(&mut self, value: f32) {
        self.top = value;
    }

    /// Move so the bottom edge sits at `value`
    pub fn set_bottom(&mut self, value: f32) {
        self.top = value - self.height;
    }

    /// Move so the top-left corner sits at `position`
    pub fn set_position(&mut self, position: Vec2) {
        self.left = position.x;
        self.top = position.y;
    }

    /// Translate horizontally
    pub fn move_left(&mut self, delta: f32) {
        self.left += delta;
    }

    /// Translate vertically
    pub fn move_top(&mut self, delta: f32) {
        self.top += delta;
    }

    /// Return a copy translated by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.left + offset.x, self.top + offset.y, self.width, self.height)
    }

    /// Overlapping region of two rectangles, if they overlap with positive area
    ///
    /// Rectangles that only share an edge do not intersect.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Check for a positive-area overlap
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Check whether a point lies inside (right and bottom edges exclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_setters_translate() {
        let mut rect = Rect::new(10.0, 20.0, 30.0, 40.0);

        rect.set_right(100.0);
        assert_eq!(rect.left, 70.0);
        assert_eq!(rect.width, 30.0);

        rect.set_bottom(50.0);
        assert_eq!(rect.top, 10.0);
        assert_eq!(rect.height, 40.0);
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 32.0, 32.0);
        let b = Rect::new(32.0, 0.0, 32.0, 32.0);
        assert!(!a.intersects(&b));

        let c = Rect::new(31.0, 31.0, 2.0, 2.0);
        assert_eq!(a.intersection(&c), Some(Rect::new(31.0, 31.0, 1.0, 1.0)));
    }

    #[test]
    fn test_center() {
        let rect = Rect::new(0.0, 10.0, 20.0, 40.0);
        assert_eq!(rect.center(), Vec2::new(10.0, 30.0));
    }
}
