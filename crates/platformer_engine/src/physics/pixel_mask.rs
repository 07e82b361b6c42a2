//! Per-pixel opacity masks for precise overlap tests
//!
//! Masks are packed one bit per pixel, row-major, 64 pixels per word.

use crate::foundation::math::Vec2;
use image::RgbaImage;

/// Packed opacity mask of a sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMask {
    width: u32,
    height: u32,
    bits: Vec<u64>,
}

impl PixelMask {
    /// Build a mask from a predicate over pixel coordinates
    pub fn from_fn<F>(width: u32, height: u32, mut opaque: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let count = width as usize * height as usize;
        let mut bits = vec![0u64; count.div_ceil(64)];
        for y in 0..height {
            for x in 0..width {
                if opaque(x, y) {
                    let index = y as usize * width as usize + x as usize;
                    bits[index / 64] |= 1 << (index % 64);
                }
            }
        }
        Self { width, height, bits }
    }

    /// Fully opaque mask
    pub fn solid(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Pixels whose alpha is strictly above `alpha_threshold` are opaque
    pub fn from_rgba(image: &RgbaImage, alpha_threshold: u8) -> Self {
        Self::from_fn(image.width(), image.height(), |x, y| {
            image.get_pixel(x, y).0[3] > alpha_threshold
        })
    }

    /// Mask width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at (`x`, `y`) is opaque; out of range is transparent
    pub fn is_opaque(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.bits[index / 64] & (1 << (index % 64)) != 0
    }

    /// Number of opaque pixels
    pub fn opaque_count(&self) -> u32 {
        self.bits.iter().map(|word| word.count_ones()).sum()
    }
}

/// A mask placed in world space
#[derive(Debug, Clone, Copy)]
pub struct PlacedMask<'a> {
    /// Sprite mask
    pub mask: &'a PixelMask,

    /// World position of the mask's top-left pixel, rounded to whole pixels
    pub origin: (i32, i32),

    /// Mirror horizontally
    pub flip_x: bool,
}

impl<'a> PlacedMask<'a> {
    /// Place `mask` with its top-left corner at `position`
    pub fn at(mask: &'a PixelMask, position: Vec2, flip_x: bool) -> Self {
        Self {
            mask,
            origin: (position.x.round() as i32, position.y.round() as i32),
            flip_x,
        }
    }

    fn is_opaque_world(&self, x: i32, y: i32) -> bool {
        let local_x = x - self.origin.0;
        let local_y = y - self.origin.1;
        if local_x < 0 || local_y < 0 {
            return false;
        }
        let (local_x, local_y) = (local_x as u32, local_y as u32);
        if local_x >= self.mask.width() {
            return false;
        }
        let sample_x = if self.flip_x {
            self.mask.width() - 1 - local_x
        } else {
            local_x
        };
        self.mask.is_opaque(sample_x, local_y)
    }
}

/// Whether two placed masks share at least one opaque pixel
pub fn masks_overlap(a: PlacedMask<'_>, b: PlacedMask<'_>) -> bool {
    let left = a.origin.0.max(b.origin.0);
    let top = a.origin.1.max(b.origin.1);
    let right = (a.origin.0 + a.mask.width() as i32).min(b.origin.0 + b.mask.width() as i32);
    let bottom = (a.origin.1 + a.mask.height() as i32).min(b.origin.1 + b.mask.height() as i32);

    (top..bottom).any(|y| (left..right).any(|x| a.is_opaque_world(x, y) && b.is_opaque_world(x, y)))
}
