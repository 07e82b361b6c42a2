//! Draw contract between the simulation and a renderer
//!
//! The renderer is passive: it receives fully computed sprite commands and
//! tile-layer requests and owns no game state.

pub mod animation;

pub use animation::Animation;

use crate::foundation::math::{Rect, Vec2};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque white, i.e. no tint
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Everything needed to draw one sprite
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteCommand {
    /// Texture key
    pub texture: &'static str,

    /// World position of the sprite's top-left corner
    pub position: Vec2,

    /// Atlas frame index
    pub frame: u32,

    /// Color multiplier
    pub tint: Color,

    /// Mirror horizontally
    pub flip_x: bool,

    /// Layer the sprite is drawn after
    pub depth: u32,
}

/// Objects that produce a sprite command
pub trait Drawable {
    /// Sprite command for the current state
    fn sprite_command(&self) -> SpriteCommand;
}

/// Destination for a frame's draw calls
pub trait RenderTarget {
    /// Draw the visible part of a level tile layer
    fn draw_tile_layer(&mut self, layer: usize, visible: Rect);

    /// Draw one sprite
    fn draw_sprite(&mut self, command: &SpriteCommand);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// Tile layer by index
    TileLayer(usize),
    /// Sprite
    Sprite(SpriteCommand),
}

/// Render target that records calls, for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingTarget {
    /// Calls in submission order
    pub calls: Vec<DrawCall>,
}

impl RecordingTarget {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sprites drawn
    pub fn sprite_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Sprite(_)))
            .count()
    }

    /// Forget recorded calls
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderTarget for RecordingTarget {
    fn draw_tile_layer(&mut self, layer: usize, _visible: Rect) {
        self.calls.push(DrawCall::TileLayer(layer));
    }

    fn draw_sprite(&mut self, command: &SpriteCommand) {
        self.calls.push(DrawCall::Sprite(command.clone()));
    }
}
