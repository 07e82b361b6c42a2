//! Sprite asset management
//!
//! Textures are stored by key. The simulation only needs their size and
//! opacity mask; pixel upload is left to the renderer.

use crate::physics::PixelMask;
use image::{imageops, RgbaImage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Alpha values at or below this count as transparent
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 0;

/// Asset errors
#[derive(Debug, Error)]
pub enum AssetError {
    /// No texture registered under this key
    #[error("Asset not found: {0}")]
    Missing(String),

    /// Image file could not be decoded
    #[error("Failed to load asset: {0}")]
    Load(String),

    /// Frames missing or of mismatched size
    #[error("Invalid frame layout: {0}")]
    Frames(String),
}

/// Sprite texture as seen by the simulation
///
/// A texture is a horizontal strip of equally sized animation frames, each
/// with its own opacity mask. Frame indices wrap around the strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    frames: Vec<PixelMask>,
}

impl Texture {
    /// Single-frame texture backed by an opacity mask
    pub fn from_mask(mask: PixelMask) -> Self {
        Self { frames: vec![mask] }
    }

    /// Texture from per-frame masks, which must all share one size
    pub fn from_frames(frames: Vec<PixelMask>) -> Result<Self, AssetError> {
        let Some(first) = frames.first() else {
            return Err(AssetError::Frames("texture has no frames".to_string()));
        };
        let (width, height) = (first.width(), first.height());
        if let Some(index) = frames
            .iter()
            .position(|frame| frame.width() != width || frame.height() != height)
        {
            return Err(AssetError::Frames(format!(
                "frame {} is not {}x{}",
                index, width, height
            )));
        }
        Ok(Self { frames })
    }

    /// Single-frame texture built from decoded RGBA pixels
    pub fn from_rgba(image: &RgbaImage) -> Self {
        Self::from_mask(PixelMask::from_rgba(image, DEFAULT_ALPHA_THRESHOLD))
    }

    /// Texture cut from a strip of `frame_width`-wide frames
    pub fn from_rgba_strip(image: &RgbaImage, frame_width: u32) -> Result<Self, AssetError> {
        if frame_width == 0 || image.width() % frame_width != 0 {
            return Err(AssetError::Frames(format!(
                "{} px strip does not divide into {} px frames",
                image.width(),
                frame_width
            )));
        }
        let frames = (0..image.width() / frame_width)
            .map(|index| {
                let frame = imageops::crop_imm(image, index * frame_width, 0, frame_width, image.height()).to_image();
                PixelMask::from_rgba(&frame, DEFAULT_ALPHA_THRESHOLD)
            })
            .collect();
        Self::from_frames(frames)
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.frames[0].width()
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.frames[0].height()
    }

    /// Number of animation frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Opacity of one animation frame
    pub fn frame_mask(&self, frame: u32) -> &PixelMask {
        &self.frames[frame as usize % self.frames.len()]
    }
}

/// Keyed texture store
#[derive(Debug, Default)]
pub struct AssetManager {
    textures: HashMap<String, Arc<Texture>>,
}

impl AssetManager {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture, replacing any previous one under `key`
    pub fn insert(&mut self, key: impl Into<String>, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        self.textures.insert(key.into(), Arc::clone(&texture));
        texture
    }

    /// Decode an image file and register it under `key` as one frame
    pub fn load_from_file<P: AsRef<Path>>(&mut self, key: &str, path: P) -> Result<Arc<Texture>, AssetError> {
        let rgba = decode(key, path.as_ref())?;
        Ok(self.insert(key, Texture::from_rgba(&rgba)))
    }

    /// Decode an animation strip and register it under `key`
    pub fn load_strip_from_file<P: AsRef<Path>>(
        &mut self,
        key: &str,
        path: P,
        frame_width: u32,
    ) -> Result<Arc<Texture>, AssetError> {
        let rgba = decode(key, path.as_ref())?;
        let texture = Texture::from_rgba_strip(&rgba, frame_width).map_err(|error| {
            log::error!("Texture '{}': {}", key, error);
            error
        })?;
        log::debug!("Texture '{}' has {} frames", key, texture.frame_count());
        Ok(self.insert(key, texture))
    }

    /// Look up a texture; a missing key is fatal for scene construction
    pub fn get(&self, key: &str) -> Result<Arc<Texture>, AssetError> {
        self.textures
            .get(key)
            .cloned()
            .ok_or_else(|| AssetError::Missing(key.to_string()))
    }

    /// Whether a texture is registered under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    /// Number of registered textures
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether no texture is registered
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

fn decode(key: &str, path: &Path) -> Result<RgbaImage, AssetError> {
    let image = image::open(path).map_err(|error| {
        log::error!("Failed to load texture '{}' from {:?}: {}", key, path, error);
        AssetError::Load(format!("{}: {}", path.display(), error))
    })?;
    let rgba = image.to_rgba8();
    log::debug!("Loaded texture '{}' {}x{} from {:?}", key, rgba.width(), rgba.height(), path);
    Ok(rgba)
}
