//! Sprite keys and built-in placeholder art
//!
//! The headless build has no image files, so every sprite also has a
//! procedural silhouette. Real textures loaded under the same keys replace
//! them.

use platformer_engine::assets::{AssetError, AssetManager, Texture};
use platformer_engine::foundation::math::Vec2;
use platformer_engine::physics::PixelMask;
use std::sync::Arc;

/// Player texture key
pub const PLAYER: &str = "player";
/// Enemy texture key
pub const ENEMY: &str = "enemy";
/// Bullet texture key
pub const BULLET: &str = "bullet";
/// Muzzle flash texture key
pub const FIRE: &str = "fire";
/// Moving platform texture key
pub const PLATFORM: &str = "platform";

/// Texture handle bundled with its key
#[derive(Debug, Clone)]
pub struct Sprite {
    key: &'static str,
    texture: Arc<Texture>,
}

impl Sprite {
    /// Fetch the texture registered under `key`
    pub fn load(assets: &AssetManager, key: &'static str) -> Result<Self, AssetError> {
        Ok(Self {
            key,
            texture: assets.get(key)?,
        })
    }

    /// Texture key
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Size in world units
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.texture.width() as f32, self.texture.height() as f32)
    }

    /// Opacity mask of one animation frame
    pub fn mask(&self, frame: u32) -> &PixelMask {
        self.texture.frame_mask(frame)
    }
}

/// Rounded-rectangle silhouette
fn capsule(width: u32, height: u32, radius: u32) -> PixelMask {
    PixelMask::from_fn(width, height, |x, y| {
        let cx = x.clamp(radius, width.saturating_sub(radius + 1));
        let cy = y.clamp(radius, height.saturating_sub(radius + 1));
        let dx = x.abs_diff(cx);
        let dy = y.abs_diff(cy);
        dx * dx + dy * dy <= radius * radius
    })
}

/// Capsule squashed into the bottom `crouch_height` rows
fn crouched(width: u32, height: u32, crouch_height: u32, radius: u32) -> PixelMask {
    let top = height.saturating_sub(crouch_height);
    let body = capsule(width, crouch_height, radius);
    PixelMask::from_fn(width, height, |x, y| y >= top && body.is_opaque(x, y - top))
}

/// Diamond silhouette of the given radius centered in a `size` square
fn diamond(size: u32, radius: u32) -> PixelMask {
    let half = size / 2;
    PixelMask::from_fn(size, size, |x, y| x.abs_diff(half) + y.abs_diff(half) <= radius)
}

/// Character strip: idle, two walk frames, jump, duck
fn character_frames() -> Vec<PixelMask> {
    let standing = capsule(40, 64, 12);
    vec![
        standing.clone(),
        standing.clone(),
        standing.clone(),
        standing,
        crouched(40, 64, 40, 12),
    ]
}

/// Register placeholder silhouettes for every key not already present
pub fn register_placeholders(assets: &mut AssetManager) {
    let placeholders = [
        (PLAYER, character_frames()),
        (ENEMY, character_frames()),
        (BULLET, vec![capsule(16, 6, 2)]),
        (FIRE, vec![diamond(24, 12), diamond(24, 8)]),
        (PLATFORM, vec![PixelMask::solid(96, 16)]),
    ];
    for (key, frames) in placeholders {
        if assets.contains(key) {
            continue;
        }
        match Texture::from_frames(frames) {
            Ok(texture) => {
                assets.insert(key, texture);
            }
            Err(error) => log::error!("Placeholder '{}': {}", key, error),
        }
    }
    log::debug!("Sprite placeholders registered ({} textures)", assets.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capsule_corners_are_transparent() {
        let mask = capsule(40, 64, 12);
        assert!(!mask.is_opaque(0, 0));
        assert!(!mask.is_opaque(39, 63));
        assert!(mask.is_opaque(20, 32));
        assert!(mask.is_opaque(0, 32));
    }

    #[test]
    fn test_duck_frame_is_shorter() {
        let mut assets = AssetManager::new();
        register_placeholders(&mut assets);
        let player = Sprite::load(&assets, PLAYER).expect("player");

        assert!(player.mask(0).is_opaque(20, 10));
        assert!(!player.mask(4).is_opaque(20, 10));
        assert!(player.mask(4).is_opaque(20, 50));
        assert_eq!(player.mask(4).width(), player.mask(0).width());
    }

    #[test]
    fn test_placeholders_do_not_replace_loaded_textures() {
        let mut assets = AssetManager::new();
        assets.insert(PLAYER, Texture::from_mask(PixelMask::solid(8, 8)));
        register_placeholders(&mut assets);

        let player = Sprite::load(&assets, PLAYER).expect("player");
        assert_eq!(player.size(), Vec2::new(8.0, 8.0));
        assert_eq!(Sprite::load(&assets, PLATFORM).expect("platform").size(), Vec2::new(96.0, 16.0));
    }
}
