//! Collision resolution, hit testing and damage
//!
//! - [`collision`]: two-pass platformer resolver against tiles and moving obstacles
//! - [`pixel_mask`]: packed per-pixel opacity and overlap tests
//! - [`projectile`]: bullet hit rules
//! - [`health`]: hit points with invulnerability

pub mod collision;
pub mod health;
pub mod pixel_mask;
pub mod projectile;

pub use collision::{
    resolve_horizontal, resolve_vertical, Contact, KinematicBody, Obstacle, PlatformerController,
    VerticalContacts,
};
pub use health::Health;
pub use pixel_mask::{masks_overlap, PixelMask, PlacedMask};
pub use projectile::{confirm_hit, hits_level};
