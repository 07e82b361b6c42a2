//! # Platformer Engine
//!
//! Simulation core for 2D side-scrolling action games.
//!
//! ## Features
//!
//! - **Object Registry**: Generational handles with deferred deallocation
//! - **Membership Groups**: Categorized object sets safe to mutate mid-pass
//! - **Tile Index**: Sparse grid queries over static level geometry
//! - **Platformer Collision**: Axis-separated resolution with moving platforms
//! - **Pixel Masks**: Per-pixel hit confirmation for projectiles
//!
//! ## Quick Start
//!
//! ```rust
//! use platformer_engine::prelude::*;
//!
//! let tiles = TileIndex::from_tiles(Vec2::new(32.0, 32.0), 2, [((0, 1), 1)]);
//! let mut body = KinematicBody::new(Rect::new(4.0, 2.0, 20.0, 30.0));
//! let mut controller = PlatformerController::new(2400.0);
//!
//! body.begin_step();
//! controller.step(&mut body, 1.0 / 60.0, &tiles, &[]);
//! assert!(controller.is_on_floor());
//! assert_eq!(body.hitbox.bottom(), 32.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod input;
pub mod level;
pub mod physics;
pub mod render;
pub mod scene;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, AssetManager, Texture},
        config::{Config, ConfigError},
        foundation::{
            collections::{GroupId, ObjectHandle},
            math::{Rect, Vec2},
            time::{Cooldown, FixedTimestep},
        },
        input::{Actions, InputSource, InputState},
        level::{LevelData, LevelError, LevelSource, MapObject},
        physics::{
            confirm_hit, hits_level, Health, KinematicBody, Obstacle, PixelMask, PlacedMask,
            PlatformerController, VerticalContacts,
        },
        render::{Animation, Color, Drawable, RenderTarget, SpriteCommand},
        scene::{GameObject, GroupCursor, MembershipGroup, ObjectRegistry, RegistryError},
        spatial::{TileIndex, TileView},
    };
}
