//! Muzzle flash that follows its shooter

use super::{Command, OwnerView, UpdateContext};
use crate::config::PlayerConfig;
use crate::sprites::Sprite;
use platformer_engine::foundation::collections::ObjectHandle;
use platformer_engine::foundation::math::{Rect, Vec2};
use platformer_engine::physics::PlacedMask;
use platformer_engine::render::{Animation, Color, SpriteCommand};

const SEQUENCE: &str = "fire";
const FRAMES_PER_SECOND: f32 = 15.0;

/// One-shot two-frame flash, centered at the muzzle
#[derive(Debug)]
pub struct FireEffect {
    sprite: Sprite,
    owner: ObjectHandle,
    direction: Vec2,
    center: Vec2,
    tint: Color,
    animation: Animation,
    depth: u32,
}

impl FireEffect {
    /// Flash at the muzzle of `owner`
    pub fn new(
        owner: ObjectHandle,
        view: OwnerView,
        direction: Vec2,
        tint: Color,
        sprite: Sprite,
        config: &PlayerConfig,
        depth: u32,
    ) -> Self {
        Self {
            sprite,
            owner,
            direction,
            center: Self::muzzle(view, direction, config),
            tint,
            animation: Animation::new(FRAMES_PER_SECOND).with_sequence(SEQUENCE, vec![0, 1]),
            depth,
        }
    }

    fn muzzle(view: OwnerView, direction: Vec2, config: &PlayerConfig) -> Vec2 {
        let x = if direction.x > 0.0 {
            config.muzzle_offset
        } else {
            -config.muzzle_offset
        };
        let y = if view.ducking {
            config.muzzle_height_ducking
        } else {
            config.muzzle_height
        };
        view.hitbox.center() + Vec2::new(x, y)
    }

    /// Play once, following the owner; die with the owner
    pub fn update(&mut self, context: &UpdateContext<'_>, commands: &mut Vec<Command>) {
        let Some(owner) = context.owner else {
            commands.push(Command::KillSelf);
            return;
        };
        if self.animation.update(context.delta_time) {
            commands.push(Command::KillSelf);
        } else {
            self.center = Self::muzzle(owner, self.direction, &context.config.player);
        }
    }

    /// Shooter handle
    pub fn owner(&self) -> ObjectHandle {
        self.owner
    }

    /// Center position
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Sprite bounds around the center
    pub fn global_bounds(&self) -> Rect {
        let size = self.sprite.size();
        Rect::from_position_size(self.center - size / 2.0, size)
    }

    /// Flashes do not collide; the hitbox is the sprite bounds
    pub fn hitbox(&self) -> Rect {
        self.global_bounds()
    }

    /// Same as the hitbox
    pub fn previous_hitbox(&self) -> Rect {
        self.global_bounds()
    }

    /// Render layer
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub(super) fn placed_mask(&self) -> PlacedMask<'_> {
        let mask = self.sprite.mask(self.animation.current_frame());
        PlacedMask::at(mask, self.global_bounds().position(), self.direction.x < 0.0)
    }

    pub(super) fn sprite_command(&self) -> SpriteCommand {
        SpriteCommand {
            texture: self.sprite.key(),
            position: self.global_bounds().position(),
            frame: self.animation.current_frame(),
            tint: self.tint,
            flip_x: self.direction.x < 0.0,
            depth: self.depth,
        }
    }
}
