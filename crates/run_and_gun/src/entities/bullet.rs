//! Projectile

use super::{Command, ShotRequest, UpdateContext};
use crate::config::BulletConfig;
use crate::sprites::Sprite;
use platformer_engine::foundation::math::{Rect, Vec2};
use platformer_engine::physics::PlacedMask;
use platformer_engine::render::{Color, SpriteCommand};

/// Tint of bullets fired by the player
pub const PLAYER_BULLET_TINT: Color = Color::rgb(128, 0, 255);

/// Straight-flying bullet, centered on its position
#[derive(Debug)]
pub struct Bullet {
    sprite: Sprite,
    center: Vec2,
    direction: Vec2,
    speed: f32,
    age: f32,
    lifetime: f32,
    tint: Color,
    depth: u32,
}

impl Bullet {
    /// Bullet for a shot request
    pub fn new(shot: &ShotRequest, sprite: Sprite, config: &BulletConfig, depth: u32) -> Self {
        Self {
            sprite,
            center: shot.position,
            direction: shot.direction,
            speed: config.speed,
            age: 0.0,
            lifetime: config.lifetime,
            tint: if shot.from_player { PLAYER_BULLET_TINT } else { Color::WHITE },
            depth,
        }
    }

    /// Fly and expire after the configured lifetime
    pub fn update(&mut self, context: &UpdateContext<'_>, commands: &mut Vec<Command>) {
        self.center += self.direction * self.speed * context.delta_time;
        self.age += context.delta_time;
        if self.age > self.lifetime {
            commands.push(Command::KillSelf);
        }
    }

    /// Tint color
    pub fn tint(&self) -> Color {
        self.tint
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

    /// Collision rectangle
    pub fn hitbox(&self) -> Rect {
        self.global_bounds()
    }

    /// Bullets have no swept collision
    pub fn previous_hitbox(&self) -> Rect {
        self.global_bounds()
    }

    /// Render layer
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub(super) fn placed_mask(&self) -> PlacedMask<'_> {
        PlacedMask::at(self.sprite.mask(0), self.global_bounds().position(), false)
    }

    pub(super) fn sprite_command(&self) -> SpriteCommand {
        SpriteCommand {
            texture: self.sprite.key(),
            position: self.global_bounds().position(),
            frame: 0,
            tint: self.tint,
            flip_x: false,
            depth: self.depth,
        }
    }
}
