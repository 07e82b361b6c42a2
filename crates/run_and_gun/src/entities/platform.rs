//! Vertically moving platform

use super::UpdateContext;
use crate::config::PlatformConfig;
use crate::sprites::Sprite;
use platformer_engine::foundation::math::{Rect, Vec2};
use platformer_engine::physics::PlacedMask;
use platformer_engine::render::{Color, SpriteCommand};

/// Platform bouncing between border waypoints
#[derive(Debug)]
pub struct MovingPlatform {
    sprite: Sprite,
    hitbox: Rect,
    previous_hitbox: Rect,
    direction: Vec2,
    speed: f32,
    depth: u32,
}

impl MovingPlatform {
    /// Platform with its top-left at `position`, initially moving up
    pub fn new(position: Vec2, sprite: Sprite, config: &PlatformConfig, depth: u32) -> Self {
        let hitbox = Rect::from_position_size(position, sprite.size());
        Self {
            sprite,
            hitbox,
            previous_hitbox: hitbox,
            direction: Vec2::new(0.0, -1.0),
            speed: config.speed,
            depth,
        }
    }

    /// Move, then clamp and reverse on the first waypoint touched
    pub fn update(&mut self, context: &UpdateContext<'_>) {
        self.previous_hitbox = self.hitbox;
        self.hitbox.move_top(self.direction.y * self.speed * context.delta_time);

        if let Some(waypoint) = context
            .waypoints
            .iter()
            .find(|waypoint| waypoint.intersects(&self.hitbox))
        {
            if self.is_moving_down() {
                self.hitbox.set_bottom(waypoint.top);
            } else {
                self.hitbox.set_top(waypoint.bottom());
            }
            self.direction.y = -self.direction.y;
            log::trace!("Platform reversed at {:?}", waypoint);
        }
    }

    fn is_moving_down(&self) -> bool {
        self.direction.y > 0.0
    }

    /// Velocity in px/s
    pub fn velocity(&self) -> Vec2 {
        self.direction * self.speed
    }

    /// Sprite bounds at the rounded position
    pub fn global_bounds(&self) -> Rect {
        Rect::from_position_size(self.position(), self.sprite.size())
    }

    /// Collision rectangle
    pub fn hitbox(&self) -> Rect {
        self.hitbox
    }

    /// Collision rectangle at the start of the step
    pub fn previous_hitbox(&self) -> Rect {
        self.previous_hitbox
    }

    /// Render layer
    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn position(&self) -> Vec2 {
        Vec2::new(self.hitbox.left.round(), self.hitbox.top.round())
    }

    pub(super) fn placed_mask(&self) -> PlacedMask<'_> {
        PlacedMask::at(self.sprite.mask(0), self.position(), false)
    }

    pub(super) fn sprite_command(&self) -> SpriteCommand {
        SpriteCommand {
            texture: self.sprite.key(),
            position: self.position(),
            frame: 0,
            tint: Color::WHITE,
            flip_x: false,
            depth: self.depth,
        }
    }
}
