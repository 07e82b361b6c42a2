//! Stationary enemy that shoots at the player

use super::player::HIT_TINT;
use super::status::{character_animation, Facing, Status};
use super::{Command, PlayerView, ShotRequest, UpdateContext};
use crate::config::{EnemyConfig, GameConfig};
use crate::sprites::Sprite;
use platformer_engine::foundation::math::{Rect, Vec2};
use platformer_engine::foundation::time::Cooldown;
use platformer_engine::physics::{Health, PlacedMask};
use platformer_engine::render::{Animation, Color, SpriteCommand};
use platformer_engine::spatial::TileIndex;

/// Enemy turret
#[derive(Debug)]
pub struct Enemy {
    sprite: Sprite,
    hitbox: Rect,
    previous_hitbox: Rect,
    status: Status,
    health: Health,
    fire_cooldown: Cooldown,
    animation: Animation,
    depth: u32,
}

impl Enemy {
    /// Spawn at `position`, standing on the lowest overlapped tile row
    pub fn spawn(position: Vec2, sprite: Sprite, tiles: &TileIndex, config: &GameConfig, depth: u32) -> Self {
        let mut hitbox = Rect::from_position_size(position, sprite.size());
        // Query order is row-major, so the last tile sits in the lowest row
        if let Some(ground) = tiles.query_region(hitbox).last() {
            hitbox.set_bottom(ground.bounds.top);
        }
        hitbox.set_position(Vec2::new(hitbox.left.round(), hitbox.top.round()));

        Self {
            sprite,
            hitbox,
            previous_hitbox: hitbox,
            status: Status::default(),
            health: Health::new(config.enemy.health, config.world.invulnerability_ms),
            fire_cooldown: Cooldown::finished_millis(config.enemy.fire_cooldown_ms),
            animation: character_animation(),
            depth,
        }
    }

    /// Advance one step: face the player, animate, tick timers, maybe fire, maybe die
    pub fn update(&mut self, context: &UpdateContext<'_>, commands: &mut Vec<Command>) {
        self.previous_hitbox = self.hitbox;

        if let Some(player) = context.player {
            self.status.facing = Facing::toward(self.hitbox.center_x(), player.hitbox.center_x());
        }
        self.animation.set_sequence(&self.status.to_string());
        self.animation.update(context.delta_time);
        self.fire_cooldown.update(context.delta_time);
        self.health.update(context.delta_time);

        if let Some(player) = context.player {
            if self.should_fire(&player, &context.config.enemy) {
                commands.push(Command::Fire(self.shot(&context.config.enemy)));
                self.fire_cooldown.reset();
            }
        }

        if self.health.is_depleted() {
            commands.push(Command::KillSelf);
        }
    }

    fn should_fire(&self, player: &PlayerView, config: &EnemyConfig) -> bool {
        let distance = (self.hitbox.center() - player.hitbox.center()).norm();
        let player_y = player.hitbox.center_y();
        let level_with_player = self.hitbox.top - config.vertical_tolerance < player_y
            && player_y < self.hitbox.bottom() + config.vertical_tolerance;

        distance < config.fire_range && self.fire_cooldown.is_finished() && level_with_player
    }

    fn shot(&self, config: &EnemyConfig) -> ShotRequest {
        let direction = Vec2::new(self.status.facing.sign(), 0.0);
        ShotRequest {
            position: self.hitbox.center() + direction * config.muzzle_offset + Vec2::new(0.0, config.muzzle_height),
            direction,
            from_player: false,
        }
    }

    /// Current facing
    pub fn facing(&self) -> Facing {
        self.status.facing
    }

    /// Hit points
    pub fn health(&self) -> &Health {
        &self.health
    }

    /// Mutable hit points
    pub fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }

    /// Sprite bounds
    pub fn global_bounds(&self) -> Rect {
        self.hitbox
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

    pub(super) fn placed_mask(&self) -> PlacedMask<'_> {
        let mask = self.sprite.mask(self.animation.current_frame());
        PlacedMask::at(mask, self.hitbox.position(), self.status.facing == Facing::Left)
    }

    pub(super) fn sprite_command(&self) -> SpriteCommand {
        SpriteCommand {
            texture: self.sprite.key(),
            position: self.hitbox.position(),
            frame: self.animation.current_frame(),
            tint: if self.health.is_invulnerable() { HIT_TINT } else { Color::WHITE },
            flip_x: self.status.facing == Facing::Left,
            depth: self.depth,
        }
    }
}
