//! Player character

use super::status::{character_animation, Facing, Pose, Status};
use super::{Command, ShotRequest, UpdateContext};
use crate::config::GameConfig;
use crate::sprites::Sprite;
use platformer_engine::foundation::math::{Rect, Vec2};
use platformer_engine::foundation::time::Cooldown;
use platformer_engine::input::Actions;
use platformer_engine::physics::{Health, KinematicBody, PlacedMask, PlatformerController};
use platformer_engine::render::{Animation, Color, SpriteCommand};

/// Tint while the invulnerability window runs
pub const HIT_TINT: Color = Color::rgb(255, 0, 0);

/// Player-controlled character
#[derive(Debug)]
pub struct Player {
    sprite: Sprite,
    body: KinematicBody,
    controller: PlatformerController,
    status: Status,
    ducking: bool,
    health: Health,
    fire_cooldown: Cooldown,
    animation: Animation,
    depth: u32,
}

impl Player {
    /// Player at rest with its sprite's top-left at `position`
    pub fn new(position: Vec2, sprite: Sprite, config: &GameConfig, depth: u32) -> Self {
        let hitbox = Rect::from_position_size(position, sprite.size());
        Self {
            sprite,
            body: KinematicBody::new(hitbox),
            controller: PlatformerController::new(config.physics.gravity),
            status: Status::default(),
            ducking: false,
            health: Health::new(config.player.health, config.world.invulnerability_ms),
            fire_cooldown: Cooldown::finished_millis(config.player.fire_cooldown_ms),
            animation: character_animation(),
            depth,
        }
    }

    /// Advance one step: input, status, movement, animation, timers
    pub fn update(&mut self, context: &UpdateContext<'_>, commands: &mut Vec<Command>) {
        self.body.begin_step();
        self.handle_input(context, commands);
        self.update_status();
        self.movement(context);

        self.animation.set_sequence(&self.status.to_string());
        self.animation.update(context.delta_time);
        self.fire_cooldown.update(context.delta_time);
        self.health.update(context.delta_time);
    }

    fn handle_input(&mut self, context: &UpdateContext<'_>, commands: &mut Vec<Command>) {
        let physics = &context.config.physics;
        let input = context.input;

        if input.is_pressed(Actions::RIGHT) {
            self.body.velocity.x = physics.walk_speed;
            self.status.facing = Facing::Right;
        } else if input.is_pressed(Actions::LEFT) {
            self.body.velocity.x = -physics.walk_speed;
            self.status.facing = Facing::Left;
        } else {
            self.body.velocity.x = 0.0;
        }

        if input.is_pressed(Actions::UP) {
            self.controller.try_jump(&mut self.body, physics.jump_speed);
        }

        self.ducking = input.is_pressed(Actions::DOWN) && self.controller.is_on_floor();

        if input.is_pressed(Actions::FIRE) && self.fire_cooldown.is_finished() {
            commands.push(Command::Fire(self.shot(context.config)));
            self.fire_cooldown.reset();
        }
    }

    fn shot(&self, config: &GameConfig) -> ShotRequest {
        let player = &config.player;
        let direction = Vec2::new(self.status.facing.sign(), 0.0);
        let height = if self.ducking {
            player.muzzle_height_ducking
        } else {
            player.muzzle_height
        };
        ShotRequest {
            position: self.body.hitbox.center() + direction * player.muzzle_offset + Vec2::new(0.0, height),
            direction,
            from_player: true,
        }
    }

    fn update_status(&mut self) {
        self.status.pose = Status::resolve_pose(
            self.controller.is_on_floor(),
            self.ducking,
            self.body.velocity.x != 0.0,
        );
    }

    fn movement(&mut self, context: &UpdateContext<'_>) {
        if self.ducking && self.controller.is_on_floor() {
            self.body.velocity.x = 0.0;
        }
        self.controller
            .step(&mut self.body, context.delta_time, context.tiles, context.obstacles);
    }

    /// Teleport back to `position` and stop all motion
    pub fn reset_position(&mut self, position: Vec2) {
        self.body = KinematicBody::new(Rect::from_position_size(position, self.sprite.size()));
        self.controller.reset();
        self.ducking = false;
    }

    /// Drawn position: the hitbox corner rounded to whole pixels
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.body.hitbox.left.round(), self.body.hitbox.top.round())
    }

    /// Current status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the player is crouching
    pub fn is_ducking(&self) -> bool {
        self.ducking
    }

    /// Whether the last step ended on a floor
    pub fn is_on_floor(&self) -> bool {
        self.controller.is_on_floor()
    }

    /// Hit points
    pub fn health(&self) -> &Health {
        &self.health
    }

    /// Mutable hit points
    pub fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }

    /// Sprite bounds at the drawn position
    pub fn global_bounds(&self) -> Rect {
        Rect::from_position_size(self.position(), self.sprite.size())
    }

    /// Collision rectangle
    pub fn hitbox(&self) -> Rect {
        self.body.hitbox
    }

    /// Collision rectangle at the start of the step
    pub fn previous_hitbox(&self) -> Rect {
        self.body.previous_hitbox
    }

    /// Velocity in px/s
    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    /// Render layer
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub(super) fn placed_mask(&self) -> PlacedMask<'_> {
        let mask = self.sprite.mask(self.animation.current_frame());
        PlacedMask::at(mask, self.position(), self.status.facing == Facing::Left)
    }

    pub(super) fn sprite_command(&self) -> SpriteCommand {
        SpriteCommand {
            texture: self.sprite.key(),
            position: self.position(),
            frame: self.animation.current_frame(),
            tint: if self.health.is_invulnerable() { HIT_TINT } else { Color::WHITE },
            flip_x: self.status.facing == Facing::Left,
            depth: self.depth,
        }
    }

    /// Pose shortcut for tests and HUDs
    pub fn pose(&self) -> Pose {
        self.status.pose
    }
}
