//! Entity behavior layer
//!
//! Every simulated object is one [`Actor`] variant. Actors never touch the
//! registry directly: an update reads the world through [`UpdateContext`] and
//! pushes [`Command`]s that the session applies right after the call.

mod bullet;
mod enemy;
mod fire_effect;
mod platform;
mod player;
mod status;

pub use bullet::Bullet;
pub use enemy::Enemy;
pub use fire_effect::FireEffect;
pub use platform::MovingPlatform;
pub use player::Player;
pub use status::{Facing, Pose, Status};

use crate::config::GameConfig;
use platformer_engine::foundation::collections::ObjectHandle;
use platformer_engine::foundation::math::{Rect, Vec2};
use platformer_engine::input::InputSource;
use platformer_engine::physics::{Obstacle, PlacedMask};
use platformer_engine::render::{Drawable, SpriteCommand};
use platformer_engine::scene::GameObject;
use platformer_engine::spatial::TileIndex;

/// Request to spawn a bullet and its muzzle flash
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    /// Muzzle position, where the bullet's center starts
    pub position: Vec2,

    /// Unit flight direction
    pub direction: Vec2,

    /// Whether the player fired it
    pub from_player: bool,
}

/// Side effect requested by an actor update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Spawn a bullet and muzzle flash owned by the updating actor
    Fire(ShotRequest),

    /// Kill the updating actor
    KillSelf,
}

/// What other actors may know about the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    /// Current hitbox
    pub hitbox: Rect,
}

/// What a muzzle flash needs to know about its shooter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnerView {
    /// Shooter hitbox
    pub hitbox: Rect,

    /// Whether the shooter is ducking
    pub ducking: bool,
}

/// Read-only world state for one actor update
pub struct UpdateContext<'a> {
    /// Step length in seconds
    pub delta_time: f32,

    /// Held actions
    pub input: &'a dyn InputSource,

    /// Static level geometry
    pub tiles: &'a TileIndex,

    /// Moving collision objects, snapshotted after the pre-update phase
    pub obstacles: &'a [Obstacle],

    /// Platform turnaround rectangles
    pub waypoints: &'a [Rect],

    /// Player state at the start of the step
    pub player: Option<PlayerView>,

    /// Shooter of the updating muzzle flash, if still alive
    pub owner: Option<OwnerView>,

    /// Tuning values
    pub config: &'a GameConfig,
}

/// Closed set of simulated objects
#[derive(Debug)]
pub enum Actor {
    /// Player character
    Player(Player),
    /// Stationary shooter
    Enemy(Enemy),
    /// Projectile
    Bullet(Bullet),
    /// Vertically moving platform
    Platform(MovingPlatform),
    /// Muzzle flash
    FireEffect(FireEffect),
}

impl Actor {
    /// Advance one step, pushing any side effects into `commands`
    pub fn update(&mut self, context: &UpdateContext<'_>, commands: &mut Vec<Command>) {
        match self {
            Self::Player(player) => player.update(context, commands),
            Self::Enemy(enemy) => enemy.update(context, commands),
            Self::Bullet(bullet) => bullet.update(context, commands),
            Self::Platform(platform) => platform.update(context),
            Self::FireEffect(effect) => effect.update(context, commands),
        }
    }

    /// Apply one damage point to entities with health
    pub fn damage(&mut self) -> bool {
        match self {
            Self::Player(player) => player.health_mut().damage(),
            Self::Enemy(enemy) => enemy.health_mut().damage(),
            _ => false,
        }
    }

    /// Sprite opacity placed at the actor's drawn position
    pub fn placed_mask(&self) -> PlacedMask<'_> {
        match self {
            Self::Player(player) => player.placed_mask(),
            Self::Enemy(enemy) => enemy.placed_mask(),
            Self::Bullet(bullet) => bullet.placed_mask(),
            Self::Platform(platform) => platform.placed_mask(),
            Self::FireEffect(effect) => effect.placed_mask(),
        }
    }

    /// Player state if this is the player
    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Mutable player state if this is the player
    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Shooter followed by a muzzle flash
    pub fn fire_effect_owner(&self) -> Option<ObjectHandle> {
        match self {
            Self::FireEffect(effect) => Some(effect.owner()),
            _ => None,
        }
    }

    /// Muzzle-flash view if this actor can shoot
    pub fn owner_view(&self) -> Option<OwnerView> {
        match self {
            Self::Player(player) => Some(OwnerView {
                hitbox: player.hitbox(),
                ducking: player.is_ducking(),
            }),
            Self::Enemy(enemy) => Some(OwnerView {
                hitbox: enemy.hitbox(),
                ducking: false,
            }),
            _ => None,
        }
    }
}

impl GameObject for Actor {
    fn global_bounds(&self) -> Rect {
        match self {
            Self::Player(player) => player.global_bounds(),
            Self::Enemy(enemy) => enemy.global_bounds(),
            Self::Bullet(bullet) => bullet.global_bounds(),
            Self::Platform(platform) => platform.global_bounds(),
            Self::FireEffect(effect) => effect.global_bounds(),
        }
    }

    fn hitbox(&self) -> Rect {
        match self {
            Self::Player(player) => player.hitbox(),
            Self::Enemy(enemy) => enemy.hitbox(),
            Self::Bullet(bullet) => bullet.hitbox(),
            Self::Platform(platform) => platform.hitbox(),
            Self::FireEffect(effect) => effect.hitbox(),
        }
    }

    fn previous_hitbox(&self) -> Rect {
        match self {
            Self::Player(player) => player.previous_hitbox(),
            Self::Enemy(enemy) => enemy.previous_hitbox(),
            Self::Bullet(bullet) => bullet.previous_hitbox(),
            Self::Platform(platform) => platform.previous_hitbox(),
            Self::FireEffect(effect) => effect.previous_hitbox(),
        }
    }

    fn velocity(&self) -> Vec2 {
        match self {
            Self::Player(player) => player.velocity(),
            Self::Platform(platform) => platform.velocity(),
            _ => Vec2::zeros(),
        }
    }

    fn depth(&self) -> u32 {
        match self {
            Self::Player(player) => player.depth(),
            Self::Enemy(enemy) => enemy.depth(),
            Self::Bullet(bullet) => bullet.depth(),
            Self::Platform(platform) => platform.depth(),
            Self::FireEffect(effect) => effect.depth(),
        }
    }
}

impl Drawable for Actor {
    fn sprite_command(&self) -> SpriteCommand {
        match self {
            Self::Player(player) => player.sprite_command(),
            Self::Enemy(enemy) => enemy.sprite_command(),
            Self::Bullet(bullet) => bullet.sprite_command(),
            Self::Platform(platform) => platform.sprite_command(),
            Self::FireEffect(effect) => effect.sprite_command(),
        }
    }
}
