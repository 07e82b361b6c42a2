//! # Game Session
//!
//! Owns the registry, the membership groups and the static level state for
//! one play-through, and runs the fixed phase order each step:
//!
//! 1. pre-update group (enemies, platforms)
//! 2. the player
//! 3. post-update group (bullets, muzzle flashes)
//! 4. bullet collision
//! 5. fall-out-of-level check
//! 6. registry synchronization
//!
//! Objects spawned while a phase runs are queued into their groups and only
//! show up in passes that start after the next synchronization, unless the
//! target group was empty.

use crate::config::GameConfig;
use crate::entities::{
    Actor, Bullet, Command, Enemy, FireEffect, MovingPlatform, OwnerView, Player, PlayerView, ShotRequest,
    UpdateContext,
};
use crate::sprites::{self, Sprite};
use platformer_engine::assets::{AssetError, AssetManager};
use platformer_engine::config::{Config, ConfigError};
use platformer_engine::foundation::collections::{GroupId, ObjectHandle};
use platformer_engine::foundation::math::{Rect, Vec2};
use platformer_engine::input::InputSource;
use platformer_engine::level::{LevelError, LevelSource};
use platformer_engine::physics::{confirm_hit, hits_level, Obstacle};
use platformer_engine::render::{Drawable, RenderTarget};
use platformer_engine::scene::{GameObject, ObjectRegistry, RegistryError};
use platformer_engine::spatial::TileIndex;
use thiserror::Error;

/// Tile layer holding collision geometry
pub const COLLISION_LAYER: &str = "Level";
/// Object layer with player and enemy spawns
pub const ENTITIES_LAYER: &str = "Entities";
/// Object layer with platforms and their waypoints
pub const PLATFORMS_LAYER: &str = "Platforms";

/// Render depth of each named tile layer
pub const LAYER_DEPTHS: [(&str, u32); 5] = [
    ("BG", 0),
    ("BG Detail", 1),
    ("Level", 2),
    ("FG Detail Bottom", 3),
    ("FG Detail Top", 4),
];

/// Depth shared by every entity
pub const ENTITY_DEPTH: u32 = 2;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Level layer or object problem
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    /// Missing or unreadable texture
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Registry invariant violation
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Configuration problem
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result of one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Keep playing
    Running,
    /// Player health reached zero
    GameOver,
}

/// Group ids used by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionGroups {
    /// Everything drawn, sorted by depth
    pub draw: GroupId,
    /// Updated before the player
    pub pre_update: GroupId,
    /// Updated after the player
    pub post_update: GroupId,
    /// Moving obstacles the player collides with
    pub collision_objects: GroupId,
    /// Targets of player bullets
    pub vulnerable: GroupId,
    /// All bullets
    pub bullets: GroupId,
    /// Bullets fired by the player
    pub player_bullets: GroupId,
    /// Bullets fired by enemies
    pub enemy_bullets: GroupId,
}

impl SessionGroups {
    fn create(registry: &mut ObjectRegistry<Actor>) -> Self {
        Self {
            draw: registry.create_group("draw"),
            pre_update: registry.create_group("pre_update"),
            post_update: registry.create_group("post_update"),
            collision_objects: registry.create_group("collision_objects"),
            vulnerable: registry.create_group("vulnerable"),
            bullets: registry.create_group("bullets"),
            player_bullets: registry.create_group("player_bullets"),
            enemy_bullets: registry.create_group("enemy_bullets"),
        }
    }
}

/// One play-through of a level
pub struct GameSession {
    config: GameConfig,
    level: Box<dyn LevelSource>,
    assets: AssetManager,
    registry: ObjectRegistry<Actor>,
    groups: SessionGroups,
    tiles: TileIndex,
    waypoints: Vec<Rect>,
    player: ObjectHandle,
    player_start: Vec2,
    commands: Vec<Command>,
    steps: u64,
}

impl GameSession {
    /// Build a session and populate it from `level`
    ///
    /// Invalid tuning, missing textures or malformed level layers abort
    /// construction.
    pub fn new(level: Box<dyn LevelSource>, assets: AssetManager, config: GameConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let mut registry = ObjectRegistry::new();
        let groups = SessionGroups::create(&mut registry);
        let tile_size = level.tile_size();

        let mut session = Self {
            config,
            level,
            assets,
            registry,
            groups,
            tiles: TileIndex::empty(tile_size),
            waypoints: Vec::new(),
            player: ObjectHandle::default(),
            player_start: Vec2::zeros(),
            commands: Vec::new(),
            steps: 0,
        };
        session.populate_scene().map_err(|error| {
            log::error!("Failed to populate scene: {}", error);
            error
        })?;
        Ok(session)
    }

    /// Create every object described by the level
    pub fn populate_scene(&mut self) -> Result<(), SessionError> {
        self.tiles = self.level.build_tile_index(COLLISION_LAYER, ENTITY_DEPTH)?;
        self.waypoints.clear();

        let entities = self.level.tile_object_data(ENTITIES_LAYER)?.to_vec();
        let mut player = None;
        for object in entities.iter().filter(|object| object.name == "Player") {
            let sprite = Sprite::load(&self.assets, sprites::PLAYER)?;
            let handle = self.registry.create(Actor::Player(Player::new(
                object.position(),
                sprite,
                &self.config,
                ENTITY_DEPTH,
            )));
            self.registry.add_to_group(handle, self.groups.draw)?;
            self.player_start = object.position();
            player = Some(handle);
        }
        self.player = player.ok_or_else(|| LevelError::MissingObject {
            layer: ENTITIES_LAYER.to_string(),
            name: "Player".to_string(),
        })?;

        for object in &entities {
            match object.name.as_str() {
                "Player" => {}
                "Enemy" => {
                    let sprite = Sprite::load(&self.assets, sprites::ENEMY)?;
                    let enemy = Enemy::spawn(object.position(), sprite, &self.tiles, &self.config, ENTITY_DEPTH);
                    let handle = self.registry.create(Actor::Enemy(enemy));
                    self.registry.add_to_group(handle, self.groups.draw)?;
                    self.registry.add_to_group(handle, self.groups.vulnerable)?;
                    self.registry.add_to_group(handle, self.groups.pre_update)?;
                }
                other => log::warn!("Ignoring unknown entity '{}'", other),
            }
        }

        let platforms = self.level.tile_object_data(PLATFORMS_LAYER)?.to_vec();
        for object in &platforms {
            match object.name.as_str() {
                "Platform" => {
                    let sprite = Sprite::load(&self.assets, sprites::PLATFORM)?;
                    // Tile objects are anchored at their bottom-left corner
                    let position = object.position() - Vec2::new(0.0, sprite.size().y);
                    let platform = MovingPlatform::new(position, sprite, &self.config.platform, ENTITY_DEPTH);
                    let handle = self.registry.create(Actor::Platform(platform));
                    self.registry.add_to_group(handle, self.groups.draw)?;
                    self.registry.add_to_group(handle, self.groups.collision_objects)?;
                    self.registry.add_to_group(handle, self.groups.pre_update)?;
                }
                "Border" => self.waypoints.push(object.bounds()),
                other => log::warn!("Ignoring unknown platform object '{}'", other),
            }
        }

        self.registry.synchronize_all();
        self.sort_draw_group()?;
        log::info!(
            "Scene populated: {} objects, {} tiles, {} waypoints",
            self.registry.len(),
            self.tiles.len(),
            self.waypoints.len()
        );
        Ok(())
    }

    /// Destroy every object and repopulate from the level
    pub fn reset_scene(&mut self) -> Result<(), SessionError> {
        log::info!("Resetting scene");
        self.registry.destroy_all();
        self.populate_scene()
    }

    /// Run one fixed step
    pub fn step(&mut self, delta_time: f32, input: &dyn InputSource) -> Result<StepOutcome, SessionError> {
        let player_view = self.player_view();

        self.run_phase(self.groups.pre_update, delta_time, input, &[], player_view)?;

        let obstacles = self.collect_obstacles();
        self.update_actor(self.player, delta_time, input, &obstacles, player_view)?;

        self.run_phase(self.groups.post_update, delta_time, input, &obstacles, player_view)?;

        self.bullet_collision(&obstacles)?;
        self.check_fall()?;

        let stats = self.registry.synchronize_all();
        if stats.deferred > 0 {
            log::debug!("{} killed objects still referenced after sync", stats.deferred);
        }
        self.sort_draw_group()?;
        self.steps += 1;

        let depleted = self
            .player()
            .map_or(true, |player| player.health().is_depleted());
        if depleted {
            log::info!("Game over after {} steps", self.steps);
            Ok(StepOutcome::GameOver)
        } else {
            Ok(StepOutcome::Running)
        }
    }

    fn run_phase(
        &mut self,
        group: GroupId,
        delta_time: f32,
        input: &dyn InputSource,
        obstacles: &[Obstacle],
        player_view: Option<PlayerView>,
    ) -> Result<(), SessionError> {
        let mut cursor = self.registry.group_cursor(group)?;
        while let Some(handle) = self.registry.next_in_group(group, &mut cursor) {
            self.update_actor(handle, delta_time, input, obstacles, player_view)?;
        }
        Ok(())
    }

    fn update_actor(
        &mut self,
        handle: ObjectHandle,
        delta_time: f32,
        input: &dyn InputSource,
        obstacles: &[Obstacle],
        player_view: Option<PlayerView>,
    ) -> Result<(), SessionError> {
        let owner = self.owner_view_of(handle);
        let context = UpdateContext {
            delta_time,
            input,
            tiles: &self.tiles,
            obstacles,
            waypoints: &self.waypoints,
            player: player_view,
            owner,
            config: &self.config,
        };

        let mut commands = std::mem::take(&mut self.commands);
        commands.clear();
        if let Some(actor) = self.registry.get_mut(handle) {
            actor.update(&context, &mut commands);
        }

        for command in commands.drain(..) {
            match command {
                Command::Fire(shot) => {
                    self.fire_bullet(handle, shot)?;
                }
                Command::KillSelf => {
                    self.registry.kill(handle)?;
                }
            }
        }
        self.commands = commands;
        Ok(())
    }

    fn owner_view_of(&self, handle: ObjectHandle) -> Option<OwnerView> {
        let owner = self.registry.get(handle)?.fire_effect_owner()?;
        if !self.registry.is_alive(owner) {
            return None;
        }
        self.registry.get(owner)?.owner_view()
    }

    fn player_view(&self) -> Option<PlayerView> {
        self.registry
            .get(self.player)
            .map(|player| PlayerView { hitbox: player.hitbox() })
    }

    fn collect_obstacles(&self) -> Vec<Obstacle> {
        self.registry
            .iter_group(self.groups.collision_objects)
            .map(|(handle, object)| Obstacle::from_object(handle, object))
            .collect()
    }

    /// Spawn a bullet and its muzzle flash for `owner`
    pub fn fire_bullet(&mut self, owner: ObjectHandle, shot: ShotRequest) -> Result<ObjectHandle, SessionError> {
        let groups = self.groups;
        let bullet = Bullet::new(
            &shot,
            Sprite::load(&self.assets, sprites::BULLET)?,
            &self.config.bullet,
            ENTITY_DEPTH,
        );
        let tint = bullet.tint();
        let handle = self.registry.create(Actor::Bullet(bullet));
        self.registry.add_to_group(handle, groups.draw)?;
        self.registry.add_to_group(handle, groups.post_update)?;
        self.registry.add_to_group(handle, groups.bullets)?;
        let side = if shot.from_player {
            groups.player_bullets
        } else {
            groups.enemy_bullets
        };
        self.registry.add_to_group(handle, side)?;

        if let Some(view) = self.registry.get(owner).and_then(Actor::owner_view) {
            let effect = FireEffect::new(
                owner,
                view,
                shot.direction,
                tint,
                Sprite::load(&self.assets, sprites::FIRE)?,
                &self.config.player,
                ENTITY_DEPTH,
            );
            let effect = self.registry.create(Actor::FireEffect(effect));
            self.registry.add_to_group(effect, groups.draw)?;
            self.registry.add_to_group(effect, groups.post_update)?;
        }
        log::trace!("Bullet {:?} fired by {:?}", handle, owner);
        Ok(handle)
    }

    /// Resolve bullets against level, obstacles, enemies and the player
    fn bullet_collision(&mut self, obstacles: &[Obstacle]) -> Result<(), SessionError> {
        let groups = self.groups;

        let spent: Vec<ObjectHandle> = self
            .registry
            .iter_group(groups.bullets)
            .filter(|(_, bullet)| hits_level(bullet.hitbox(), &self.tiles, obstacles))
            .map(|(handle, _)| handle)
            .collect();
        for handle in spent {
            self.registry.kill(handle)?;
        }

        let mut enemy_hits = Vec::new();
        for (bullet_handle, bullet) in self.registry.iter_group(groups.player_bullets) {
            for (target_handle, target) in self.registry.iter_group(groups.vulnerable) {
                if confirm_hit(bullet.hitbox(), bullet.placed_mask(), target.hitbox(), target.placed_mask()) {
                    enemy_hits.push((bullet_handle, target_handle));
                }
            }
        }
        for (bullet, target) in enemy_hits {
            self.registry.kill(bullet)?;
            if let Some(target) = self.registry.get_mut(target) {
                target.damage();
            }
        }

        let player_hit = self.registry.get(self.player).and_then(|player| {
            self.registry
                .iter_group(groups.enemy_bullets)
                .find(|(_, bullet)| {
                    confirm_hit(bullet.hitbox(), bullet.placed_mask(), player.hitbox(), player.placed_mask())
                })
                .map(|(handle, _)| handle)
        });
        if let Some(bullet) = player_hit {
            self.registry.kill(bullet)?;
            if let Some(player) = self.registry.get_mut(self.player) {
                player.damage();
            }
        }
        Ok(())
    }

    fn check_fall(&mut self) -> Result<(), SessionError> {
        let limit = self.config.world.max_level_height;
        let start = self.player_start;
        let player = self
            .registry
            .get_mut(self.player)
            .and_then(Actor::as_player_mut)
            .ok_or(RegistryError::StaleHandle(self.player))?;

        if player.position().y > limit {
            log::debug!("Player fell out of the level");
            player.reset_position(start);
            player.health_mut().damage();
        }
        Ok(())
    }

    fn sort_draw_group(&mut self) -> Result<(), SessionError> {
        self.registry
            .sort_group(self.groups.draw, |a, b| a.depth().cmp(&b.depth()))?;
        Ok(())
    }

    /// Draw each level layer followed by the objects on that layer
    pub fn render(&self, target: &mut dyn RenderTarget, visible: Rect) {
        for index in 0..self.level.layer_count() {
            target.draw_tile_layer(index, visible);
            for (_, object) in self.registry.iter_group(self.groups.draw) {
                if object.depth() as usize == index {
                    target.draw_sprite(&object.sprite_command());
                }
            }
        }
    }

    /// Player state
    pub fn player(&self) -> Option<&Player> {
        self.registry.get(self.player).and_then(Actor::as_player)
    }

    /// Mutable player state
    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.registry.get_mut(self.player).and_then(Actor::as_player_mut)
    }

    /// Player handle
    pub fn player_handle(&self) -> ObjectHandle {
        self.player
    }

    /// Player spawn position
    pub fn player_start(&self) -> Vec2 {
        self.player_start
    }

    /// Object registry
    pub fn registry(&self) -> &ObjectRegistry<Actor> {
        &self.registry
    }

    /// Group ids
    pub fn groups(&self) -> SessionGroups {
        self.groups
    }

    /// Static collision geometry
    pub fn tiles(&self) -> &TileIndex {
        &self.tiles
    }

    /// Platform waypoints
    pub fn waypoints(&self) -> &[Rect] {
        &self.waypoints
    }

    /// Tuning values
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Steps simulated since construction
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
