//! Game configuration
//!
//! Every section falls back to its defaults, so a config file only needs the
//! values it changes.

use platformer_engine::config::{require_finite, require_positive, Config, ConfigError};
use serde::{Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Movement physics
    pub physics: PhysicsConfig,

    /// Player tuning
    pub player: PlayerConfig,

    /// Enemy tuning
    pub enemy: EnemyConfig,

    /// Projectile tuning
    pub bullet: BulletConfig,

    /// Moving platform tuning
    pub platform: PlatformConfig,

    /// World rules and simulation rate
    pub world: WorldConfig,
}

impl Config for GameConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("physics.walk_speed", self.physics.walk_speed)?;
        require_positive("physics.jump_speed", self.physics.jump_speed)?;
        require_positive("physics.gravity", self.physics.gravity)?;
        require_finite("player.muzzle_offset", self.player.muzzle_offset)?;
        require_finite("player.muzzle_height", self.player.muzzle_height)?;
        require_finite("player.muzzle_height_ducking", self.player.muzzle_height_ducking)?;
        require_finite("enemy.muzzle_offset", self.enemy.muzzle_offset)?;
        require_finite("enemy.muzzle_height", self.enemy.muzzle_height)?;
        require_finite("enemy.fire_range", self.enemy.fire_range)?;
        require_finite("enemy.vertical_tolerance", self.enemy.vertical_tolerance)?;
        require_positive("bullet.speed", self.bullet.speed)?;
        require_positive("bullet.lifetime", self.bullet.lifetime)?;
        require_positive("platform.speed", self.platform.speed)?;
        require_positive("world.max_level_height", self.world.max_level_height)?;
        require_positive("world.timestep", self.world.timestep)
    }
}

/// Movement physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Horizontal walking speed (px/s)
    pub walk_speed: f32,

    /// Initial upward jump speed (px/s)
    pub jump_speed: f32,

    /// Downward acceleration (px/s²)
    pub gravity: f32,
}

/// Player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting hit points
    pub health: u32,

    /// Minimum time between shots
    pub fire_cooldown_ms: u64,

    /// Horizontal distance from hitbox center to muzzle
    pub muzzle_offset: f32,

    /// Vertical muzzle offset while standing
    pub muzzle_height: f32,

    /// Vertical muzzle offset while ducking
    pub muzzle_height_ducking: f32,
}

/// Enemy tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Starting hit points
    pub health: u32,

    /// Minimum time between shots
    pub fire_cooldown_ms: u64,

    /// Horizontal distance from hitbox center to muzzle
    pub muzzle_offset: f32,

    /// Vertical muzzle offset
    pub muzzle_height: f32,

    /// Maximum distance to the player for firing
    pub fire_range: f32,

    /// Slack around the enemy's hitbox for the player's center height
    pub vertical_tolerance: f32,
}

/// Projectile tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    /// Flight speed (px/s)
    pub speed: f32,

    /// Seconds before a bullet expires
    pub lifetime: f32,
}

/// Moving platform tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Vertical speed (px/s)
    pub speed: f32,
}

/// World rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Falling below this y sends the player back to the start
    pub max_level_height: f32,

    /// Fixed simulation step in seconds
    pub timestep: f32,

    /// Hit immunity after taking damage
    pub invulnerability_ms: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            walk_speed: 400.0,
            jump_speed: 1200.0,
            gravity: 2400.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            health: 10,
            fire_cooldown_ms: 200,
            muzzle_offset: 60.0,
            muzzle_height: -16.0,
            muzzle_height_ducking: 10.0,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            health: 3,
            fire_cooldown_ms: 1000,
            muzzle_offset: 40.0,
            muzzle_height: -16.0,
            fire_range: 600.0,
            vertical_tolerance: 20.0,
        }
    }
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            speed: 1200.0,
            lifetime: 1.0,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self { speed: 200.0 }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_level_height: 3500.0,
            timestep: 1.0 / 60.0,
            invulnerability_ms: 500,
        }
    }
}

impl GameConfig {
    /// Load configuration from `path`, or defaults when no path is given
    pub fn load_or_default(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let config = Self::load_from_file(path)?;
                log::info!("Loaded game config from {}", path);
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.player.health, 10);
        assert_eq!(config.enemy.health, 3);
        assert_eq!(config.world.invulnerability_ms, 500);
        assert_eq!(config.physics.gravity, 2400.0);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            [physics]
            gravity = 1800.0

            [enemy]
            fire_range = 400.0
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.physics.gravity, 1800.0);
        assert_eq!(config.physics.walk_speed, 400.0);
        assert_eq!(config.enemy.fire_range, 400.0);
        assert_eq!(config.enemy.health, 3);
        assert_eq!(config.bullet, BulletConfig::default());
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_non_positive_values_are_rejected() {
        let cases = [
            ("[world]\ntimestep = -0.016", "world.timestep"),
            ("[world]\ntimestep = 0.0", "world.timestep"),
            ("[physics]\nwalk_speed = 0.0", "physics.walk_speed"),
            ("[bullet]\nspeed = nan", "bullet.speed"),
            ("[platform]\nspeed = -200.0", "platform.speed"),
        ];
        for (text, expected) in cases {
            match GameConfig::from_toml_str(text) {
                Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, expected),
                other => panic!("{text:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_load_or_default_rejects_bad_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("game.ron");
        std::fs::write(&path, "(world: (timestep: 0.0))").expect("write");

        let result = GameConfig::load_or_default(path.to_str());
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_no_path_gives_defaults() {
        let config = GameConfig::load_or_default(None).expect("defaults");
        assert_eq!(config, GameConfig::default());
    }
}
