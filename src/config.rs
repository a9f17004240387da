use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::ConfigError;

/// Startup configuration for a simulation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Arena width in world units
    pub arena_width: f32,
    /// Arena height in world units
    pub arena_height: f32,
    /// Pathfinding cell size in world units
    pub cell_size: f32,
    /// Draw AI state and ranges over entities
    pub debug: bool,
    /// Seed for the simulation RNG; `None` seeds from the OS
    pub seed: Option<u64>,
    pub enemy_spawn_interval_ms: f32,
    pub max_enemies: usize,
    /// Completing this level wins the game
    pub final_level: u32,
    /// Directory used by the file-backed progress store
    pub save_dir: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: constants::ARENA_SIZE.x,
            arena_height: constants::ARENA_SIZE.y,
            cell_size: constants::CELL_SIZE,
            debug: false,
            seed: None,
            enemy_spawn_interval_ms: constants::ENEMY_SPAWN_INTERVAL_MS,
            max_enemies: constants::MAX_ENEMIES,
            final_level: constants::FINAL_LEVEL,
            save_dir: "saves".to_string(),
        }
    }
}

impl GameConfig {
    /// Builds the configuration from defaults overridden by `JUNGLE_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Figment::from(Serialized::defaults(GameConfig::default())).merge(Env::prefixed("JUNGLE_")))
    }

    /// Extracts and validates a configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: GameConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "arena must have a positive size, got {}x{}",
                self.arena_width, self.arena_height
            )));
        }
        if !(self.cell_size > 0.0) || self.cell_size > self.arena_width.min(self.arena_height) {
            return Err(ConfigError::Invalid(format!(
                "cell size {} does not fit the arena",
                self.cell_size
            )));
        }
        if self.final_level == 0 {
            return Err(ConfigError::Invalid("final level must be at least 1".to_string()));
        }
        if !(self.enemy_spawn_interval_ms >= 0.0) {
            return Err(ConfigError::Invalid("enemy spawn interval must not be negative".to_string()));
        }
        Ok(())
    }

    pub fn arena_size(&self) -> glam::Vec2 {
        glam::Vec2::new(self.arena_width, self.arena_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::Serialized;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_overrides_merge_over_defaults() {
        let figment = Figment::from(Serialized::defaults(GameConfig::default()))
            .merge(Serialized::default("max_enemies", 3))
            .merge(Serialized::default("seed", 42));
        let config = GameConfig::from_figment(figment).unwrap();
        assert_eq!(config.max_enemies, 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.arena_width, constants::ARENA_SIZE.x);
    }

    #[test]
    fn test_rejects_oversized_cells() {
        let config = GameConfig {
            cell_size: 5000.0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_final_level() {
        let config = GameConfig {
            final_level: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
