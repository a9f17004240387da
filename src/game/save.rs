//! Versioned snapshot of a whole session.
//!
//! Snapshots are validated in full before any of it is applied, so a bad blob
//! never leaves a half-loaded session behind.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entity::boss::{Boss, BossSave};
use crate::entity::enemy::{Enemy, EnemySave};
use crate::entity::hero::{Hero, HeroSave};
use crate::entity::player::{Player, PlayerSave};
use crate::entity::resource::{Resource, ResourceSave};
use crate::entity::EntityId;
use crate::error::SaveError;
use crate::game::objectives::LevelObjective;
use crate::game::state::{GameResources, GameStats};

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub stats: GameStats,
    pub resources: GameResources,
    pub level: u32,
    pub objectives: Vec<LevelObjective>,
    /// Simulation clock when the snapshot was taken, in milliseconds
    pub clock: f32,
    pub level_started: f32,
    pub next_id: u64,
    pub player: Option<PlayerSave>,
    pub enemies: Vec<EnemySave>,
    pub bosses: Vec<BossSave>,
    pub heroes: Vec<HeroSave>,
    #[serde(default)]
    pub pickups: Vec<ResourceSave>,
}

impl SaveGame {
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a snapshot.
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let save: SaveGame = serde_json::from_str(json)?;
        save.validate()?;
        Ok(save)
    }

    /// Checks everything that would otherwise be caught halfway through applying the snapshot.
    pub fn validate(&self) -> Result<(), SaveError> {
        if self.version != SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion {
                found: self.version,
                expected: SAVE_VERSION,
            });
        }
        if self.level == 0 {
            return Err(SaveError::InvalidEntity {
                kind: "session",
                reason: "level must be at least 1".to_string(),
            });
        }
        if !self.clock.is_finite() || !self.level_started.is_finite() || self.level_started > self.clock {
            return Err(SaveError::InvalidEntity {
                kind: "session",
                reason: "clock is inconsistent".to_string(),
            });
        }

        if let Some(player) = &self.player {
            Player::validate_save(player)?;
        }
        self.enemies.iter().try_for_each(Enemy::validate_save)?;
        self.bosses.iter().try_for_each(Boss::validate_save)?;
        self.heroes.iter().try_for_each(Hero::validate_save)?;
        self.pickups.iter().try_for_each(Resource::validate_save)?;

        if self.next_id == u64::MAX {
            return Err(SaveError::InvalidEntity {
                kind: "session",
                reason: "id space is exhausted".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for id in self.ids() {
            if id.0 == u64::MAX {
                return Err(SaveError::InvalidEntity {
                    kind: "session",
                    reason: format!("entity id {id} is out of range"),
                });
            }
            if !seen.insert(id) {
                return Err(SaveError::InvalidEntity {
                    kind: "session",
                    reason: format!("duplicate entity id {id}"),
                });
            }
        }
        Ok(())
    }

    /// Every entity id in the snapshot.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.player
            .iter()
            .map(|player| player.id)
            .chain(self.enemies.iter().map(|enemy| enemy.id))
            .chain(self.bosses.iter().map(|boss| boss.id))
            .chain(self.heroes.iter().map(|hero| hero.id))
            .chain(self.pickups.iter().map(|pickup| pickup.id))
    }
}
