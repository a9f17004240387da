use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::constants;

pub const KILL_ENEMIES: &str = "kill_enemies";
pub const SURVIVE: &str = "survive";
pub const DEFEAT_BOSS: &str = "defeat_boss";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveType {
    Kill,
    Survive,
    Rescue,
    Collect,
    Reach,
}

/// A per-level completion condition. Once completed it stays completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelObjective {
    pub id: String,
    pub description: String,
    pub kind: ObjectiveType,
    pub target: u32,
    pub current: u32,
    pub completed: bool,
}

impl LevelObjective {
    pub fn new(id: &str, description: &str, kind: ObjectiveType, target: u32) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            kind,
            target,
            current: 0,
            completed: false,
        }
    }

    /// Adds `amount` to the progress counter. Returns `true` if this completed the objective.
    pub fn advance(&mut self, amount: u32) -> bool {
        if self.completed {
            return false;
        }
        self.current = self.current.saturating_add(amount);
        self.check()
    }

    /// Overwrites the progress counter. Returns `true` if this completed the objective.
    pub fn set_progress(&mut self, current: u32) -> bool {
        if self.completed {
            return false;
        }
        self.current = current;
        self.check()
    }

    fn check(&mut self) -> bool {
        if self.current >= self.target {
            self.completed = true;
        }
        self.completed
    }
}

/// Objectives for `level`: a kill quota, a survival timer, and on boss levels a boss kill.
pub fn for_level(level: u32) -> Vec<LevelObjective> {
    let mut objectives = vec![
        LevelObjective::new(KILL_ENEMIES, "Eliminate enemies", ObjectiveType::Kill, 5 + level * 2),
        LevelObjective::new(
            SURVIVE,
            "Survive for 2 minutes",
            ObjectiveType::Survive,
            constants::SURVIVAL_SECONDS,
        ),
    ];

    if is_boss_level(level) {
        objectives.push(LevelObjective::new(DEFEAT_BOSS, "Defeat the boss", ObjectiveType::Kill, 1));
    }

    objectives
}

pub fn is_boss_level(level: u32) -> bool {
    level > 0 && level % constants::BOSS_LEVEL_INTERVAL == 0
}
