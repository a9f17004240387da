//! Session phase and the per-session aggregates the manager owns.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::constants;

/// Where the session is in its lifecycle.
///
/// `Loading -> Menu -> Playing <-> Paused -> GameOver | Victory`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    Loading,
    Menu,
    Playing,
    Paused,
    GameOver,
    Victory,
}

impl GameState {
    pub fn is_running(self) -> bool {
        matches!(self, GameState::Playing | GameState::Paused)
    }

    pub fn is_finished(self) -> bool {
        matches!(self, GameState::GameOver | GameState::Victory)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub score: u64,
    pub kills: u32,
    pub deaths: u32,
    /// Player level as last reported by a level-up
    pub level: u32,
    /// Milliseconds spent in `Playing`
    pub play_time: f32,
    /// Percentage of shots that hit at least one target
    pub accuracy: f32,
    pub shots_hit: u32,
    pub shots_fired: u32,
}

impl GameStats {
    pub fn new() -> Self {
        Self {
            level: 1,
            ..Self::default()
        }
    }

    pub fn record_shot(&mut self, hit: bool) {
        self.shots_fired += 1;
        if hit {
            self.shots_hit += 1;
        }
        self.accuracy = self.shots_hit as f32 / self.shots_fired as f32 * 100.0;
    }

    pub fn play_seconds(&self) -> u64 {
        (self.play_time / 1000.0).floor() as u64
    }
}

/// The three-currency ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResources {
    pub rice: u32,
    pub wood: u32,
    pub medals: u32,
}

impl Default for GameResources {
    fn default() -> Self {
        Self {
            rice: constants::INITIAL_RICE,
            wood: constants::INITIAL_WOOD,
            medals: constants::INITIAL_MEDALS,
        }
    }
}

impl GameResources {
    pub fn add(&mut self, rice: u32, wood: u32, medals: u32) {
        self.rice = self.rice.saturating_add(rice);
        self.wood = self.wood.saturating_add(wood);
        self.medals = self.medals.saturating_add(medals);
    }

    pub fn can_afford(&self, rice: u32, wood: u32, medals: u32) -> bool {
        self.rice >= rice && self.wood >= wood && self.medals >= medals
    }

    /// Deducts all three amounts, or nothing at all if any one is short.
    pub fn spend(&mut self, rice: u32, wood: u32, medals: u32) -> bool {
        if !self.can_afford(rice, wood, medals) {
            return false;
        }
        self.rice -= rice;
        self.wood -= wood;
        self.medals -= medals;
        true
    }
}
