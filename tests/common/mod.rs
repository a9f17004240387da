#![allow(dead_code)]

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use jungle_ops::config::GameConfig;
use jungle_ops::constants::{ARENA_SIZE, CELL_SIZE, FRAME_MS};
use jungle_ops::entity::TickContext;
use jungle_ops::events::{EventQueue, GameEvent};
use jungle_ops::game::GameManager;
use jungle_ops::map::NavGrid;

pub const SEED: u64 = 0x5EED;

/// Owns everything a [`TickContext`] borrows, so entities can be ticked outside the manager.
pub struct Harness {
    pub grid: NavGrid,
    pub rng: SmallRng,
    pub events: EventQueue,
    pub bounds: Vec2,
    pub now: f32,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            grid: NavGrid::new(ARENA_SIZE.x, ARENA_SIZE.y, CELL_SIZE),
            rng: SmallRng::seed_from_u64(SEED),
            events: EventQueue::new(),
            bounds: ARENA_SIZE,
            now: 0.0,
        }
    }

    /// Advances the clock by one reference frame and returns a context for that tick.
    pub fn frame(&mut self, player_position: Option<Vec2>) -> TickContext<'_> {
        self.step(FRAME_MS, player_position)
    }

    pub fn step(&mut self, dt: f32, player_position: Option<Vec2>) -> TickContext<'_> {
        self.now += dt;
        TickContext {
            dt,
            now: self.now,
            player_position,
            grid: &self.grid,
            bounds: self.bounds,
            rng: &mut self.rng,
            events: &mut self.events,
        }
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain().collect()
    }
}

pub fn test_config() -> GameConfig {
    GameConfig {
        seed: Some(SEED),
        ..GameConfig::default()
    }
}

/// A manager that has gone through the menu and started a session at `t = 0`.
pub fn playing_game(config: GameConfig) -> GameManager {
    let mut game = GameManager::new(config);
    assert!(game.enter_menu());
    assert!(game.start_game(0.0));
    game
}
