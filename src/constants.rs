//! This module contains all the constants used by the simulation.

use std::time::Duration;

use glam::Vec2;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Length of one reference frame, in milliseconds. Speeds are expressed in units per reference frame.
pub const FRAME_MS: f32 = 16.67;

/// The default size of the arena, in world units.
pub const ARENA_SIZE: Vec2 = Vec2::new(1200.0, 800.0);
/// The default size of each pathfinding cell, in world units.
pub const CELL_SIZE: f32 = 32.0;

pub const PLAYER_SPEED: f32 = 5.0;
pub const PLAYER_HEALTH: f32 = 100.0;
pub const PLAYER_DAMAGE: f32 = 25.0;
pub const PLAYER_ACCURACY: f32 = 0.8;
/// Experience needed for the first level-up; every later threshold grows by [`EXPERIENCE_GROWTH`].
pub const PLAYER_EXPERIENCE_TO_NEXT: u32 = 100;
pub const EXPERIENCE_GROWTH: f32 = 1.2;
pub const PLAYER_START: Vec2 = Vec2::new(100.0, 100.0);

pub const INITIAL_RICE: u32 = 100;
pub const INITIAL_WOOD: u32 = 50;
pub const INITIAL_MEDALS: u32 = 10;

pub const ENEMY_SPAWN_INTERVAL_MS: f32 = 5000.0;
pub const MAX_ENEMIES: usize = 10;
pub const MAX_LEVEL_ENEMIES: u32 = 15;
/// Every n-th level spawns a boss.
pub const BOSS_LEVEL_INTERVAL: u32 = 5;
pub const FINAL_LEVEL: u32 = 10;
/// Seconds the player must survive on each level.
pub const SURVIVAL_SECONDS: u32 = 120;

pub const KILL_SCORE: u64 = 10;
pub const BOSS_KILL_SCORE: u64 = 100;
pub const LEVEL_UP_SCORE: u64 = 100;
pub const LEVEL_COMPLETE_SCORE: u64 = 200;

/// Radius within which the player picks up a resource.
pub const PICKUP_RADIUS: f32 = 24.0;

/// Animation names shared between entities and the default animation library.
pub mod animations {
    pub const PLAYER_IDLE: &str = "player_idle";
    pub const PLAYER_WALK: &str = "player_walk";
    pub const PLAYER_ATTACK: &str = "player_attack";
    pub const PLAYER_DEATH: &str = "player_death";
    pub const ENEMY_IDLE: &str = "enemy_idle";
    pub const ENEMY_WALK: &str = "enemy_walk";
    pub const ENEMY_ATTACK: &str = "enemy_attack";
    pub const ENEMY_DEATH: &str = "enemy_death";
    pub const EXPLOSION: &str = "explosion";
}
