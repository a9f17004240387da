//! Simulated objects and the pieces they share.

pub mod boss;
pub mod enemy;
pub mod hero;
pub mod player;
pub mod resource;
pub mod r#trait;

use std::fmt;

use glam::Vec2;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::events::EventQueue;
use crate::map::NavGrid;

pub use r#trait::Entity;

/// Identifier handed out by the game manager; unique for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Enemy,
    Boss,
    Hero,
    Resource,
}

/// Which way a sprite faces. Sheets are drawn facing right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing implied by a horizontal displacement; zero keeps `self`.
    pub fn from_dx(self, dx: f32) -> Facing {
        if dx > 0.0 {
            Facing::Right
        } else if dx < 0.0 {
            Facing::Left
        } else {
            self
        }
    }

    pub fn is_left(self) -> bool {
        self == Facing::Left
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Health pool shared by every living entity.
///
/// `0 <= health <= max_health` always holds, and the pool goes inactive
/// exactly once, on the call that drains it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    pub active: bool,
}

impl Vitals {
    pub fn new(max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            active: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.active && self.health > 0.0
    }

    /// Removes `amount` health. Returns `true` only on the call that kills.
    pub fn damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Restores up to `amount` health and returns how much was actually applied.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
        self.health - before
    }

    pub fn ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    /// Checks a pool read from untrusted data.
    pub fn is_consistent(&self) -> bool {
        self.max_health.is_finite()
            && self.health.is_finite()
            && self.max_health > 0.0
            && (0.0..=self.max_health).contains(&self.health)
    }
}

/// Everything an entity may look at or write to during one tick.
pub struct TickContext<'a> {
    /// Milliseconds since the previous tick
    pub dt: f32,
    /// Simulation clock, in milliseconds
    pub now: f32,
    /// Where the player stands, if there is one
    pub player_position: Option<Vec2>,
    pub grid: &'a NavGrid,
    /// Arena extent; entities keep their whole box inside it
    pub bounds: Vec2,
    pub rng: &'a mut SmallRng,
    pub events: &'a mut EventQueue,
}

/// Distance-normalised step: speeds are expressed per reference frame.
pub fn step(velocity: Vec2, dt: f32) -> Vec2 {
    velocity * dt / crate::constants::FRAME_MS
}

/// Clamps a top-left `position` so a box of `size` stays within `bounds`.
pub fn clamp_to_arena(position: Vec2, size: Size, bounds: Vec2) -> Vec2 {
    let max = (bounds - size.as_vec2()).max(Vec2::ZERO);
    position.clamp(Vec2::ZERO, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vitals_die_exactly_once() {
        let mut vitals = Vitals::new(50.0);
        assert!(!vitals.damage(30.0));
        assert!(vitals.damage(30.0));
        assert_eq!(vitals.health, 0.0);
        assert!(!vitals.is_alive());
        assert!(!vitals.damage(10.0));
    }

    #[test]
    fn test_heal_is_clamped() {
        let mut vitals = Vitals::new(100.0);
        vitals.damage(10.0);
        assert_eq!(vitals.heal(50.0), 10.0);
        assert_eq!(vitals.health, 100.0);
    }

    #[test]
    fn test_clamp_to_arena_keeps_box_inside() {
        let clamped = clamp_to_arena(Vec2::new(1190.0, -5.0), Size::new(32.0, 48.0), Vec2::new(1200.0, 800.0));
        assert_eq!(clamped, Vec2::new(1168.0, 0.0));
    }

    #[test]
    fn test_facing_from_dx() {
        assert_eq!(Facing::Right.from_dx(-1.0), Facing::Left);
        assert_eq!(Facing::Left.from_dx(0.0), Facing::Left);
    }
}
