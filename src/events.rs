//! Cross-entity signals and the input vocabulary.
//!
//! Entities never reach into each other; instead they push [`GameEvent`]s onto
//! the [`EventQueue`] handed to them for the tick, and the game manager
//! resolves the queue after every entity has been updated.

use std::collections::VecDeque;

use bitflags::bitflags;
use glam::Vec2;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::entity::boss::BossKind;
use crate::entity::enemy::EnemyKind;
use crate::entity::hero::{AbilityKind, HeroKind};
use crate::entity::resource::ResourceKind;
use crate::entity::{EntityId, Facing};

/// Actions the input collaborator can forward to the game manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Attack,
    Defend,
    Reload,
    Interact,
    Pause,
}

bitflags! {
    /// Held-input state for anything that takes direct control.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InputFlags: u16 {
        const MOVE_UP = 1 << 0;
        const MOVE_DOWN = 1 << 1;
        const MOVE_LEFT = 1 << 2;
        const MOVE_RIGHT = 1 << 3;
        const ATTACK = 1 << 4;
        const DEFEND = 1 << 5;
        const RELOAD = 1 << 6;
        const INTERACT = 1 << 7;
    }
}

impl InputFlags {
    /// Records a press or release of `action`. Actions without a held state are ignored.
    pub fn apply(&mut self, action: InputAction, pressed: bool) {
        let flag = match action {
            InputAction::MoveUp => InputFlags::MOVE_UP,
            InputAction::MoveDown => InputFlags::MOVE_DOWN,
            InputAction::MoveLeft => InputFlags::MOVE_LEFT,
            InputAction::MoveRight => InputFlags::MOVE_RIGHT,
            InputAction::Attack => InputFlags::ATTACK,
            InputAction::Defend => InputFlags::DEFEND,
            InputAction::Reload => InputFlags::RELOAD,
            InputAction::Interact => InputFlags::INTERACT,
            InputAction::Pause => return,
        };
        self.set(flag, pressed);
    }

    /// Combines the held movement keys into a velocity of magnitude `speed`.
    ///
    /// Opposing keys cancel out and diagonal input is normalized so moving
    /// diagonally is no faster than moving along an axis.
    pub fn movement(&self, speed: f32) -> Vec2 {
        let mut direction = Vec2::ZERO;
        if self.contains(InputFlags::MOVE_UP) {
            direction.y -= 1.0;
        }
        if self.contains(InputFlags::MOVE_DOWN) {
            direction.y += 1.0;
        }
        if self.contains(InputFlags::MOVE_LEFT) {
            direction.x -= 1.0;
        }
        if self.contains(InputFlags::MOVE_RIGHT) {
            direction.x += 1.0;
        }
        direction.normalize_or_zero() * speed
    }
}

/// Every signal that can cross an entity boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerAttack {
        origin: Vec2,
        facing: Facing,
        damage: f32,
        range: f32,
    },
    PlayerDamaged {
        damage: f32,
        health: f32,
    },
    PlayerHealed {
        amount: f32,
        health: f32,
    },
    PlayerDied {
        position: Vec2,
    },
    PlayerLevelUp {
        level: u32,
    },
    PlayerReloadStarted {
        reload_time: f32,
    },
    PlayerReloadFinished,

    EnemyAttack {
        enemy: EntityId,
        kind: EnemyKind,
        origin: Vec2,
        damage: f32,
        range: f32,
    },
    EnemyDamaged {
        enemy: EntityId,
        damage: f32,
        health: f32,
    },
    EnemyDied {
        enemy: EntityId,
        kind: EnemyKind,
        position: Vec2,
        experience_reward: u32,
    },

    BossAttack {
        boss: EntityId,
        origin: Vec2,
        damage: f32,
        range: f32,
    },
    BossPhaseChanged {
        boss: EntityId,
        phase: u32,
        position: Vec2,
    },
    BossDied {
        boss: EntityId,
        kind: BossKind,
        position: Vec2,
    },

    HeroAbilityUsed {
        hero: EntityId,
        kind: HeroKind,
        ability: AbilityKind,
        position: Vec2,
    },
    /// Area damage from a hero ability, resolved against enemies and bosses.
    HeroStrike {
        hero: EntityId,
        origin: Vec2,
        damage: f32,
        range: f32,
    },
    HeroDamaged {
        hero: EntityId,
        damage: f32,
        health: f32,
    },
    HeroHealed {
        hero: EntityId,
        amount: f32,
        health: f32,
    },
    HeroDied {
        hero: EntityId,
        kind: HeroKind,
        position: Vec2,
    },

    ResourceCollected {
        resource: EntityId,
        kind: ResourceKind,
        amount: u32,
    },
    SpawnReinforcements {
        origin: Vec2,
        count: u32,
        kind: EnemyKind,
    },

    GameStarted {
        level: u32,
    },
    GamePaused,
    GameResumed,
    LevelCompleted {
        level: u32,
        next_level: u32,
    },
    GameEnded {
        victory: bool,
        score: u64,
    },
}

/// FIFO bus the entities write into during a tick.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_input_action_parses_snake_case() {
        assert_eq!(InputAction::from_str("move_up").unwrap(), InputAction::MoveUp);
        assert_eq!(InputAction::from_str("reload").unwrap(), InputAction::Reload);
        assert!(InputAction::from_str("jump").is_err());
        assert_eq!(InputAction::MoveLeft.to_string(), "move_left");
    }

    #[test]
    fn test_diagonal_movement_is_normalized() {
        let mut flags = InputFlags::empty();
        flags.apply(InputAction::MoveUp, true);
        flags.apply(InputAction::MoveRight, true);
        let velocity = flags.movement(5.0);
        assert!((velocity.length() - 5.0).abs() < 1e-4);
        assert!(velocity.x > 0.0 && velocity.y < 0.0);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut flags = InputFlags::empty();
        flags.apply(InputAction::MoveLeft, true);
        flags.apply(InputAction::MoveRight, true);
        assert_eq!(flags.movement(5.0), Vec2::ZERO);
        flags.apply(InputAction::MoveRight, false);
        assert_eq!(flags.movement(5.0), Vec2::new(-5.0, 0.0));
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::GamePaused);
        queue.push(GameEvent::GameResumed);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(GameEvent::GamePaused));
        assert_eq!(queue.pop(), Some(GameEvent::GameResumed));
        assert!(queue.is_empty());
    }
}
