//! Rank-and-file hostiles and their alert-driven state machine.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{debug, trace};

use crate::animation::AnimationPlayer;
use crate::constants::animations;
use crate::entity::{clamp_to_arena, step, Entity, EntityId, EntityKind, Facing, Size, TickContext, Vitals};
use crate::error::SaveError;
use crate::events::{EventQueue, GameEvent};
use crate::map::{NavGrid, PathOptions};
use crate::render::{Color, SpriteSet, Surface};

pub const ENEMY_SIZE: Size = Size::new(32.0, 48.0);

pub const MAX_ALERT: f32 = 100.0;
/// Alert gained per tick while the player is in sight.
const ALERT_GAIN: f32 = 2.0;
/// Alert lost per tick while the player is not.
const ALERT_DECAY: f32 = 0.5;

const PATROL_REACH: f32 = 20.0;
const SEARCH_REACH: f32 = 10.0;
const SEARCH_JITTER: f32 = 100.0;
const WAYPOINT_REACH: f32 = 15.0;
/// How far the target may drift from the end of the current path before it is recomputed.
const REPATH_DRIFT: f32 = 50.0;
const STUCK_TIMEOUT: f32 = 2000.0;
/// Net displacement that counts as progress within a stuck window.
const STUCK_DISTANCE: f32 = 1.0;
const MOVEMENT_JITTER: f32 = 0.1;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Soldier,
    Officer,
    Sniper,
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub attack_range: f32,
    pub detection_range: f32,
    /// Milliseconds between shots
    pub attack_cooldown: f32,
    pub experience_reward: u32,
}

impl EnemyKind {
    pub fn stats(self) -> EnemyStats {
        let (max_health, damage, speed, attack_range, detection_range, attack_cooldown, experience_reward) = match self {
            EnemyKind::Soldier => (50.0, 15.0, 2.0, 80.0, 150.0, 1000.0, 10),
            EnemyKind::Officer => (80.0, 20.0, 2.5, 100.0, 200.0, 800.0, 25),
            EnemyKind::Sniper => (40.0, 35.0, 1.5, 250.0, 300.0, 2000.0, 20),
            EnemyKind::Heavy => (120.0, 30.0, 1.0, 60.0, 120.0, 1500.0, 40),
        };
        EnemyStats {
            max_health,
            damage,
            speed,
            attack_range,
            detection_range,
            attack_cooldown,
            experience_reward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AiState {
    Idle,
    Patrol,
    Chase,
    Attack,
    Dead,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyAi {
    pub state: AiState,
    pub target: Option<Vec2>,
    pub last_known_player_position: Option<Vec2>,
    pub patrol_points: SmallVec<[Vec2; 5]>,
    pub patrol_index: usize,
    /// Suspicion gauge in `[0, 100]`
    pub alert_level: f32,
    pub last_attack: Option<f32>,
}

/// Snapshot of an enemy as stored in a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySave {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub position: Vec2,
    pub vitals: Vitals,
    pub stats: EnemyStats,
    pub ai: EnemyAi,
    pub facing: Facing,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    id: EntityId,
    kind: EnemyKind,
    pub position: Vec2,
    pub vitals: Vitals,
    pub stats: EnemyStats,
    pub ai: EnemyAi,
    pub velocity: Vec2,
    pub facing: Facing,
    path: Vec<Vec2>,
    path_index: usize,
    stuck_timer: f32,
    /// Where the enemy stood when the current stuck window opened
    stuck_anchor: Vec2,
    animation: AnimationPlayer,
}

impl Enemy {
    /// Spawns an enemy with 3 to 5 patrol points scattered within 100 units of `position`.
    pub fn new(id: EntityId, kind: EnemyKind, position: Vec2, rng: &mut impl Rng) -> Self {
        let stats = kind.stats();
        let count = rng.random_range(3..=5);
        let patrol_points = (0..count)
            .map(|_| {
                position
                    + Vec2::new(
                        (rng.random::<f32>() - 0.5) * 200.0,
                        (rng.random::<f32>() - 0.5) * 200.0,
                    )
            })
            .collect();

        let mut animation = AnimationPlayer::with_defaults();
        animation.play(animations::ENEMY_IDLE, false);

        Self {
            id,
            kind,
            position,
            vitals: Vitals::new(stats.max_health),
            stats,
            ai: EnemyAi {
                state: AiState::Patrol,
                target: None,
                last_known_player_position: None,
                patrol_points,
                patrol_index: 0,
                alert_level: 0.0,
                last_attack: None,
            },
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            path: Vec::new(),
            path_index: 0,
            stuck_timer: 0.0,
            stuck_anchor: position,
            animation,
        }
    }

    pub fn enemy_kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn state(&self) -> AiState {
        self.ai.state
    }

    pub fn alert_level(&self) -> f32 {
        self.ai.alert_level
    }

    /// Waypoints still ahead on the current path.
    pub fn remaining_path(&self) -> &[Vec2] {
        self.path.get(self.path_index..).unwrap_or(&[])
    }

    fn can_detect(&self, player: Vec2, grid: &NavGrid) -> bool {
        self.position.distance(player) <= self.stats.detection_range && grid.has_line_of_sight(self.position, player)
    }

    fn update_ai(&mut self, ctx: &mut TickContext<'_>) {
        let detected = ctx.player_position.filter(|player| self.can_detect(*player, ctx.grid));

        if let Some(player) = detected {
            self.ai.last_known_player_position = Some(player);
            self.ai.alert_level = (self.ai.alert_level + ALERT_GAIN).min(MAX_ALERT);

            if self.position.distance(player) <= self.stats.attack_range {
                self.set_state(AiState::Attack);
                self.ai.target = None;
            } else {
                self.set_state(AiState::Chase);
                self.ai.target = Some(player);
            }
        } else {
            self.ai.alert_level = (self.ai.alert_level - ALERT_DECAY).max(0.0);

            match self.ai.state {
                AiState::Attack => {
                    self.set_state(AiState::Chase);
                    self.ai.target = self.ai.last_known_player_position;
                }
                AiState::Chase if self.ai.alert_level <= 0.0 => {
                    self.set_state(AiState::Patrol);
                    self.ai.target = None;
                }
                _ => {}
            }
        }

        match self.ai.state {
            AiState::Idle => self.idle(ctx.rng),
            AiState::Patrol => self.patrol(ctx.grid),
            AiState::Chase => self.chase(ctx.grid, ctx.rng),
            AiState::Attack => self.hold_and_fire(ctx.now, ctx.events),
            AiState::Dead => {}
        }
    }

    fn set_state(&mut self, state: AiState) {
        if self.ai.state != state {
            trace!(enemy = %self.id, from = %self.ai.state, to = %state, "Enemy state changed");
            self.ai.state = state;
        }
    }

    fn idle(&mut self, rng: &mut impl Rng) {
        self.velocity = Vec2::ZERO;
        if rng.random::<f32>() < 0.01 {
            self.set_state(AiState::Patrol);
        }
    }

    fn patrol(&mut self, grid: &NavGrid) {
        let Some(point) = self.ai.patrol_points.get(self.ai.patrol_index).copied() else {
            self.set_state(AiState::Idle);
            return;
        };

        if self.position.distance(point) < PATROL_REACH {
            self.ai.patrol_index = (self.ai.patrol_index + 1) % self.ai.patrol_points.len();
            // Pause for a tick at each point
            self.velocity = Vec2::ZERO;
            return;
        }

        self.move_towards(point, grid);
    }

    fn chase(&mut self, grid: &NavGrid, rng: &mut impl Rng) {
        let Some(mut target) = self.ai.target else {
            self.set_state(AiState::Patrol);
            return;
        };

        if self.position.distance(target) < SEARCH_REACH {
            // Reached the last sighting without finding anyone; search nearby.
            target += Vec2::new(
                (rng.random::<f32>() - 0.5) * SEARCH_JITTER,
                (rng.random::<f32>() - 0.5) * SEARCH_JITTER,
            );
            self.ai.target = Some(target);
        }

        self.move_towards(target, grid);
    }

    fn hold_and_fire(&mut self, now: f32, events: &mut EventQueue) {
        self.velocity = Vec2::ZERO;

        let ready = self
            .ai
            .last_attack
            .is_none_or(|last| now - last >= self.stats.attack_cooldown);
        if ready {
            self.attack(events);
            self.ai.last_attack = Some(now);
        }
    }

    /// Fires at whatever is in range; the manager resolves the hit.
    pub fn attack(&mut self, events: &mut EventQueue) {
        events.push(GameEvent::EnemyAttack {
            enemy: self.id,
            kind: self.kind,
            origin: self.position,
            damage: self.stats.damage,
            range: self.stats.attack_range,
        });
    }

    fn should_recalculate_path(&self, target: Vec2) -> bool {
        match self.path.last() {
            None => true,
            Some(end) => end.distance(target) > REPATH_DRIFT || self.path_index >= self.path.len(),
        }
    }

    fn move_towards(&mut self, target: Vec2, grid: &NavGrid) {
        if self.should_recalculate_path(target) {
            self.path = grid.find_path(self.position, target, PathOptions::default());
            self.path_index = 0;
        }

        match self.path.get(self.path_index).copied() {
            Some(waypoint) => {
                if self.position.distance(waypoint) < WAYPOINT_REACH {
                    self.path_index += 1;
                    return;
                }
                self.move_directly_towards(waypoint);
            }
            // No usable path; head straight for it.
            None => self.move_directly_towards(target),
        }
    }

    fn move_directly_towards(&mut self, target: Vec2) {
        let delta = target - self.position;
        match delta.try_normalize() {
            Some(direction) => {
                self.velocity = direction * self.stats.speed;
                self.facing = if delta.x > 0.0 { Facing::Right } else { Facing::Left };
            }
            None => self.velocity = Vec2::ZERO,
        }
    }

    fn is_commanded_to_move(&self) -> bool {
        self.velocity.x.abs() > 0.1 || self.velocity.y.abs() > 0.1
    }

    /// Nudges the enemy in a random direction after `STUCK_TIMEOUT` of commanded
    /// movement without getting `STUCK_DISTANCE` away from where the window opened.
    fn update_stuck_detection(&mut self, dt: f32, rng: &mut impl Rng) {
        if !self.is_commanded_to_move() || self.position.distance(self.stuck_anchor) > STUCK_DISTANCE {
            self.stuck_timer = 0.0;
            self.stuck_anchor = self.position;
            return;
        }

        self.stuck_timer += dt;
        if self.stuck_timer > STUCK_TIMEOUT {
            let angle = rng.random_range(0.0..TAU);
            self.velocity = Vec2::from_angle(angle) * self.stats.speed;
            self.path.clear();
            self.path_index = 0;
            self.stuck_timer = 0.0;
            self.stuck_anchor = self.position;
            debug!(enemy = %self.id, "Enemy stuck, nudging");
        }
    }

    /// Milliseconds of commanded movement without progress so far.
    pub fn stuck_time(&self) -> f32 {
        self.stuck_timer
    }

    fn update_animation(&mut self, dt: f32) {
        self.animation.update(dt);

        let wanted = if self.ai.state == AiState::Attack {
            animations::ENEMY_ATTACK
        } else if self.is_commanded_to_move() {
            animations::ENEMY_WALK
        } else {
            animations::ENEMY_IDLE
        };
        if !self.animation.is_playing(Some(wanted)) {
            self.animation.play(wanted, false);
        }
    }

    /// Applies damage and maxes out alert. Returns `true` on the killing hit only.
    pub fn take_damage(&mut self, amount: f32, events: &mut EventQueue) -> bool {
        if !self.vitals.is_alive() || self.ai.state == AiState::Dead {
            return false;
        }

        self.ai.alert_level = MAX_ALERT;

        if self.vitals.damage(amount) {
            self.die(events);
            return true;
        }

        events.push(GameEvent::EnemyDamaged {
            enemy: self.id,
            damage: amount,
            health: self.vitals.health,
        });
        false
    }

    fn die(&mut self, events: &mut EventQueue) {
        self.set_state(AiState::Dead);
        self.velocity = Vec2::ZERO;
        debug!(enemy = %self.id, kind = %self.kind, "Enemy died");
        events.push(GameEvent::EnemyDied {
            enemy: self.id,
            kind: self.kind,
            position: self.position,
            experience_reward: self.stats.experience_reward,
        });
    }

    pub fn to_save(&self) -> EnemySave {
        EnemySave {
            id: self.id,
            kind: self.kind,
            position: self.position,
            vitals: self.vitals,
            stats: self.stats.clone(),
            ai: self.ai.clone(),
            facing: self.facing,
        }
    }

    pub fn validate_save(save: &EnemySave) -> Result<(), SaveError> {
        let invalid = |reason: &str| {
            Err(SaveError::InvalidEntity {
                kind: "enemy",
                reason: reason.to_string(),
            })
        };

        if !save.vitals.is_consistent() {
            return invalid("health out of range");
        }
        if !save.position.is_finite() {
            return invalid("position is not finite");
        }
        if !(0.0..=MAX_ALERT).contains(&save.ai.alert_level) {
            return invalid("alert level out of range");
        }
        if !save.ai.patrol_points.is_empty() && save.ai.patrol_index >= save.ai.patrol_points.len() {
            return invalid("patrol index out of range");
        }
        if (save.ai.state == AiState::Dead) == save.vitals.is_alive() {
            return invalid("dead state does not match health");
        }
        Ok(())
    }

    pub fn from_save(save: EnemySave) -> Result<Self, SaveError> {
        Self::validate_save(&save)?;

        let mut animation = AnimationPlayer::with_defaults();
        animation.play(animations::ENEMY_IDLE, false);

        Ok(Self {
            id: save.id,
            kind: save.kind,
            position: save.position,
            vitals: save.vitals,
            stats: save.stats,
            ai: save.ai,
            velocity: Vec2::ZERO,
            facing: save.facing,
            path: Vec::new(),
            path_index: 0,
            stuck_timer: 0.0,
            stuck_anchor: save.position,
            animation,
        })
    }
}

impl Entity for Enemy {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> Size {
        ENEMY_SIZE
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        if !self.vitals.is_alive() || self.ai.state == AiState::Dead {
            return;
        }

        self.update_ai(ctx);

        if self.is_commanded_to_move() {
            self.velocity += Vec2::new(
                (ctx.rng.random::<f32>() - 0.5) * MOVEMENT_JITTER,
                (ctx.rng.random::<f32>() - 0.5) * MOVEMENT_JITTER,
            );
        }

        self.update_animation(ctx.dt);
        self.update_stuck_detection(ctx.dt, ctx.rng);

        self.position += step(self.velocity, ctx.dt);
        self.position = clamp_to_arena(self.position, ENEMY_SIZE, ctx.bounds);
    }

    fn render(&self, surface: &mut dyn Surface, sprites: &SpriteSet, debug: bool) {
        if !self.vitals.active {
            return;
        }

        match (sprites.get(EntityKind::Enemy), self.animation.current_frame()) {
            (Some(sheet), Some(frame)) => surface.draw_sprite(sheet, frame, self.bounds(), self.facing.is_left()),
            _ => self.render_placeholder(surface, Color::RED),
        }
        self.render_health_bar(surface);

        if debug {
            let center = self.bounds().center();
            surface.draw_text(
                self.ai.state.as_ref(),
                Vec2::new(self.position.x, self.position.y - 12.0),
                Color::YELLOW,
            );
            surface.draw_text(
                &format!("Alert: {}", self.ai.alert_level.floor()),
                Vec2::new(self.position.x, self.position.y - 25.0),
                Color::YELLOW,
            );
            surface.stroke_circle(center, self.stats.detection_range, Color::rgba(255, 255, 0, 51));
            surface.stroke_circle(center, self.stats.attack_range, Color::rgba(255, 0, 0, 77));
        }
    }
}
