//! End-of-stage bosses: always hunting, escalating in phases as they lose health.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::info;

use crate::animation::AnimationPlayer;
use crate::constants::animations;
use crate::entity::{clamp_to_arena, step, Entity, EntityId, EntityKind, Facing, Size, TickContext, Vitals};
use crate::error::SaveError;
use crate::events::{EventQueue, GameEvent};
use crate::render::{Color, Rect, SpriteSet, Surface};

pub const BOSS_SIZE: Size = Size::new(64.0, 96.0);

/// Milliseconds between boss attacks.
pub const BOSS_ATTACK_COOLDOWN: f32 = 1500.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BossKind {
    Commander,
    Tank,
    Helicopter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossStats {
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub attack_range: f32,
    /// Health ratios, descending, at which the boss enters its next phase
    pub phase_thresholds: SmallVec<[f32; 3]>,
}

impl BossKind {
    pub fn stats(self) -> BossStats {
        let (max_health, damage, speed, attack_range) = match self {
            BossKind::Commander => (250.0, 20.0, 1.5, 100.0),
            BossKind::Tank => (400.0, 30.0, 1.0, 80.0),
            BossKind::Helicopter => (300.0, 25.0, 2.0, 200.0),
        };
        BossStats {
            max_health,
            damage,
            speed,
            attack_range,
            phase_thresholds: smallvec![0.75, 0.5, 0.25],
        }
    }
}

/// Snapshot of a boss as stored in a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossSave {
    pub id: EntityId,
    pub kind: BossKind,
    pub position: Vec2,
    pub vitals: Vitals,
    pub current_phase: u32,
}

#[derive(Debug, Clone)]
pub struct Boss {
    id: EntityId,
    kind: BossKind,
    pub position: Vec2,
    pub vitals: Vitals,
    pub stats: BossStats,
    current_phase: u32,
    pub velocity: Vec2,
    pub facing: Facing,
    last_attack: Option<f32>,
    animation: AnimationPlayer,
}

impl Boss {
    pub fn new(id: EntityId, kind: BossKind, position: Vec2) -> Self {
        let stats = kind.stats();
        let mut animation = AnimationPlayer::with_defaults();
        animation.play(animations::ENEMY_IDLE, false);

        Self {
            id,
            kind,
            position,
            vitals: Vitals::new(stats.max_health),
            stats,
            current_phase: 0,
            velocity: Vec2::ZERO,
            facing: Facing::Left,
            last_attack: None,
            animation,
        }
    }

    pub fn boss_kind(&self) -> BossKind {
        self.kind
    }

    /// Number of phase thresholds crossed so far. Never decreases.
    pub fn current_phase(&self) -> u32 {
        self.current_phase
    }

    fn phase_for_health(&self) -> u32 {
        let ratio = self.vitals.ratio();
        self.stats
            .phase_thresholds
            .iter()
            .filter(|threshold| ratio <= **threshold)
            .count() as u32
    }

    /// Raises the phase to match current health, one event per phase entered.
    fn check_phase(&mut self, events: &mut EventQueue) {
        let target = self.phase_for_health();
        while self.current_phase < target {
            self.current_phase += 1;
            info!(boss = %self.id, phase = self.current_phase, "Boss entered new phase");
            events.push(GameEvent::BossPhaseChanged {
                boss: self.id,
                phase: self.current_phase,
                position: self.position,
            });
        }
    }

    /// Applies damage. Returns `true` on the killing hit only.
    pub fn take_damage(&mut self, amount: f32, events: &mut EventQueue) -> bool {
        if !self.vitals.is_alive() {
            return false;
        }

        if self.vitals.damage(amount) {
            self.velocity = Vec2::ZERO;
            info!(boss = %self.id, kind = %self.kind, "Boss defeated");
            events.push(GameEvent::BossDied {
                boss: self.id,
                kind: self.kind,
                position: self.position,
            });
            return true;
        }

        self.check_phase(events);
        false
    }

    fn seek(&mut self, target: Vec2, dt: f32) {
        let delta = target - self.position;
        match delta.try_normalize() {
            Some(direction) => {
                self.velocity = direction * self.stats.speed;
                self.facing = if self.velocity.x < 0.0 { Facing::Left } else { Facing::Right };
            }
            None => self.velocity = Vec2::ZERO,
        }
        self.position += step(self.velocity, dt);
    }

    pub fn to_save(&self) -> BossSave {
        BossSave {
            id: self.id,
            kind: self.kind,
            position: self.position,
            vitals: self.vitals,
            current_phase: self.current_phase,
        }
    }

    pub fn validate_save(save: &BossSave) -> Result<(), SaveError> {
        let invalid = |reason: &str| {
            Err(SaveError::InvalidEntity {
                kind: "boss",
                reason: reason.to_string(),
            })
        };

        if !save.vitals.is_consistent() {
            return invalid("health out of range");
        }
        if !save.position.is_finite() {
            return invalid("position is not finite");
        }
        if save.current_phase as usize > save.kind.stats().phase_thresholds.len() {
            return invalid("phase out of range");
        }
        Ok(())
    }

    pub fn from_save(save: BossSave) -> Result<Self, SaveError> {
        Self::validate_save(&save)?;

        let mut boss = Boss::new(save.id, save.kind, save.position);
        boss.vitals = save.vitals;
        boss.current_phase = save.current_phase;
        Ok(boss)
    }
}

impl Entity for Boss {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Boss
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> Size {
        BOSS_SIZE
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        if !self.vitals.is_alive() {
            return;
        }

        self.animation.update(ctx.dt);

        if let Some(player) = ctx.player_position {
            self.seek(player, ctx.dt);
            self.position = clamp_to_arena(self.position, BOSS_SIZE, ctx.bounds);

            let ready = self.last_attack.is_none_or(|last| ctx.now - last > BOSS_ATTACK_COOLDOWN);
            if ready && self.position.distance(player) <= self.stats.attack_range {
                ctx.events.push(GameEvent::BossAttack {
                    boss: self.id,
                    origin: self.position,
                    damage: self.stats.damage,
                    range: self.stats.attack_range,
                });
                self.last_attack = Some(ctx.now);
            }
        } else {
            self.velocity = Vec2::ZERO;
        }

        self.check_phase(ctx.events);
    }

    fn render(&self, surface: &mut dyn Surface, sprites: &SpriteSet, debug: bool) {
        if !self.vitals.active {
            return;
        }

        match (sprites.get(EntityKind::Boss), self.animation.current_frame()) {
            (Some(sheet), Some(frame)) => surface.draw_sprite(sheet, frame, self.bounds(), self.facing.is_left()),
            _ => self.render_placeholder(surface, Color::DARK_RED),
        }

        // Bosses get a thicker bar than the rank and file.
        let bar = Rect::new(self.position.x, self.position.y - 15.0, BOSS_SIZE.width, 6.0);
        surface.fill_rect(bar, Color::GRAY);
        surface.fill_rect(Rect { width: bar.width * self.vitals.ratio(), ..bar }, Color::RED);

        if debug {
            surface.draw_text(
                &format!("{} phase {}", self.kind, self.current_phase),
                Vec2::new(self.position.x, self.position.y - 20.0),
                Color::YELLOW,
            );
            surface.stroke_circle(self.bounds().center(), self.stats.attack_range, Color::rgba(255, 0, 0, 77));
        }
    }
}
