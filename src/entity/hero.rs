//! Allied heroes: companions that follow the player and fire abilities on their own.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;

use crate::animation::AnimationPlayer;
use crate::constants::animations;
use crate::entity::{clamp_to_arena, step, Entity, EntityId, EntityKind, Facing, Size, TickContext, Vitals};
use crate::error::SaveError;
use crate::events::{EventQueue, GameEvent, InputAction, InputFlags};
use crate::render::{Color, SpriteSet, Surface};

pub const HERO_SIZE: Size = Size::new(32.0, 48.0);

/// Distance at which a following hero stops closing in.
pub const FOLLOW_DISTANCE: f32 = 50.0;
const WANDER_REACH: f32 = 10.0;
const WANDER_RANGE: f32 = 100.0;
const MORALE_DECAY: f32 = 0.01;
const LOYALTY_DECAY: f32 = 0.005;
const REGEN_INTERVAL: f32 = 2000.0;
const REGEN_AMOUNT: f32 = 5.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HeroKind {
    Medic,
    Sniper,
    Engineer,
    Commander,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    #[strum(serialize = "Heal")]
    Heal,
    #[strum(serialize = "First Aid Kit")]
    FirstAidKit,
    #[strum(serialize = "Medical Training")]
    MedicalTraining,
    #[strum(serialize = "Precision Shot")]
    PrecisionShot,
    #[strum(serialize = "Overwatch")]
    Overwatch,
    #[strum(serialize = "Camouflage")]
    Camouflage,
    #[strum(serialize = "Build Turret")]
    BuildTurret,
    #[strum(serialize = "Repair")]
    Repair,
    #[strum(serialize = "Explosive Trap")]
    ExplosiveTrap,
    #[strum(serialize = "Rally")]
    Rally,
    #[strum(serialize = "Tactical Strike")]
    TacticalStrike,
    #[strum(serialize = "Leadership")]
    Leadership,
}

impl AbilityKind {
    /// Passive abilities are always in effect and can never be triggered.
    pub fn is_passive(self) -> bool {
        matches!(self, AbilityKind::MedicalTraining | AbilityKind::Leadership)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub kind: AbilityKind,
    /// Milliseconds between uses
    pub cooldown: f32,
    pub last_used: Option<f32>,
}

impl Ability {
    fn new(kind: AbilityKind, cooldown: f32) -> Self {
        Self {
            kind,
            cooldown,
            last_used: None,
        }
    }

    pub fn is_ready(&self, now: f32) -> bool {
        !self.kind.is_passive() && self.last_used.is_none_or(|last| now - last >= self.cooldown)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroStats {
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub experience_reward: u32,
}

impl HeroKind {
    pub fn stats(self) -> HeroStats {
        let (max_health, damage, speed, experience_reward) = match self {
            HeroKind::Medic => (80.0, 15.0, 2.5, 50),
            HeroKind::Sniper => (60.0, 40.0, 2.0, 40),
            HeroKind::Engineer => (90.0, 20.0, 2.0, 45),
            HeroKind::Commander => (100.0, 25.0, 2.2, 60),
        };
        HeroStats {
            max_health,
            damage,
            speed,
            experience_reward,
        }
    }

    pub fn abilities(self) -> SmallVec<[Ability; 3]> {
        use AbilityKind::*;
        match self {
            HeroKind::Medic => smallvec![
                Ability::new(Heal, 3000.0),
                Ability::new(FirstAidKit, 8000.0),
                Ability::new(MedicalTraining, 0.0),
            ],
            HeroKind::Sniper => smallvec![
                Ability::new(PrecisionShot, 5000.0),
                Ability::new(Overwatch, 10000.0),
                Ability::new(Camouflage, 15000.0),
            ],
            HeroKind::Engineer => smallvec![
                Ability::new(BuildTurret, 12000.0),
                Ability::new(Repair, 5000.0),
                Ability::new(ExplosiveTrap, 8000.0),
            ],
            HeroKind::Commander => smallvec![
                Ability::new(Rally, 15000.0),
                Ability::new(TacticalStrike, 20000.0),
                Ability::new(Leadership, 0.0),
            ],
        }
    }

    fn tint(self) -> Color {
        match self {
            HeroKind::Medic => Color::rgb(0, 255, 136),
            HeroKind::Sniper => Color::rgb(136, 136, 255),
            HeroKind::Engineer => Color::rgb(255, 170, 0),
            HeroKind::Commander => Color::ORANGE,
        }
    }
}

/// Snapshot of a hero as stored in a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSave {
    pub id: EntityId,
    pub kind: HeroKind,
    pub position: Vec2,
    pub vitals: Vitals,
    pub abilities: SmallVec<[Ability; 3]>,
    pub player_controlled: bool,
    pub loyalty: f32,
    pub morale: f32,
    pub facing: Facing,
}

#[derive(Debug, Clone)]
pub struct Hero {
    id: EntityId,
    kind: HeroKind,
    pub position: Vec2,
    pub vitals: Vitals,
    pub stats: HeroStats,
    pub abilities: SmallVec<[Ability; 3]>,
    /// Driven by player input instead of the follow AI
    pub player_controlled: bool,
    /// `[0, 100]`
    pub loyalty: f32,
    /// `[0, 100]`; scales incoming damage
    pub morale: f32,
    pub velocity: Vec2,
    pub facing: Facing,
    moving: bool,
    target: Option<Vec2>,
    following: bool,
    input: InputFlags,
    last_regen: Option<f32>,
    animation: AnimationPlayer,
}

impl Hero {
    pub fn new(id: EntityId, kind: HeroKind, position: Vec2) -> Self {
        let stats = kind.stats();
        let mut animation = AnimationPlayer::with_defaults();
        animation.play(animations::PLAYER_IDLE, false);

        Self {
            id,
            kind,
            position,
            vitals: Vitals::new(stats.max_health),
            stats,
            abilities: kind.abilities(),
            player_controlled: false,
            loyalty: 100.0,
            morale: 100.0,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            moving: false,
            target: None,
            following: false,
            input: InputFlags::empty(),
            last_regen: None,
            animation,
        }
    }

    pub fn hero_kind(&self) -> HeroKind {
        self.kind
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    pub fn ability(&self, kind: AbilityKind) -> Option<&Ability> {
        self.abilities.iter().find(|ability| ability.kind == kind)
    }

    pub fn set_input(&mut self, action: InputAction, pressed: bool) {
        self.input.apply(action, pressed);
    }

    /// Triggers `kind` if this hero has it and it is off cooldown.
    pub fn use_ability(&mut self, kind: AbilityKind, now: f32, events: &mut EventQueue) -> bool {
        let Some(ability) = self.abilities.iter_mut().find(|ability| ability.kind == kind) else {
            return false;
        };
        if !ability.is_ready(now) {
            return false;
        }
        ability.last_used = Some(now);

        debug!(hero = %self.id, ability = %kind, "Hero used ability");
        events.push(GameEvent::HeroAbilityUsed {
            hero: self.id,
            kind: self.kind,
            ability: kind,
            position: self.position,
        });

        match kind {
            AbilityKind::Heal => {
                self.heal(30.0, events);
            }
            AbilityKind::FirstAidKit => {
                self.heal(50.0, events);
            }
            AbilityKind::PrecisionShot => events.push(GameEvent::HeroStrike {
                hero: self.id,
                origin: self.position,
                damage: self.stats.damage * 2.0,
                range: 300.0,
            }),
            AbilityKind::TacticalStrike => events.push(GameEvent::HeroStrike {
                hero: self.id,
                origin: self.position,
                damage: 50.0,
                range: 150.0,
            }),
            AbilityKind::Rally => self.morale = (self.morale + 30.0).min(100.0),
            _ => {}
        }
        true
    }

    fn should_use(&self, kind: AbilityKind, rng: &mut impl Rng) -> bool {
        match kind {
            AbilityKind::Heal | AbilityKind::FirstAidKit => self.vitals.health < self.vitals.max_health * 0.7,
            AbilityKind::PrecisionShot => rng.random::<f32>() < 0.1,
            AbilityKind::BuildTurret => rng.random::<f32>() < 0.05,
            AbilityKind::Rally => self.morale < 70.0,
            kind if kind.is_passive() => false,
            _ => rng.random::<f32>() < 0.08,
        }
    }

    fn consider_abilities(&mut self, now: f32, rng: &mut impl Rng, events: &mut EventQueue) {
        for index in 0..self.abilities.len() {
            let ability = &self.abilities[index];
            if !ability.is_ready(now) {
                continue;
            }
            let kind = ability.kind;
            if self.should_use(kind, rng) {
                self.use_ability(kind, now, events);
            }
        }
    }

    /// Applies damage scaled by morale: `damage * (2 - morale / 100)`. Returns `true` on the killing hit.
    pub fn take_damage(&mut self, amount: f32, events: &mut EventQueue) -> bool {
        if !self.vitals.is_alive() {
            return false;
        }

        let actual = amount * (2.0 - self.morale / 100.0);
        self.morale = (self.morale - 5.0).max(0.0);

        if self.vitals.damage(actual) {
            self.velocity = Vec2::ZERO;
            debug!(hero = %self.id, kind = %self.kind, "Hero died");
            events.push(GameEvent::HeroDied {
                hero: self.id,
                kind: self.kind,
                position: self.position,
            });
            return true;
        }

        events.push(GameEvent::HeroDamaged {
            hero: self.id,
            damage: actual,
            health: self.vitals.health,
        });
        false
    }

    /// Restores health and lifts morale a little. Returns the health actually restored.
    pub fn heal(&mut self, amount: f32, events: &mut EventQueue) -> f32 {
        if !self.vitals.is_alive() {
            return 0.0;
        }
        let applied = self.vitals.heal(amount);
        self.morale = (self.morale + 2.0).min(100.0);
        events.push(GameEvent::HeroHealed {
            hero: self.id,
            amount: applied,
            health: self.vitals.health,
        });
        applied
    }

    fn move_towards(&mut self, target: Vec2) {
        let delta = target - self.position;
        if let Some(direction) = delta.try_normalize() {
            self.velocity = direction * self.stats.speed;
            self.facing = if delta.x > 0.0 { Facing::Right } else { Facing::Left };
            self.moving = true;
        }
    }

    fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.moving = false;
    }

    fn update_ai_movement(&mut self, rng: &mut impl Rng) {
        match self.target {
            Some(target) if self.following => {
                if self.position.distance(target) > FOLLOW_DISTANCE {
                    self.move_towards(target);
                } else {
                    self.halt();
                }
            }
            Some(target) => {
                if self.position.distance(target) > WANDER_REACH {
                    self.move_towards(target);
                } else {
                    self.target = None;
                    self.halt();
                }
            }
            None => {
                if rng.random::<f32>() < 0.01 {
                    self.target = Some(
                        self.position
                            + Vec2::new(
                                (rng.random::<f32>() - 0.5) * WANDER_RANGE,
                                (rng.random::<f32>() - 0.5) * WANDER_RANGE,
                            ),
                    );
                }
            }
        }
    }

    fn update_passives(&mut self, now: f32) {
        self.morale = (self.morale - MORALE_DECAY).max(0.0);
        self.loyalty = (self.loyalty - LOYALTY_DECAY).max(0.0);

        if self.kind == HeroKind::Medic && self.vitals.health < self.vitals.max_health {
            let due = self.last_regen.is_none_or(|last| now - last > REGEN_INTERVAL);
            if due {
                self.vitals.heal(REGEN_AMOUNT);
                self.last_regen = Some(now);
            }
        }
    }

    pub fn to_save(&self) -> HeroSave {
        HeroSave {
            id: self.id,
            kind: self.kind,
            position: self.position,
            vitals: self.vitals,
            abilities: self.abilities.clone(),
            player_controlled: self.player_controlled,
            loyalty: self.loyalty,
            morale: self.morale,
            facing: self.facing,
        }
    }

    pub fn validate_save(save: &HeroSave) -> Result<(), SaveError> {
        let invalid = |reason: &str| {
            Err(SaveError::InvalidEntity {
                kind: "hero",
                reason: reason.to_string(),
            })
        };

        if !save.vitals.is_consistent() {
            return invalid("health out of range");
        }
        if !save.position.is_finite() {
            return invalid("position is not finite");
        }
        if !(0.0..=100.0).contains(&save.morale) || !(0.0..=100.0).contains(&save.loyalty) {
            return invalid("morale or loyalty out of range");
        }
        let expected = save.kind.abilities();
        let matches = expected.len() == save.abilities.len()
            && expected.iter().zip(&save.abilities).all(|(a, b)| a.kind == b.kind);
        if !matches {
            return invalid("ability list does not match hero type");
        }
        Ok(())
    }

    pub fn from_save(save: HeroSave) -> Result<Self, SaveError> {
        Self::validate_save(&save)?;

        let mut hero = Hero::new(save.id, save.kind, save.position);
        hero.vitals = save.vitals;
        hero.abilities = save.abilities;
        hero.player_controlled = save.player_controlled;
        hero.loyalty = save.loyalty;
        hero.morale = save.morale;
        hero.facing = save.facing;
        Ok(hero)
    }
}

impl Entity for Hero {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Hero
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> Size {
        HERO_SIZE
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        if !self.vitals.is_alive() {
            return;
        }

        if self.player_controlled {
            self.velocity = self.input.movement(self.stats.speed);
            self.facing = self.facing.from_dx(self.velocity.x);
            self.moving = self.velocity != Vec2::ZERO;
        } else {
            match ctx.player_position {
                Some(player) => {
                    self.target = Some(player);
                    self.following = true;
                }
                None if self.following => {
                    self.target = None;
                    self.following = false;
                }
                None => {}
            }
            self.update_ai_movement(ctx.rng);
        }

        self.consider_abilities(ctx.now, ctx.rng, ctx.events);

        self.animation.update(ctx.dt);
        let wanted = if self.moving {
            animations::PLAYER_WALK
        } else {
            animations::PLAYER_IDLE
        };
        if !self.animation.is_playing(Some(wanted)) {
            self.animation.play(wanted, false);
        }

        self.update_passives(ctx.now);

        self.position += step(self.velocity, ctx.dt);
        self.position = clamp_to_arena(self.position, HERO_SIZE, ctx.bounds);
    }

    fn render(&self, surface: &mut dyn Surface, sprites: &SpriteSet, _debug: bool) {
        if !self.vitals.active {
            return;
        }

        let tint = self.kind.tint();
        match (sprites.get(EntityKind::Hero), self.animation.current_frame()) {
            (Some(sheet), Some(frame)) => surface.draw_sprite(sheet, frame, self.bounds(), self.facing.is_left()),
            _ => self.render_placeholder(surface, tint),
        }
        self.render_health_bar(surface);

        let label = self.kind.as_ref()[..1].to_uppercase();
        surface.draw_text(&label, Vec2::new(self.position.x, self.position.y - 12.0), tint);
        if self.morale < 50.0 {
            surface.draw_text(
                "!",
                Vec2::new(self.position.x + HERO_SIZE.width - 8.0, self.position.y - 12.0),
                Color::RED,
            );
        }
    }
}
