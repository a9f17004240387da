//! The player-controlled soldier.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::animation::AnimationPlayer;
use crate::constants::{self, animations};
use crate::entity::{clamp_to_arena, step, Entity, EntityId, EntityKind, Facing, Size, TickContext, Vitals};
use crate::error::SaveError;
use crate::events::{EventQueue, GameEvent, InputAction, InputFlags};
use crate::render::{Color, SpriteSet, Surface};

pub const PLAYER_SIZE: Size = Size::new(32.0, 48.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub damage: f32,
    pub speed: f32,
    pub accuracy: f32,
    pub kills: u32,
    pub deaths: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            experience_to_next: constants::PLAYER_EXPERIENCE_TO_NEXT,
            damage: constants::PLAYER_DAMAGE,
            speed: constants::PLAYER_SPEED,
            accuracy: constants::PLAYER_ACCURACY,
            kills: 0,
            deaths: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub damage: f32,
    /// Minimum milliseconds between shots while the trigger is held
    pub fire_rate: f32,
    pub range: f32,
    pub ammo: u32,
    pub max_ammo: u32,
    /// Milliseconds a reload takes
    pub reload_time: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            name: "rifle".to_string(),
            damage: constants::PLAYER_DAMAGE,
            fire_rate: 300.0,
            range: 200.0,
            ammo: 30,
            max_ammo: 30,
            reload_time: 2000.0,
        }
    }
}

/// Snapshot of a player as stored in a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSave {
    pub id: EntityId,
    pub position: Vec2,
    pub vitals: Vitals,
    pub stats: PlayerStats,
    pub weapon: Weapon,
    pub facing: Facing,
}

#[derive(Debug, Clone)]
pub struct Player {
    id: EntityId,
    pub position: Vec2,
    pub vitals: Vitals,
    pub stats: PlayerStats,
    pub weapon: Weapon,
    pub velocity: Vec2,
    pub facing: Facing,
    moving: bool,
    attacking: bool,
    reloading: bool,
    reload_started: f32,
    last_attack: Option<f32>,
    input: InputFlags,
    animation: AnimationPlayer,
}

impl Player {
    pub fn new(id: EntityId, position: Vec2) -> Self {
        let mut animation = AnimationPlayer::with_defaults();
        animation.play(animations::PLAYER_IDLE, false);

        Self {
            id,
            position,
            vitals: Vitals::new(constants::PLAYER_HEALTH),
            stats: PlayerStats::default(),
            weapon: Weapon::default(),
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            moving: false,
            attacking: false,
            reloading: false,
            reload_started: 0.0,
            last_attack: None,
            input: InputFlags::empty(),
            animation,
        }
    }

    pub fn set_input(&mut self, action: InputAction, pressed: bool) {
        self.input.apply(action, pressed);
    }

    pub fn input(&self) -> InputFlags {
        self.input
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    pub fn is_defending(&self) -> bool {
        self.input.contains(InputFlags::DEFEND)
    }

    pub fn animation(&self) -> &AnimationPlayer {
        &self.animation
    }

    /// Fires one round.
    ///
    /// Rejected while reloading, defending or out of ammo; a rejected shot
    /// leaves ammo and animation untouched.
    pub fn attack(&mut self, now: f32, events: &mut EventQueue) -> bool {
        if !self.vitals.is_alive() || self.reloading || self.is_defending() || self.weapon.ammo == 0 {
            return false;
        }

        self.weapon.ammo -= 1;
        self.attacking = true;
        self.last_attack = Some(now);
        self.animation.play(animations::PLAYER_ATTACK, true);

        events.push(GameEvent::PlayerAttack {
            origin: self.position,
            facing: self.facing,
            damage: self.weapon.damage,
            range: self.weapon.range,
        });
        true
    }

    /// Begins a reload. Rejected when one is already running or the magazine is full.
    pub fn start_reload(&mut self, now: f32, events: &mut EventQueue) -> bool {
        if self.reloading || self.weapon.ammo >= self.weapon.max_ammo {
            return false;
        }

        self.reloading = true;
        self.reload_started = now;
        debug!(reload_time = self.weapon.reload_time, "Reload started");
        events.push(GameEvent::PlayerReloadStarted {
            reload_time: self.weapon.reload_time,
        });
        true
    }

    fn finish_reload(&mut self, events: &mut EventQueue) {
        self.weapon.ammo = self.weapon.max_ammo;
        self.reloading = false;
        events.push(GameEvent::PlayerReloadFinished);
    }

    /// Fills the magazine without a reload delay.
    pub fn refill_ammo(&mut self) {
        self.weapon.ammo = self.weapon.max_ammo;
    }

    /// Applies `amount` damage, halved while defending. Returns `true` on the killing hit.
    pub fn take_damage(&mut self, amount: f32, events: &mut EventQueue) -> bool {
        if !self.vitals.is_alive() {
            return false;
        }

        let amount = if self.is_defending() { amount / 2.0 } else { amount };
        if self.vitals.damage(amount) {
            self.stats.deaths += 1;
            self.velocity = Vec2::ZERO;
            self.animation.play(animations::PLAYER_DEATH, true);
            info!(position = ?self.position, "Player died");
            events.push(GameEvent::PlayerDied {
                position: self.position,
            });
            return true;
        }

        events.push(GameEvent::PlayerDamaged {
            damage: amount,
            health: self.vitals.health,
        });
        false
    }

    /// Restores health and returns how much was applied.
    pub fn heal(&mut self, amount: f32, events: &mut EventQueue) -> f32 {
        let applied = self.vitals.heal(amount);
        if applied > 0.0 {
            events.push(GameEvent::PlayerHealed {
                amount: applied,
                health: self.vitals.health,
            });
        }
        applied
    }

    /// Adds experience, applying every level-up it crosses. Returns the number of levels gained.
    ///
    /// A dead player earns nothing, so a kill resolved after the killing blow cannot refill health.
    pub fn gain_experience(&mut self, amount: u32, events: &mut EventQueue) -> u32 {
        if !self.vitals.is_alive() {
            return 0;
        }
        self.stats.experience = self.stats.experience.saturating_add(amount);

        let mut gained = 0;
        while self.stats.experience >= self.stats.experience_to_next {
            self.level_up(events);
            gained += 1;
        }
        gained
    }

    fn level_up(&mut self, events: &mut EventQueue) {
        self.stats.experience -= self.stats.experience_to_next;
        self.stats.level += 1;
        self.stats.experience_to_next =
            ((self.stats.experience_to_next as f32 * constants::EXPERIENCE_GROWTH).floor() as u32).max(1);

        self.vitals.max_health += 10.0;
        self.stats.damage += 2.0;
        self.weapon.damage += 2.0;
        self.stats.speed += 0.2;
        self.vitals.health = self.vitals.max_health;

        info!(level = self.stats.level, "Player levelled up");
        events.push(GameEvent::PlayerLevelUp { level: self.stats.level });
    }

    fn update_movement(&mut self) {
        self.velocity = self.input.movement(self.stats.speed);
        self.facing = self.facing.from_dx(self.velocity.x);
        self.moving = self.velocity != Vec2::ZERO;
    }

    fn update_combat(&mut self, now: f32, events: &mut EventQueue) {
        if self.input.contains(InputFlags::ATTACK) && !self.reloading {
            let ready = self.last_attack.is_none_or(|last| now - last >= self.weapon.fire_rate);
            if ready && self.weapon.ammo > 0 {
                self.attack(now, events);
            }
        }

        if self.input.contains(InputFlags::RELOAD) {
            self.start_reload(now, events);
        }

        if self.reloading && now - self.reload_started >= self.weapon.reload_time {
            self.finish_reload(events);
        }
    }

    fn update_animation(&mut self, dt: f32) {
        self.animation.update(dt);

        // The attack strip does not loop; once it has run out the shot is over.
        if self.attacking && !self.animation.is_playing(Some(animations::PLAYER_ATTACK)) {
            self.attacking = false;
        }

        let wanted = if self.attacking {
            animations::PLAYER_ATTACK
        } else if self.moving {
            animations::PLAYER_WALK
        } else {
            animations::PLAYER_IDLE
        };
        if !self.animation.is_playing(Some(wanted)) {
            self.animation.play(wanted, false);
        }
    }

    pub fn to_save(&self) -> PlayerSave {
        PlayerSave {
            id: self.id,
            position: self.position,
            vitals: self.vitals,
            stats: self.stats.clone(),
            weapon: self.weapon.clone(),
            facing: self.facing,
        }
    }

    pub fn validate_save(save: &PlayerSave) -> Result<(), SaveError> {
        let invalid = |reason: &str| {
            Err(SaveError::InvalidEntity {
                kind: "player",
                reason: reason.to_string(),
            })
        };

        if !save.vitals.is_consistent() {
            return invalid("health out of range");
        }
        if !save.position.is_finite() {
            return invalid("position is not finite");
        }
        if save.stats.level == 0 || save.stats.experience_to_next == 0 {
            return invalid("level data out of range");
        }
        if save.weapon.ammo > save.weapon.max_ammo {
            return invalid("ammo exceeds magazine size");
        }
        Ok(())
    }

    pub fn from_save(save: PlayerSave) -> Result<Self, SaveError> {
        Self::validate_save(&save)?;

        let mut player = Player::new(save.id, save.position);
        player.vitals = save.vitals;
        player.stats = save.stats;
        player.weapon = save.weapon;
        player.facing = save.facing;
        Ok(player)
    }
}

impl Entity for Player {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> Size {
        PLAYER_SIZE
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        if !self.vitals.is_alive() {
            return;
        }

        self.update_movement();
        self.update_combat(ctx.now, ctx.events);
        self.update_animation(ctx.dt);

        self.position += step(self.velocity, ctx.dt);
        self.position = clamp_to_arena(self.position, PLAYER_SIZE, ctx.bounds);
    }

    fn render(&self, surface: &mut dyn Surface, sprites: &SpriteSet, debug: bool) {
        if !self.vitals.active {
            return;
        }

        match (sprites.get(EntityKind::Player), self.animation.current_frame()) {
            (Some(sheet), Some(frame)) => surface.draw_sprite(sheet, frame, self.bounds(), self.facing.is_left()),
            _ => self.render_placeholder(surface, Color::OLIVE),
        }
        self.render_health_bar(surface);

        if debug {
            let x = self.position.x;
            let y = self.position.y;
            surface.draw_text(
                &format!("HP: {}/{}", self.vitals.health, self.vitals.max_health),
                Vec2::new(x, y - 15.0),
                Color::WHITE,
            );
            surface.draw_text(
                &format!("Ammo: {}/{}", self.weapon.ammo, self.weapon.max_ammo),
                Vec2::new(x, y - 30.0),
                Color::WHITE,
            );
            surface.draw_text(&format!("Level: {}", self.stats.level), Vec2::new(x, y - 45.0), Color::WHITE);
        }
    }
}
