//! This module contains the game manager: the single authority over a session.
//!
//! The manager owns every entity collection, the walkability grid, the
//! simulation RNG and the event queue. Entities write events during their
//! tick; the manager resolves them afterwards, then removes whatever died.

pub mod objectives;
pub mod save;
pub mod state;

use std::collections::BTreeMap;
use std::str::FromStr;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;
use thousands::Separable;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::constants;
use crate::entity::boss::{Boss, BossKind, BOSS_SIZE};
use crate::entity::enemy::{Enemy, EnemyKind};
use crate::entity::hero::{AbilityKind, Hero, HeroKind};
use crate::entity::player::Player;
use crate::entity::resource::{Resource, ResourceKind};
use crate::entity::{Entity, EntityId, TickContext};
use crate::error::{GameError, GameResult, SaveError};
use crate::events::{EventQueue, GameEvent, InputAction};
use crate::formatter;
use crate::map::NavGrid;
use crate::render::{Color, Rect, SpriteSet, Surface};
use crate::store::ProgressStore;

use self::objectives::{LevelObjective, DEFEAT_BOSS, KILL_ENEMIES, SURVIVE};
use self::save::{SaveGame, SAVE_VERSION};
use self::state::{GameResources, GameState, GameStats};

/// Radius around a boss in which its reinforcements appear.
const REINFORCEMENT_SPREAD: f32 = 100.0;

type Listener = Box<dyn FnMut(&GameEvent)>;

pub struct GameManager {
    config: GameConfig,
    state: GameState,
    grid: NavGrid,
    rng: SmallRng,
    events: EventQueue,
    listeners: Vec<Listener>,

    player: Option<Player>,
    enemies: BTreeMap<EntityId, Enemy>,
    bosses: BTreeMap<EntityId, Boss>,
    heroes: BTreeMap<EntityId, Hero>,
    pickups: BTreeMap<EntityId, Resource>,

    stats: GameStats,
    resources: GameResources,
    level: u32,
    objectives: Vec<LevelObjective>,

    /// Simulation time in milliseconds; only advances while playing
    clock: f32,
    level_started: f32,
    last_enemy_spawn: f32,
    /// Host timestamp of the previous frame; `None` right after start or resume
    last_frame: Option<f32>,
    next_id: u64,
}

impl GameManager {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let grid = NavGrid::new(config.arena_width, config.arena_height, config.cell_size);

        Self {
            config,
            state: GameState::Loading,
            grid,
            rng,
            events: EventQueue::new(),
            listeners: Vec::new(),
            player: None,
            enemies: BTreeMap::new(),
            bosses: BTreeMap::new(),
            heroes: BTreeMap::new(),
            pickups: BTreeMap::new(),
            stats: GameStats::new(),
            resources: GameResources::default(),
            level: 1,
            objectives: Vec::new(),
            clock: 0.0,
            level_started: 0.0,
            last_enemy_spawn: 0.0,
            last_frame: None,
            next_id: 1,
        }
    }

    /// Registers a collaborator (audio, notifications) that hears every resolved event.
    pub fn on_event(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    // Lifecycle

    /// Leaves `Loading` once assets are in place.
    pub fn enter_menu(&mut self) -> bool {
        if self.state != GameState::Loading {
            warn!(state = %self.state, "Cannot enter menu from current state");
            return false;
        }
        self.state = GameState::Menu;
        true
    }

    /// Abandons a paused or finished session and goes back to the menu.
    pub fn return_to_menu(&mut self) -> bool {
        if !(self.state == GameState::Paused || self.state.is_finished()) {
            warn!(state = %self.state, "Cannot return to menu from current state");
            return false;
        }
        self.clear_session();
        self.state = GameState::Menu;
        true
    }

    fn clear_session(&mut self) {
        self.player = None;
        self.enemies.clear();
        self.bosses.clear();
        self.heroes.clear();
        self.pickups.clear();
        self.events = EventQueue::new();
        self.stats = GameStats::new();
        self.resources = GameResources::default();
        self.level = 1;
        self.objectives.clear();
        self.clock = 0.0;
        self.level_started = 0.0;
        self.last_enemy_spawn = 0.0;
        self.last_frame = None;
    }

    /// Begins a fresh session. Only allowed from `Menu` or `Loading`.
    ///
    /// `now` is the host timestamp in milliseconds, used as the first frame baseline.
    pub fn start_game(&mut self, now: f32) -> bool {
        if !matches!(self.state, GameState::Menu | GameState::Loading) {
            warn!(state = %self.state, "Cannot start game from current state");
            return false;
        }

        self.clear_session();
        let id = self.allocate_id();
        self.player = Some(Player::new(id, constants::PLAYER_START));
        self.load_level(1);

        self.state = GameState::Playing;
        self.last_frame = Some(now);
        info!(seed = ?self.config.seed, "Game started");

        self.events.push(GameEvent::GameStarted { level: self.level });
        self.flush_events();
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        self.state = GameState::Paused;
        debug!("Game paused");
        self.events.push(GameEvent::GamePaused);
        self.flush_events();
        true
    }

    /// Resumes a paused game. The next frame starts a new timing baseline, so no time is made up.
    pub fn resume(&mut self) -> bool {
        if self.state != GameState::Paused {
            return false;
        }
        self.state = GameState::Playing;
        self.last_frame = None;
        debug!("Game resumed");
        self.events.push(GameEvent::GameResumed);
        self.flush_events();
        true
    }

    /// Ends the running session, adding the time bonus to the score.
    pub fn end_game(&mut self, victory: bool) -> bool {
        if !self.state.is_running() {
            return false;
        }

        self.stats.score += self.stats.play_seconds();
        self.state = if victory {
            GameState::Victory
        } else {
            GameState::GameOver
        };
        info!(victory, score = self.stats.score, level = self.level, "Game ended");

        self.events.push(GameEvent::GameEnded {
            victory,
            score: self.stats.score,
        });
        self.flush_events();
        true
    }

    // Frame loop

    /// Runs one host frame: computes the time step from `now`, updates, then draws.
    ///
    /// Returns whether the host should schedule another frame, which is only
    /// the case while playing.
    pub fn run_frame(&mut self, now: f32, surface: &mut dyn Surface, sprites: &SpriteSet) -> bool {
        if self.state != GameState::Playing {
            return false;
        }

        let dt = self.last_frame.map_or(0.0, |last| (now - last).max(0.0));
        self.last_frame = Some(now);

        self.update(dt);
        self.render(surface, sprites);
        self.state == GameState::Playing
    }

    /// Advances the simulation by `dt` milliseconds. Does nothing unless playing.
    pub fn update(&mut self, dt: f32) {
        if self.state != GameState::Playing {
            return;
        }
        let dt = dt.max(0.0);

        formatter::increment_frame();
        self.clock += dt;
        self.stats.play_time += dt;

        self.tick_entities(dt);
        self.collect_pickups();
        self.flush_events();

        self.spawn_on_timer();
        self.update_objectives();
        self.check_game_conditions();
        self.cleanup();
    }

    fn tick_entities(&mut self, dt: f32) {
        let mut ctx = TickContext {
            dt,
            now: self.clock,
            player_position: None,
            grid: &self.grid,
            bounds: self.config.arena_size(),
            rng: &mut self.rng,
            events: &mut self.events,
        };

        if let Some(player) = self.player.as_mut() {
            player.tick(&mut ctx);
        }
        ctx.player_position = self
            .player
            .as_ref()
            .filter(|player| player.is_alive())
            .map(|player| player.position);

        for enemy in self.enemies.values_mut() {
            enemy.tick(&mut ctx);
        }
        for boss in self.bosses.values_mut() {
            boss.tick(&mut ctx);
        }
        for hero in self.heroes.values_mut() {
            hero.tick(&mut ctx);
        }
    }

    fn collect_pickups(&mut self) {
        let Some(player) = self.player.as_ref().filter(|player| player.is_alive()) else {
            return;
        };
        let position = player.position;

        for pickup in self.pickups.values_mut() {
            if !pickup.is_collected() && pickup.position.distance(position) <= constants::PICKUP_RADIUS {
                pickup.collect(&mut self.events);
            }
        }
    }

    /// Resolves queued events until the queue is empty, then tells the listeners.
    fn flush_events(&mut self) {
        while let Some(event) = self.events.pop() {
            self.resolve(&event);
            for listener in self.listeners.iter_mut() {
                listener(&event);
            }
        }
    }

    fn resolve(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::PlayerAttack {
                origin, damage, range, ..
            } => {
                let hit = self.strike(origin, damage, range);
                self.stats.record_shot(hit);
            }
            GameEvent::HeroStrike {
                origin, damage, range, ..
            } => {
                self.strike(origin, damage, range);
            }
            GameEvent::EnemyAttack {
                origin, damage, range, ..
            }
            | GameEvent::BossAttack {
                origin, damage, range, ..
            } => {
                if let Some(player) = self.player.as_mut() {
                    if player.is_alive() && player.position.distance(origin) <= range {
                        player.take_damage(damage, &mut self.events);
                    }
                }
            }
            GameEvent::EnemyDied {
                experience_reward, ..
            } => {
                self.record_kill(constants::KILL_SCORE, false);
                if let Some(player) = self.player.as_mut() {
                    player.gain_experience(experience_reward, &mut self.events);
                }
            }
            GameEvent::BossDied { .. } => self.record_kill(constants::BOSS_KILL_SCORE, true),
            GameEvent::PlayerDied { .. } => self.stats.deaths += 1,
            GameEvent::PlayerLevelUp { level } => {
                self.stats.level = level;
                self.stats.score += constants::LEVEL_UP_SCORE;
            }
            GameEvent::BossPhaseChanged { phase, position, .. } => {
                self.events.push(GameEvent::SpawnReinforcements {
                    origin: position,
                    count: phase,
                    kind: EnemyKind::Soldier,
                });
            }
            GameEvent::SpawnReinforcements { origin, count, kind } => {
                for _ in 0..count {
                    let offset = Vec2::new(
                        (self.rng.random::<f32>() - 0.5) * REINFORCEMENT_SPREAD,
                        (self.rng.random::<f32>() - 0.5) * REINFORCEMENT_SPREAD,
                    );
                    self.spawn_enemy(origin + offset, kind);
                }
            }
            GameEvent::ResourceCollected { kind, amount, .. } => self.apply_pickup(kind, amount),
            _ => {}
        }
    }

    /// Damages every living enemy and boss within `range` of `origin`. Returns whether anything was in range.
    fn strike(&mut self, origin: Vec2, damage: f32, range: f32) -> bool {
        let mut hit = false;
        for enemy in self.enemies.values_mut() {
            if enemy.is_alive() && enemy.position.distance(origin) <= range {
                hit = true;
                enemy.take_damage(damage, &mut self.events);
            }
        }
        for boss in self.bosses.values_mut() {
            if boss.is_alive() && boss.position.distance(origin) <= range {
                hit = true;
                boss.take_damage(damage, &mut self.events);
            }
        }
        hit
    }

    fn record_kill(&mut self, score: u64, boss: bool) {
        self.stats.kills += 1;
        self.stats.score += score;
        if let Some(player) = self.player.as_mut() {
            player.stats.kills += 1;
        }

        for objective in self.objectives.iter_mut() {
            let counts = objective.id == KILL_ENEMIES || (boss && objective.id == DEFEAT_BOSS);
            if counts {
                objective.advance(1);
            }
        }
    }

    fn apply_pickup(&mut self, kind: ResourceKind, amount: u32) {
        match kind {
            ResourceKind::Rice => self.resources.add(amount, 0, 0),
            ResourceKind::Wood => self.resources.add(0, amount, 0),
            ResourceKind::Medals => self.resources.add(0, 0, amount),
            ResourceKind::Health => {
                if let Some(player) = self.player.as_mut() {
                    player.heal(amount as f32, &mut self.events);
                }
            }
            ResourceKind::Ammo => {
                if let Some(player) = self.player.as_mut() {
                    player.refill_ammo();
                }
            }
        }
    }

    fn spawn_on_timer(&mut self) {
        if self.clock - self.last_enemy_spawn <= self.config.enemy_spawn_interval_ms {
            return;
        }
        if self.enemies.len() >= self.config.max_enemies {
            return;
        }

        let position = self.random_spawn_point();
        self.spawn_enemy(position, EnemyKind::Soldier);
        self.last_enemy_spawn = self.clock;
    }

    fn random_spawn_point(&mut self) -> Vec2 {
        let arena = self.config.arena_size();
        let candidate = Vec2::new(
            self.rng.random::<f32>() * arena.x,
            self.rng.random::<f32>() * arena.y,
        );
        self.grid.closest_walkable_position(candidate).unwrap_or(candidate)
    }

    fn update_objectives(&mut self) {
        let seconds = ((self.clock - self.level_started) / 1000.0).floor() as u32;
        for objective in self.objectives.iter_mut().filter(|objective| objective.id == SURVIVE) {
            objective.set_progress(seconds);
        }
    }

    fn check_game_conditions(&mut self) {
        if self.player.as_ref().is_some_and(|player| !player.is_alive()) {
            self.end_game(false);
            return;
        }

        if !self.objectives.is_empty() && self.objectives.iter().all(|objective| objective.completed) {
            self.complete_level();
        }
    }

    fn complete_level(&mut self) {
        let finished = self.level;
        self.stats.score += constants::LEVEL_COMPLETE_SCORE;

        if finished >= self.config.final_level {
            self.end_game(true);
            return;
        }

        self.load_level(finished + 1);
        info!(level = finished, next_level = self.level, "Level completed");
        self.events.push(GameEvent::LevelCompleted {
            level: finished,
            next_level: self.level,
        });
        self.flush_events();
    }

    fn load_level(&mut self, level: u32) {
        self.level = level;
        self.level_started = self.clock;
        self.last_enemy_spawn = self.clock;
        self.objectives = objectives::for_level(level);

        let count = (5 + level).min(constants::MAX_LEVEL_ENEMIES);
        for _ in 0..count {
            let kind = self.enemy_kind_for_level(level);
            let position = self.random_spawn_point();
            self.spawn_enemy(position, kind);
        }

        if objectives::is_boss_level(level) {
            let kinds: Vec<BossKind> = BossKind::iter().collect();
            let kind = kinds[self.rng.random_range(0..kinds.len())];
            let center = self.config.arena_size() / 2.0 - BOSS_SIZE.as_vec2() / 2.0;
            self.spawn_boss(center, kind);
        }

        if level > 2 && self.rng.random::<f32>() < 0.3 {
            let kinds: Vec<HeroKind> = HeroKind::iter().collect();
            let kind = kinds[self.rng.random_range(0..kinds.len())];
            self.spawn_hero(Vec2::new(50.0, 50.0), kind);
        }

        debug!(level, enemies = self.enemies.len(), "Level loaded");
    }

    /// Tougher enemy types join the mix as levels go up.
    fn enemy_kind_for_level(&mut self, level: u32) -> EnemyKind {
        let unlocked = match level {
            0..=1 => 1,
            2 => 2,
            3 => 3,
            _ => 4,
        };
        let kinds = [EnemyKind::Soldier, EnemyKind::Officer, EnemyKind::Sniper, EnemyKind::Heavy];
        kinds[self.rng.random_range(0..unlocked)]
    }

    fn cleanup(&mut self) {
        self.enemies.retain(|_, enemy| enemy.is_alive());
        self.bosses.retain(|_, boss| boss.is_alive());
        self.heroes.retain(|_, hero| hero.is_alive());
        self.pickups.retain(|_, pickup| !pickup.is_collected());
    }

    // Spawning

    pub fn spawn_enemy(&mut self, position: Vec2, kind: EnemyKind) -> EntityId {
        let id = self.allocate_id();
        let enemy = Enemy::new(id, kind, position, &mut self.rng);
        debug!(enemy = %id, %kind, ?position, "Enemy spawned");
        self.enemies.insert(id, enemy);
        id
    }

    pub fn spawn_boss(&mut self, position: Vec2, kind: BossKind) -> EntityId {
        let id = self.allocate_id();
        info!(boss = %id, %kind, "Boss spawned");
        self.bosses.insert(id, Boss::new(id, kind, position));
        id
    }

    pub fn spawn_hero(&mut self, position: Vec2, kind: HeroKind) -> EntityId {
        let id = self.allocate_id();
        info!(hero = %id, %kind, "Hero joined");
        self.heroes.insert(id, Hero::new(id, kind, position));
        id
    }

    pub fn spawn_resource(&mut self, position: Vec2, kind: ResourceKind, amount: u32) -> EntityId {
        let id = self.allocate_id();
        self.pickups.insert(id, Resource::new(id, kind, position, amount));
        id
    }

    // Input

    /// Forwards an input action to the player and any player-controlled hero.
    ///
    /// `pause` toggles pause on press. Unknown actions are ignored; returns whether the action was recognised.
    pub fn handle_input(&mut self, action: &str, pressed: bool) -> bool {
        let Ok(action) = InputAction::from_str(action) else {
            warn!(action, "Ignoring unknown input action");
            return false;
        };

        if action == InputAction::Pause {
            if pressed {
                match self.state {
                    GameState::Playing => self.pause(),
                    GameState::Paused => self.resume(),
                    _ => false,
                };
            }
            return true;
        }

        if let Some(player) = self.player.as_mut() {
            player.set_input(action, pressed);
        }
        for hero in self.heroes.values_mut().filter(|hero| hero.player_controlled) {
            hero.set_input(action, pressed);
        }
        true
    }

    /// Hands input focus to `hero`, or back to the AI when `controlled` is false.
    pub fn set_hero_controlled(&mut self, hero: EntityId, controlled: bool) -> bool {
        match self.heroes.get_mut(&hero) {
            Some(hero) => {
                hero.player_controlled = controlled;
                true
            }
            None => false,
        }
    }

    pub fn use_hero_ability(&mut self, hero: EntityId, ability: AbilityKind) -> bool {
        let now = self.clock;
        let used = match self.heroes.get_mut(&hero) {
            Some(hero) => hero.use_ability(ability, now, &mut self.events),
            None => false,
        };
        self.flush_events();
        used
    }

    // Resource economy

    pub fn add_resources(&mut self, rice: u32, wood: u32, medals: u32) {
        self.resources.add(rice, wood, medals);
    }

    /// Spends all three amounts or none of them.
    pub fn spend_resources(&mut self, rice: u32, wood: u32, medals: u32) -> bool {
        self.resources.spend(rice, wood, medals)
    }

    // Persistence

    pub fn save_game(&self) -> SaveGame {
        SaveGame {
            version: SAVE_VERSION,
            stats: self.stats.clone(),
            resources: self.resources,
            level: self.level,
            objectives: self.objectives.clone(),
            clock: self.clock,
            level_started: self.level_started,
            next_id: self.next_id,
            player: self.player.as_ref().map(Player::to_save),
            enemies: self.enemies.values().map(Enemy::to_save).collect(),
            bosses: self.bosses.values().map(Boss::to_save).collect(),
            heroes: self.heroes.values().map(Hero::to_save).collect(),
            pickups: self.pickups.values().map(Resource::to_save).collect(),
        }
    }

    /// Replaces the whole session with `save`.
    ///
    /// Everything is validated and rebuilt before live state is touched; on
    /// error the running session is left exactly as it was.
    pub fn load_game(&mut self, save: SaveGame) -> Result<(), SaveError> {
        if let Err(error) = save.validate() {
            warn!(%error, "Rejected save data");
            return Err(error);
        }

        let next_id = save
            .ids()
            .map(|id| id.0.saturating_add(1))
            .max()
            .unwrap_or(1)
            .max(save.next_id);
        let player = save.player.map(Player::from_save).transpose()?;
        let enemies = save
            .enemies
            .into_iter()
            .map(|data| Enemy::from_save(data).map(|enemy| (enemy.id(), enemy)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        let bosses = save
            .bosses
            .into_iter()
            .map(|data| Boss::from_save(data).map(|boss| (boss.id(), boss)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        let heroes = save
            .heroes
            .into_iter()
            .map(|data| Hero::from_save(data).map(|hero| (hero.id(), hero)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        let pickups = save
            .pickups
            .into_iter()
            .map(|data| Resource::from_save(data).map(|pickup| (pickup.id(), pickup)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        self.player = player;
        self.enemies = enemies;
        self.bosses = bosses;
        self.heroes = heroes;
        self.pickups = pickups;
        self.stats = save.stats;
        self.resources = save.resources;
        self.level = save.level;
        self.objectives = save.objectives;
        self.clock = save.clock;
        self.level_started = save.level_started;
        self.last_enemy_spawn = save.clock;
        self.next_id = next_id;
        self.events = EventQueue::new();
        self.last_frame = None;

        if !self.state.is_running() {
            self.state = GameState::Paused;
        }
        info!(level = self.level, enemies = self.enemies.len(), "Save loaded");
        Ok(())
    }

    pub fn save_json(&self) -> Result<String, SaveError> {
        self.save_game().to_json()
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), SaveError> {
        let save: SaveGame = serde_json::from_str(json)?;
        self.load_game(save)
    }

    /// Resumes `player_id`'s stored session. Returns `false` when nothing was stored.
    pub fn resume_from(&mut self, store: &dyn ProgressStore, player_id: &str) -> GameResult<bool> {
        let Some(save) = store.load_progress(player_id)? else {
            return Ok(false);
        };
        self.load_game(save)?;
        Ok(true)
    }

    /// Stores a running session under `player_id`, or clears the stored one once the session has ended.
    pub fn persist(&self, store: &mut dyn ProgressStore, player_id: &str) -> GameResult<()> {
        match self.state {
            state if state.is_running() => store.save_progress(player_id, &self.save_game())?,
            state if state.is_finished() => store.reset_progress(player_id)?,
            state => return Err(GameError::InvalidState(format!("no session to persist while {state}"))),
        }
        Ok(())
    }

    // Rendering

    /// Draws the arena, every entity and the HUD. Reads state only.
    pub fn render(&self, surface: &mut dyn Surface, sprites: &SpriteSet) {
        let arena = self.config.arena_size();
        let debug = self.config.debug;

        surface.clear(Color::BLACK);
        surface.fill_rect(Rect::new(0.0, 0.0, arena.x, arena.y), Color::FOREST);

        if debug {
            for cell in self.grid.debug_cells().into_iter().filter(|cell| !cell.walkable) {
                let size = self.grid.cell_size();
                surface.fill_rect(Rect::new(cell.origin.x, cell.origin.y, size, size), Color::GRAY);
            }
        }

        for pickup in self.pickups.values() {
            pickup.render(surface, sprites, debug);
        }
        for hero in self.heroes.values() {
            hero.render(surface, sprites, debug);
        }
        for enemy in self.enemies.values() {
            enemy.render(surface, sprites, debug);
        }
        for boss in self.bosses.values() {
            boss.render(surface, sprites, debug);
        }
        if let Some(player) = &self.player {
            player.render(surface, sprites, debug);
        }

        self.render_hud(surface);
    }

    fn render_hud(&self, surface: &mut dyn Surface) {
        let arena = self.config.arena_size();

        if let Some(player) = &self.player {
            let bar = Rect::new(20.0, 20.0, 200.0, 20.0);
            let ratio = player.vitals.ratio();
            surface.fill_rect(bar, Color::rgb(51, 51, 51));
            surface.fill_rect(
                Rect { width: bar.width * ratio, ..bar },
                if ratio > 0.5 { Color::GREEN } else { Color::RED },
            );
            surface.stroke_rect(bar, Color::WHITE);
            surface.draw_text(
                &format!("Health: {}/{}", player.vitals.health.ceil(), player.vitals.max_health),
                Vec2::new(bar.x, bar.y - 5.0),
                Color::WHITE,
            );
            surface.draw_text(
                &format!("Ammo: {}/{}", player.weapon.ammo, player.weapon.max_ammo),
                Vec2::new(bar.x, bar.y + 40.0),
                Color::WHITE,
            );
        }

        let right = arena.x - 200.0;
        let ledger = [
            format!("Rice: {}", self.resources.rice),
            format!("Wood: {}", self.resources.wood),
            format!("Medals: {}", self.resources.medals),
        ];
        for (row, line) in ledger.iter().enumerate() {
            surface.draw_text(line, Vec2::new(right, 20.0 + row as f32 * 20.0), Color::WHITE);
        }

        let mut y = 80.0;
        surface.draw_text("Objectives:", Vec2::new(20.0, y), Color::WHITE);
        for objective in &self.objectives {
            y += 15.0;
            let color = if objective.completed { Color::GREEN } else { Color::WHITE };
            surface.draw_text(
                &format!("{} ({}/{})", objective.description, objective.current, objective.target),
                Vec2::new(20.0, y),
                color,
            );
        }

        let stats = [
            format!("Score: {}", self.stats.score.separate_with_commas()),
            format!("Kills: {}", self.stats.kills),
            format!("Level: {}", self.level),
            format!("Time: {}s", self.stats.play_seconds()),
        ];
        for (row, line) in stats.iter().enumerate() {
            surface.draw_text(line, Vec2::new(right, 100.0 + row as f32 * 15.0), Color::WHITE);
        }

        let banner = match self.state {
            GameState::Paused => Some("PAUSED"),
            GameState::GameOver => Some("GAME OVER"),
            GameState::Victory => Some("VICTORY"),
            _ => None,
        };
        if let Some(banner) = banner {
            surface.fill_rect(Rect::new(0.0, 0.0, arena.x, arena.y), Color::OVERLAY);
            surface.draw_text(banner, arena / 2.0, Color::YELLOW);
        }
    }

    // Accessors

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn resources(&self) -> GameResources {
        self.resources
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn objectives(&self) -> &[LevelObjective] {
        &self.objectives
    }

    /// Simulation time in milliseconds.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut NavGrid {
        &mut self.grid
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    pub fn bosses(&self) -> impl Iterator<Item = &Boss> {
        self.bosses.values()
    }

    pub fn boss_mut(&mut self, id: EntityId) -> Option<&mut Boss> {
        self.bosses.get_mut(&id)
    }

    pub fn heroes(&self) -> impl Iterator<Item = &Hero> {
        self.heroes.values()
    }

    pub fn hero_mut(&mut self, id: EntityId) -> Option<&mut Hero> {
        self.heroes.get_mut(&id)
    }

    pub fn pickups(&self) -> impl Iterator<Item = &Resource> {
        self.pickups.values()
    }
}
