mod common;

use common::Harness;
use glam::Vec2;
use jungle_ops::constants::{animations, ARENA_SIZE};
use jungle_ops::entity::player::{Player, PLAYER_SIZE};
use jungle_ops::entity::{Entity, EntityId};
use jungle_ops::events::{EventQueue, GameEvent, InputAction};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

fn player() -> Player {
    Player::new(EntityId(1), Vec2::new(100.0, 100.0))
}

#[test]
fn test_attack_without_ammo_is_rejected() {
    let mut player = player();
    let mut events = EventQueue::new();
    player.weapon.ammo = 0;

    assert_that(&player.attack(0.0, &mut events)).is_false();
    assert_eq!(player.weapon.ammo, 0);
    assert_that(&player.is_attacking()).is_false();
    assert_eq!(player.animation().current_name(), Some(animations::PLAYER_IDLE));
    assert_that(&events.is_empty()).is_true();
}

#[test]
fn test_attack_spends_ammo_and_emits_event() {
    let mut player = player();
    let mut events = EventQueue::new();

    assert_that(&player.attack(0.0, &mut events)).is_true();
    assert_eq!(player.weapon.ammo, 29);
    assert_eq!(player.animation().current_name(), Some(animations::PLAYER_ATTACK));
    assert_eq!(
        events.pop(),
        Some(GameEvent::PlayerAttack {
            origin: Vec2::new(100.0, 100.0),
            facing: player.facing,
            damage: 25.0,
            range: 200.0,
        })
    );
}

#[test]
fn test_reload_lifecycle() {
    let mut harness = Harness::new();
    let mut player = player();

    // A full magazine cannot be reloaded.
    assert_that(&player.start_reload(0.0, &mut harness.events)).is_false();

    player.attack(0.0, &mut harness.events);
    assert_that(&player.start_reload(0.0, &mut harness.events)).is_true();
    assert_that(&player.start_reload(0.0, &mut harness.events)).is_false();
    assert_that(&player.attack(10.0, &mut harness.events)).is_false();

    player.tick(&mut harness.step(1000.0, None));
    assert_that(&player.is_reloading()).is_true();

    player.tick(&mut harness.step(1000.0, None));
    assert_that(&player.is_reloading()).is_false();
    assert_eq!(player.weapon.ammo, player.weapon.max_ammo);
    assert_that(&harness.drain().contains(&GameEvent::PlayerReloadFinished)).is_true();
}

#[test]
fn test_held_trigger_respects_fire_rate() {
    let mut harness = Harness::new();
    let mut player = player();
    player.set_input(InputAction::Attack, true);

    for _ in 0..10 {
        player.tick(&mut harness.frame(None));
    }

    // 10 frames is ~167 ms, below the 300 ms fire rate.
    let shots = harness
        .drain()
        .into_iter()
        .filter(|event| matches!(event, GameEvent::PlayerAttack { .. }))
        .count();
    assert_eq!(shots, 1);
    assert_eq!(player.weapon.ammo, 29);
}

#[test]
fn test_defending_halves_damage_and_blocks_fire() {
    let mut player = player();
    let mut events = EventQueue::new();
    player.set_input(InputAction::Defend, true);

    assert_that(&player.attack(0.0, &mut events)).is_false();
    player.take_damage(20.0, &mut events);
    assert_eq!(player.vitals.health, 90.0);

    player.set_input(InputAction::Defend, false);
    player.take_damage(20.0, &mut events);
    assert_eq!(player.vitals.health, 70.0);
}

#[test]
fn test_death_happens_exactly_once() {
    let mut player = player();
    let mut events = EventQueue::new();

    assert_that(&player.take_damage(60.0, &mut events)).is_false();
    assert_that(&player.take_damage(60.0, &mut events)).is_true();
    assert_that(&player.take_damage(60.0, &mut events)).is_false();

    assert_that(&player.is_alive()).is_false();
    assert_eq!(player.vitals.health, 0.0);
    assert_eq!(player.stats.deaths, 1);
    let deaths = events
        .drain()
        .filter(|event| matches!(event, GameEvent::PlayerDied { .. }))
        .count();
    assert_eq!(deaths, 1);
}

#[test]
fn test_heal_is_clamped() {
    let mut player = player();
    let mut events = EventQueue::new();
    player.take_damage(30.0, &mut events);

    assert_eq!(player.heal(50.0, &mut events), 30.0);
    assert_eq!(player.vitals.health, player.vitals.max_health);
    assert_eq!(player.heal(10.0, &mut events), 0.0);
}

#[test]
fn test_large_experience_gain_applies_every_level() {
    let mut player = player();
    let mut events = EventQueue::new();
    player.take_damage(50.0, &mut events);

    assert_eq!(player.gain_experience(230, &mut events), 2);
    assert_eq!(player.stats.level, 3);
    assert_eq!(player.stats.experience, 10);
    assert_eq!(player.stats.experience_to_next, 144);
    assert_eq!(player.vitals.max_health, 120.0);
    assert_eq!(player.vitals.health, 120.0);
    assert_eq!(player.weapon.damage, 29.0);
    assert_that(&player.stats.speed).is_close_to(5.4, 1e-4);

    let level_ups: Vec<u32> = events
        .drain()
        .filter_map(|event| match event {
            GameEvent::PlayerLevelUp { level } => Some(level),
            _ => None,
        })
        .collect();
    assert_eq!(level_ups, vec![2, 3]);
}

#[test]
fn test_dead_player_gains_no_experience() {
    let mut player = player();
    let mut events = EventQueue::new();
    player.stats.experience = 99;
    player.take_damage(500.0, &mut events);

    assert_eq!(player.gain_experience(50, &mut events), 0);
    assert_eq!(player.stats.level, 1);
    assert_eq!(player.stats.experience, 99);
    assert_eq!(player.health(), 0.0);
}

#[test]
fn test_diagonal_movement_keeps_speed() {
    let mut harness = Harness::new();
    let mut player = player();
    player.set_input(InputAction::MoveRight, true);
    player.set_input(InputAction::MoveDown, true);

    let start = player.position;
    player.tick(&mut harness.frame(None));

    assert_that(&player.is_moving()).is_true();
    assert_that(&(player.position - start).length()).is_close_to(5.0, 1e-3);
    assert_eq!(player.animation().current_name(), Some(animations::PLAYER_WALK));
}

#[test]
fn test_player_stays_inside_arena() {
    let mut harness = Harness::new();
    let mut player = Player::new(EntityId(1), Vec2::new(ARENA_SIZE.x - PLAYER_SIZE.width, 2.0));
    player.set_input(InputAction::MoveRight, true);
    player.set_input(InputAction::MoveUp, true);

    for _ in 0..5 {
        player.tick(&mut harness.frame(None));
    }

    assert_eq!(player.position, Vec2::new(ARENA_SIZE.x - PLAYER_SIZE.width, 0.0));
}

#[test]
fn test_save_round_trip_and_validation() {
    let mut player = player();
    let mut events = EventQueue::new();
    player.take_damage(35.0, &mut events);
    player.attack(0.0, &mut events);

    let save = player.to_save();
    let restored = Player::from_save(save.clone()).unwrap();
    assert_eq!(restored.to_save(), save);

    let mut broken = save;
    broken.weapon.ammo = broken.weapon.max_ammo + 1;
    assert_that(&Player::from_save(broken)).is_err();
}
