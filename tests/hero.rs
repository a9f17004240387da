mod common;

use common::Harness;
use glam::Vec2;
use jungle_ops::entity::hero::{AbilityKind, Hero, HeroKind, FOLLOW_DISTANCE};
use jungle_ops::entity::{Entity, EntityId};
use jungle_ops::events::{EventQueue, GameEvent, InputAction};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use std::str::FromStr;

fn hero(kind: HeroKind) -> Hero {
    Hero::new(EntityId(9), kind, Vec2::new(100.0, 100.0))
}

#[test]
fn test_morale_scales_incoming_damage() {
    let mut events = EventQueue::new();

    let mut steady = hero(HeroKind::Commander);
    steady.take_damage(20.0, &mut events);
    assert_eq!(steady.health(), 80.0);
    assert_eq!(steady.morale, 95.0);

    let mut shaken = hero(HeroKind::Commander);
    shaken.morale = 0.0;
    shaken.take_damage(20.0, &mut events);
    assert_eq!(shaken.health(), 60.0);
    assert_eq!(shaken.morale, 0.0);
}

#[test]
fn test_ability_cooldown() {
    let mut medic = hero(HeroKind::Medic);
    let mut events = EventQueue::new();

    assert_that(&medic.use_ability(AbilityKind::Heal, 0.0, &mut events)).is_true();
    assert_that(&medic.use_ability(AbilityKind::Heal, 1000.0, &mut events)).is_false();
    assert_that(&medic.use_ability(AbilityKind::Heal, 3000.0, &mut events)).is_true();
}

#[test]
fn test_passive_and_foreign_abilities_cannot_be_used() {
    let mut medic = hero(HeroKind::Medic);
    let mut events = EventQueue::new();

    assert_that(&medic.use_ability(AbilityKind::MedicalTraining, 0.0, &mut events)).is_false();
    assert_that(&medic.use_ability(AbilityKind::Rally, 0.0, &mut events)).is_false();
    assert_that(&events.is_empty()).is_true();
}

#[test]
fn test_precision_shot_emits_strike() {
    let mut sniper = hero(HeroKind::Sniper);
    let mut events = EventQueue::new();

    sniper.use_ability(AbilityKind::PrecisionShot, 0.0, &mut events);
    let strike = events
        .drain()
        .find(|event| matches!(event, GameEvent::HeroStrike { .. }));
    assert_eq!(
        strike,
        Some(GameEvent::HeroStrike {
            hero: EntityId(9),
            origin: Vec2::new(100.0, 100.0),
            damage: 80.0,
            range: 300.0,
        })
    );
}

#[test]
fn test_rally_restores_morale() {
    let mut commander = hero(HeroKind::Commander);
    let mut events = EventQueue::new();
    commander.morale = 50.0;

    commander.use_ability(AbilityKind::Rally, 0.0, &mut events);
    assert_eq!(commander.morale, 80.0);
}

#[test]
fn test_wounded_medic_heals_itself() {
    let mut harness = Harness::new();
    let mut medic = hero(HeroKind::Medic);
    medic.vitals.health = 40.0;

    medic.tick(&mut harness.frame(None));

    // Heal (+30) lifts it above 70%, so the first aid kit stays unused; then regeneration adds 5.
    assert_eq!(medic.health(), 75.0);
    assert_that(&medic.ability(AbilityKind::Heal).unwrap().last_used.is_some()).is_true();
    assert_that(&medic.ability(AbilityKind::FirstAidKit).unwrap().last_used).is_none();
}

#[test]
fn test_follows_player_until_close() {
    let mut harness = Harness::new();
    let mut engineer = hero(HeroKind::Engineer);
    let player = Vec2::new(300.0, 100.0);

    engineer.tick(&mut harness.frame(Some(player)));
    assert_that(&engineer.is_moving()).is_true();
    assert_that(&engineer.position.x).is_greater_than(100.0);
    assert_eq!(engineer.target(), Some(player));

    let mut close = Hero::new(EntityId(10), HeroKind::Engineer, player - Vec2::new(FOLLOW_DISTANCE - 5.0, 0.0));
    let before = close.position;
    close.tick(&mut harness.frame(Some(player)));
    assert_that(&close.is_moving()).is_false();
    assert_eq!(close.position, before);
}

#[test]
fn test_player_controlled_hero_uses_input() {
    let mut harness = Harness::new();
    let mut sniper = hero(HeroKind::Sniper);
    sniper.player_controlled = true;
    sniper.set_input(InputAction::MoveLeft, true);

    sniper.tick(&mut harness.frame(Some(Vec2::new(600.0, 100.0))));

    assert_that(&sniper.position.x).is_less_than(100.0);
    assert_eq!(sniper.position.y, 100.0);
}

#[test]
fn test_morale_and_loyalty_decay() {
    let mut harness = Harness::new();
    let mut engineer = hero(HeroKind::Engineer);

    for _ in 0..100 {
        engineer.tick(&mut harness.frame(None));
    }

    assert_that(&engineer.morale).is_less_than(100.0);
    assert_that(&engineer.loyalty).is_less_than(100.0);
    assert_that(&engineer.loyalty).is_greater_than(engineer.morale);
}

#[test]
fn test_ability_names_parse() {
    assert_eq!(AbilityKind::from_str("First Aid Kit").unwrap(), AbilityKind::FirstAidKit);
    assert_eq!(AbilityKind::TacticalStrike.to_string(), "Tactical Strike");
}

#[test]
fn test_save_requires_matching_abilities() {
    let medic = hero(HeroKind::Medic);
    let mut save = medic.to_save();
    assert_that(&Hero::validate_save(&save)).is_ok();

    save.kind = HeroKind::Sniper;
    assert_that(&Hero::from_save(save)).is_err();
}
