mod common;

use common::Harness;
use glam::{IVec2, Vec2};
use jungle_ops::entity::enemy::{AiState, Enemy, EnemyKind, MAX_ALERT};
use jungle_ops::entity::{Entity, EntityId};
use jungle_ops::events::{EventQueue, GameEvent};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use strum::IntoEnumIterator;

fn soldier(harness: &mut Harness, position: Vec2) -> Enemy {
    Enemy::new(EntityId(7), EnemyKind::Soldier, position, &mut harness.rng)
}

#[test]
fn test_new_soldier_stats() {
    let mut harness = Harness::new();
    let enemy = soldier(&mut harness, Vec2::new(300.0, 300.0));

    assert_eq!(enemy.health(), 50.0);
    assert_eq!(enemy.max_health(), 50.0);
    assert_eq!(enemy.stats.damage, 15.0);
    assert_eq!(enemy.stats.attack_range, 80.0);
    assert_eq!(enemy.stats.detection_range, 150.0);
    assert_eq!(enemy.state(), AiState::Patrol);
    assert_that(&enemy.ai.patrol_points.len()).is_greater_than_or_equal_to(3);
    assert_that(&enemy.ai.patrol_points.len()).is_less_than_or_equal_to(5);
}

#[test]
fn test_soldier_death_awards_experience() {
    let mut harness = Harness::new();
    let mut enemy = soldier(&mut harness, Vec2::new(300.0, 300.0));
    let mut events = EventQueue::new();

    assert_that(&enemy.take_damage(50.0, &mut events)).is_true();
    assert_that(&enemy.is_alive()).is_false();
    assert_eq!(enemy.state(), AiState::Dead);
    assert_eq!(
        events.pop(),
        Some(GameEvent::EnemyDied {
            enemy: EntityId(7),
            kind: EnemyKind::Soldier,
            position: Vec2::new(300.0, 300.0),
            experience_reward: 10,
        })
    );

    // Further hits are no-ops.
    assert_that(&enemy.take_damage(50.0, &mut events)).is_false();
    assert_that(&events.is_empty()).is_true();
}

#[test]
fn test_damage_maxes_out_alert() {
    let mut harness = Harness::new();
    let mut enemy = soldier(&mut harness, Vec2::new(300.0, 300.0));
    let mut events = EventQueue::new();

    enemy.take_damage(10.0, &mut events);
    assert_eq!(enemy.alert_level(), MAX_ALERT);
    assert_eq!(enemy.health(), 40.0);
}

#[test]
fn test_player_in_attack_range_triggers_attack() {
    let mut harness = Harness::new();
    let mut enemy = soldier(&mut harness, Vec2::new(300.0, 300.0));
    let player = Vec2::new(350.0, 300.0);

    enemy.tick(&mut harness.frame(Some(player)));

    assert_eq!(enemy.state(), AiState::Attack);
    assert_eq!(enemy.alert_level(), 2.0);
    assert_eq!(enemy.ai.last_known_player_position, Some(player));
    let events = harness.drain();
    assert_that(&events.iter().any(|event| matches!(event, GameEvent::EnemyAttack { damage, .. } if *damage == 15.0)))
        .is_true();
}

#[test]
fn test_attack_respects_cooldown() {
    let mut harness = Harness::new();
    let mut enemy = soldier(&mut harness, Vec2::new(300.0, 300.0));
    let player = Vec2::new(320.0, 300.0);

    // 30 frames is ~500 ms, half the soldier's cooldown.
    for _ in 0..30 {
        enemy.tick(&mut harness.frame(Some(player)));
    }
    let attacks = |events: Vec<GameEvent>| {
        events
            .iter()
            .filter(|event| matches!(event, GameEvent::EnemyAttack { .. }))
            .count()
    };
    assert_eq!(attacks(harness.drain()), 1);

    enemy.tick(&mut harness.step(1000.0, Some(player)));
    assert_eq!(attacks(harness.drain()), 1);
}

#[test]
fn test_distant_player_is_chased() {
    let mut harness = Harness::new();
    let mut enemy = soldier(&mut harness, Vec2::new(300.0, 300.0));
    let player = Vec2::new(420.0, 300.0);

    enemy.tick(&mut harness.frame(Some(player)));

    assert_eq!(enemy.state(), AiState::Chase);
    assert_eq!(enemy.ai.target, Some(player));
    assert_that(&enemy.remaining_path().is_empty()).is_false();
}

#[test]
fn test_wall_hides_player() {
    let mut harness = Harness::new();
    let wall: Vec<Vec2> = (0..25)
        .map(|y| harness.grid.grid_to_world(IVec2::new(11, y)))
        .collect();
    harness.grid.set_obstacles(&wall);

    let mut enemy = soldier(&mut harness, Vec2::new(300.0, 300.0));
    enemy.tick(&mut harness.frame(Some(Vec2::new(400.0, 300.0))));

    assert_eq!(enemy.alert_level(), 0.0);
    assert_that(&enemy.state()).is_not_equal_to(AiState::Chase);
    assert_that(&enemy.state()).is_not_equal_to(AiState::Attack);
}

#[test]
fn test_lost_player_falls_back_to_chase_then_patrol() {
    let mut harness = Harness::new();
    let mut enemy = soldier(&mut harness, Vec2::new(300.0, 300.0));
    let sighting = Vec2::new(330.0, 300.0);

    enemy.tick(&mut harness.frame(Some(sighting)));
    assert_eq!(enemy.state(), AiState::Attack);

    enemy.tick(&mut harness.frame(None));
    assert_eq!(enemy.state(), AiState::Chase);
    assert_eq!(enemy.alert_level(), 1.5);

    // 1.5 alert decays at 0.5 per tick.
    for _ in 0..3 {
        enemy.tick(&mut harness.frame(None));
    }
    assert_eq!(enemy.alert_level(), 0.0);
    assert_eq!(enemy.state(), AiState::Patrol);
}

#[test]
fn test_alert_stays_in_bounds() {
    let mut harness = Harness::new();
    let mut enemy = soldier(&mut harness, Vec2::new(300.0, 300.0));
    let player = Vec2::new(320.0, 300.0);

    let mut previous = enemy.alert_level();
    for _ in 0..80 {
        enemy.tick(&mut harness.frame(Some(player)));
        let alert = enemy.alert_level();
        assert_that(&alert).is_less_than_or_equal_to(MAX_ALERT);
        assert_that(&(alert > previous || alert == MAX_ALERT)).is_true();
        previous = alert;
    }
    assert_eq!(previous, MAX_ALERT);

    for _ in 0..300 {
        enemy.tick(&mut harness.frame(None));
        let alert = enemy.alert_level();
        assert_that(&alert).is_greater_than_or_equal_to(0.0);
        assert_that(&(alert < previous || alert == 0.0)).is_true();
        previous = alert;
    }
    assert_eq!(previous, 0.0);
}

#[test]
fn test_patrol_moves_enemy() {
    let mut harness = Harness::new();
    let mut enemy = soldier(&mut harness, Vec2::new(300.0, 300.0));
    let start = enemy.position;

    for _ in 0..60 {
        enemy.tick(&mut harness.frame(None));
    }

    assert_that(&enemy.position.distance(start)).is_greater_than(0.0);
}

#[test]
fn test_cornered_enemy_is_nudged_free() {
    let mut harness = Harness::new();
    let mut enemy = soldier(&mut harness, Vec2::ZERO);
    // Patrolling towards a point beyond the corner keeps it pressed into the walls.
    enemy.ai.patrol_points.clear();
    enemy.ai.patrol_points.push(Vec2::new(-500.0, -500.0));
    enemy.ai.patrol_index = 0;

    for _ in 0..119 {
        enemy.tick(&mut harness.frame(None));
    }
    assert_eq!(enemy.position, Vec2::ZERO);
    assert_that(&enemy.stuck_time()).is_greater_than(1900.0);

    enemy.tick(&mut harness.frame(None));
    assert_eq!(enemy.stuck_time(), 0.0);
    assert_that(&enemy.remaining_path().is_empty()).is_true();
}

#[test]
fn test_slow_walker_at_high_frame_rate_is_not_stuck() {
    let mut harness = Harness::new();
    let mut enemy = Enemy::new(EntityId(8), EnemyKind::Heavy, Vec2::new(200.0, 300.0), &mut harness.rng);
    enemy.ai.patrol_points.clear();
    enemy.ai.patrol_points.push(Vec2::new(900.0, 300.0));
    enemy.ai.patrol_index = 0;
    let start = enemy.position;

    let mut longest = 0.0f32;
    // 4 ms ticks: a heavy covers well under a pixel per tick.
    for _ in 0..1000 {
        enemy.tick(&mut harness.step(4.0, None));
        longest = longest.max(enemy.stuck_time());
    }

    assert_that(&longest).is_less_than(200.0);
    assert_that(&(enemy.position.x - start.x)).is_greater_than(150.0);
}

#[test]
fn test_every_kind_has_distinct_reward() {
    let rewards: Vec<u32> = EnemyKind::iter().map(|kind| kind.stats().experience_reward).collect();
    assert_eq!(rewards, vec![10, 25, 20, 40]);
}

#[test]
fn test_save_rejects_living_dead_enemy() {
    let mut harness = Harness::new();
    let enemy = soldier(&mut harness, Vec2::new(300.0, 300.0));

    let save = enemy.to_save();
    assert_that(&Enemy::validate_save(&save)).is_ok();

    let mut broken = save.clone();
    broken.ai.state = AiState::Dead;
    assert_that(&Enemy::validate_save(&broken)).is_err();

    let mut broken = save;
    broken.ai.alert_level = 140.0;
    assert_that(&Enemy::validate_save(&broken)).is_err();
}
