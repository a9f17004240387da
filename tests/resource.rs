use glam::Vec2;
use jungle_ops::entity::resource::{Resource, ResourceKind};
use jungle_ops::entity::{Entity, EntityId};
use jungle_ops::events::{EventQueue, GameEvent};
use jungle_ops::render::DrawList;
use jungle_ops::render::SpriteSet;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

fn medals() -> Resource {
    Resource::new(EntityId(4), ResourceKind::Medals, Vec2::new(64.0, 64.0), 3)
}

#[test]
fn test_collect_happens_once() {
    let mut pickup = medals();
    let mut events = EventQueue::new();

    assert_that(&pickup.collect(&mut events)).is_true();
    assert_that(&pickup.collect(&mut events)).is_false();
    assert_that(&pickup.is_collected()).is_true();
    assert_that(&pickup.is_alive()).is_false();

    assert_eq!(
        events.drain().collect::<Vec<_>>(),
        vec![GameEvent::ResourceCollected {
            resource: EntityId(4),
            kind: ResourceKind::Medals,
            amount: 3,
        }]
    );
}

#[test]
fn test_collected_pickup_is_not_drawn() {
    let mut pickup = medals();
    let sprites = SpriteSet::new();

    let mut surface = DrawList::new();
    pickup.render(&mut surface, &sprites, false);
    assert_that(&surface.is_empty()).is_false();

    pickup.collect(&mut EventQueue::new());
    let mut surface = DrawList::new();
    pickup.render(&mut surface, &sprites, false);
    assert_that(&surface.is_empty()).is_true();
}

#[test]
fn test_save_keeps_collected_flag() {
    let mut pickup = medals();
    pickup.collect(&mut EventQueue::new());

    let restored = Resource::from_save(pickup.to_save()).unwrap();
    assert_that(&restored.is_collected()).is_true();
    assert_eq!(restored.amount(), 3);

    let mut broken = pickup.to_save();
    broken.position = Vec2::new(f32::NAN, 0.0);
    assert_that(&Resource::validate_save(&broken)).is_err();
}
