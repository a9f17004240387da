//! Pickups scattered around the arena.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::animation::Frame;
use crate::entity::{Entity, EntityId, EntityKind, Size, TickContext, Vitals};
use crate::error::SaveError;
use crate::events::{EventQueue, GameEvent};
use crate::render::{Color, SpriteSet, Surface};

pub const RESOURCE_SIZE: Size = Size::new(16.0, 16.0);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Rice,
    Wood,
    Medals,
    Health,
    Ammo,
}

impl ResourceKind {
    fn color(self) -> Color {
        match self {
            ResourceKind::Rice => Color::WHITE,
            ResourceKind::Wood => Color::rgb(139, 90, 43),
            ResourceKind::Medals => Color::YELLOW,
            ResourceKind::Health => Color::GREEN,
            ResourceKind::Ammo => Color::ORANGE,
        }
    }

    /// Column of this pickup's icon on the resource sheet.
    fn sprite_column(self) -> u16 {
        match self {
            ResourceKind::Rice => 0,
            ResourceKind::Wood => 1,
            ResourceKind::Medals => 2,
            ResourceKind::Health => 3,
            ResourceKind::Ammo => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSave {
    pub id: EntityId,
    pub kind: ResourceKind,
    pub position: Vec2,
    pub amount: u32,
    pub collected: bool,
}

/// A one-shot pickup. Once collected it stays collected.
#[derive(Debug, Clone)]
pub struct Resource {
    id: EntityId,
    kind: ResourceKind,
    pub position: Vec2,
    amount: u32,
    vitals: Vitals,
    collected: bool,
}

impl Resource {
    pub fn new(id: EntityId, kind: ResourceKind, position: Vec2, amount: u32) -> Self {
        Self {
            id,
            kind,
            position,
            amount,
            vitals: Vitals::new(1.0),
            collected: false,
        }
    }

    pub fn resource_kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Marks the pickup as taken. Returns `false` if it already was.
    pub fn collect(&mut self, events: &mut EventQueue) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        events.push(GameEvent::ResourceCollected {
            resource: self.id,
            kind: self.kind,
            amount: self.amount,
        });
        true
    }

    pub fn to_save(&self) -> ResourceSave {
        ResourceSave {
            id: self.id,
            kind: self.kind,
            position: self.position,
            amount: self.amount,
            collected: self.collected,
        }
    }

    pub fn validate_save(save: &ResourceSave) -> Result<(), SaveError> {
        if !save.position.is_finite() {
            return Err(SaveError::InvalidEntity {
                kind: "resource",
                reason: "position is not finite".to_string(),
            });
        }
        Ok(())
    }

    pub fn from_save(save: ResourceSave) -> Result<Self, SaveError> {
        Self::validate_save(&save)?;
        let mut resource = Resource::new(save.id, save.kind, save.position, save.amount);
        resource.collected = save.collected;
        Ok(resource)
    }
}

impl Entity for Resource {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Resource
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> Size {
        RESOURCE_SIZE
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn is_alive(&self) -> bool {
        self.vitals.active && !self.collected
    }

    fn tick(&mut self, _ctx: &mut TickContext<'_>) {}

    fn render(&self, surface: &mut dyn Surface, sprites: &SpriteSet, _debug: bool) {
        if self.collected {
            return;
        }
        match sprites.get(EntityKind::Resource) {
            Some(sheet) => {
                let src = Frame::new(self.kind.sprite_column() * 16, 0, 16, 16, 0.0);
                surface.draw_sprite(sheet, src, self.bounds(), false);
            }
            None => self.render_placeholder(surface, self.kind.color()),
        }
    }
}
