//! Entity trait for the capabilities every simulated object shares.
//!
//! The game manager keeps one collection per variant; this trait is what lets
//! it update, hit-test and draw them uniformly.

use glam::Vec2;

use crate::entity::{EntityId, EntityKind, Size, TickContext, Vitals};
use crate::render::{health_bar, Color, Rect, SpriteSet, Surface};

pub trait Entity {
    fn id(&self) -> EntityId;

    fn kind(&self) -> EntityKind;

    /// Top-left corner in world coordinates.
    fn position(&self) -> Vec2;

    fn size(&self) -> Size;

    fn vitals(&self) -> &Vitals;

    /// Advances the entity by one tick. Cross-entity effects go through `ctx.events`.
    fn tick(&mut self, ctx: &mut TickContext<'_>);

    /// Draws the entity. Must not change simulation state.
    fn render(&self, surface: &mut dyn Surface, sprites: &SpriteSet, debug: bool);

    fn health(&self) -> f32 {
        self.vitals().health
    }

    fn max_health(&self) -> f32 {
        self.vitals().max_health
    }

    fn is_alive(&self) -> bool {
        self.vitals().is_alive()
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin(self.position(), self.size().as_vec2())
    }

    fn distance_to(&self, point: Vec2) -> f32 {
        self.position().distance(point)
    }

    /// Fallback drawing used when no sprite sheet is available for this kind.
    fn render_placeholder(&self, surface: &mut dyn Surface, color: Color) {
        surface.fill_rect(self.bounds(), color);
    }

    fn render_health_bar(&self, surface: &mut dyn Surface) {
        health_bar(surface, self.position(), self.size().width, self.vitals().ratio());
    }
}
