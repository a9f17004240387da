//! The drawing boundary between the simulation and whatever puts pixels on screen.
//!
//! The simulation only issues calls against [`Surface`]; images are handed in
//! already loaded as [`SpriteSheet`] handles. [`DrawList`] is a surface that
//! records the calls, used by the headless driver and the tests.

use std::collections::HashMap;

use glam::Vec2;

use crate::animation::Frame;
use crate::entity::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.x + self.width && point.y >= self.y && point.y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const DARK_RED: Color = Color::rgb(139, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 200, 0);
    pub const FOREST: Color = Color::rgb(34, 68, 34);
    pub const OLIVE: Color = Color::rgb(85, 107, 47);
    pub const YELLOW: Color = Color::rgb(255, 215, 0);
    pub const ORANGE: Color = Color::rgb(255, 140, 0);
    pub const BLUE: Color = Color::rgb(30, 144, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const OVERLAY: Color = Color::rgba(0, 0, 0, 160);
}

/// A pre-loaded image the rendering backend knows how to blit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl SpriteSheet {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

/// Sprite sheets per entity kind. Kinds without a sheet are drawn as colored boxes.
#[derive(Debug, Clone, Default)]
pub struct SpriteSet {
    sheets: HashMap<EntityKind, SpriteSheet>,
}

impl SpriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: EntityKind, sheet: SpriteSheet) -> Self {
        self.sheets.insert(kind, sheet);
        self
    }

    pub fn insert(&mut self, kind: EntityKind, sheet: SpriteSheet) {
        self.sheets.insert(kind, sheet);
    }

    pub fn get(&self, kind: EntityKind) -> Option<&SpriteSheet> {
        self.sheets.get(&kind)
    }
}

/// A 2D drawing target. Implementations must not block.
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Copies `src` from `sheet` into `dest`, mirrored horizontally when `flip_x` is set.
    fn draw_sprite(&mut self, sheet: &SpriteSheet, src: Frame, dest: Rect, flip_x: bool);
    fn draw_text(&mut self, text: &str, position: Vec2, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color },
    StrokeCircle { center: Vec2, radius: f32, color: Color },
    Sprite { sheet: String, src: Frame, dest: Rect, flip_x: bool },
    Text { text: String, position: Vec2, color: Color },
}

/// A surface that records every call instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// All text drawn so far, in call order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Sprite { .. }))
            .count()
    }
}

impl Surface for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::StrokeRect { rect, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle { center, radius, color });
    }

    fn draw_sprite(&mut self, sheet: &SpriteSheet, src: Frame, dest: Rect, flip_x: bool) {
        self.commands.push(DrawCommand::Sprite {
            sheet: sheet.name.clone(),
            src,
            dest,
            flip_x,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            color,
        });
    }
}

/// Draws a bar of `width` above `origin`, filled in proportion to `ratio`.
pub fn health_bar(surface: &mut dyn Surface, origin: Vec2, width: f32, ratio: f32) {
    let height = 4.0;
    let top = origin.y - height - 4.0;
    surface.fill_rect(Rect::new(origin.x, top, width, height), Color::DARK_RED);
    surface.fill_rect(
        Rect::new(origin.x, top, width * ratio.clamp(0.0, 1.0), height),
        Color::GREEN,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(!rect.contains(Vec2::new(10.0, 5.0)));
        assert_eq!(rect.center(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_health_bar_clamps_ratio() {
        let mut list = DrawList::new();
        health_bar(&mut list, Vec2::new(0.0, 20.0), 32.0, 1.5);
        match &list.commands()[1] {
            DrawCommand::FillRect { rect, .. } => assert_eq!(rect.width, 32.0),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
