//! Spatial queries over the arena.

pub mod grid;

pub use grid::{NavGrid, PathOptions};
