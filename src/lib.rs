//! Simulation core for a top-down jungle warfare action game.

pub mod animation;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod logging;
pub mod map;
pub mod render;
pub mod store;
