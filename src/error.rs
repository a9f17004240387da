//! Centralized error types for the simulation.
//!
//! Routine simulation outcomes (ability on cooldown, no path, insufficient
//! resources) are not errors and never show up here; these types only cover
//! startup configuration, save data and persistence failures.

use std::io;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised while building the startup configuration. These are fatal.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to extract configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while validating or decoding a save snapshot.
#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("Unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Invalid {kind} in save data: {reason}")]
    InvalidEntity { kind: &'static str, reason: String },

    #[error("Malformed save data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised by a progress store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid player id: {0:?}")]
    InvalidPlayerId(String),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
