//! Save-game persistence behind a small trait.
//!
//! The simulation never calls a store itself; the host loads or saves between
//! frames and hands the snapshot to [`GameManager`](crate::game::GameManager).

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::StoreError;
use crate::game::save::SaveGame;

pub trait ProgressStore {
    /// Returns the stored snapshot for `player_id`, or `None` if nothing was saved yet.
    fn load_progress(&self, player_id: &str) -> Result<Option<SaveGame>, StoreError>;

    fn save_progress(&mut self, player_id: &str, save: &SaveGame) -> Result<(), StoreError>;

    /// Forgets `player_id`'s progress. Resetting a player with no progress is not an error.
    fn reset_progress(&mut self, player_id: &str) -> Result<(), StoreError>;
}

/// Player ids double as file names, so they are limited to `[A-Za-z0-9_-]`.
fn validate_player_id(player_id: &str) -> Result<(), StoreError> {
    let valid = !player_id.is_empty()
        && player_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidPlayerId(player_id.to_string()))
    }
}

/// One pretty-printed JSON file per player under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, player_id: &str) -> Result<PathBuf, StoreError> {
        validate_player_id(player_id)?;
        Ok(self.dir.join(format!("{player_id}.json")))
    }
}

impl ProgressStore for JsonFileStore {
    fn load_progress(&self, player_id: &str) -> Result<Option<SaveGame>, StoreError> {
        let path = self.path_for(player_id)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        debug!(path = %path.display(), "Loaded progress");
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save_progress(&mut self, player_id: &str, save: &SaveGame) -> Result<(), StoreError> {
        let path = self.path_for(player_id)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, serde_json::to_string_pretty(save)?)?;
        info!(player_id, path = %path.display(), "Saved progress");
        Ok(())
    }

    fn reset_progress(&mut self, player_id: &str) -> Result<(), StoreError> {
        let path = self.path_for(player_id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(player_id, "Reset progress");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// Keeps snapshots in memory. Useful for tests and for hosts without a filesystem.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    saves: HashMap<String, SaveGame>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.saves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saves.is_empty()
    }
}

impl ProgressStore for MemoryStore {
    fn load_progress(&self, player_id: &str) -> Result<Option<SaveGame>, StoreError> {
        validate_player_id(player_id)?;
        Ok(self.saves.get(player_id).cloned())
    }

    fn save_progress(&mut self, player_id: &str, save: &SaveGame) -> Result<(), StoreError> {
        validate_player_id(player_id)?;
        self.saves.insert(player_id.to_string(), save.clone());
        Ok(())
    }

    fn reset_progress(&mut self, player_id: &str) -> Result<(), StoreError> {
        validate_player_id(player_id)?;
        self.saves.remove(player_id);
        Ok(())
    }
}
