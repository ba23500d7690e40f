//! Persisted setup: last-used settings and the player registry.
//!
//! Stored as one JSON object with two fixed keys. Each key is read on its
//! own, so a corrupt registry does not throw away the settings and vice versa.
//! Missing or unreadable data always falls back to defaults.

use crate::error::StoreError;
use crate::types::{RegisteredPlayer, Settings};
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const CONFIGURATION_KEY: &str = "gameConfiguration";
pub const PLAYERS_KEY: &str = "allPlayers";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSetup {
    pub settings: Settings,
    pub players: Vec<RegisteredPlayer>,
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Option<PathBuf>,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    pub async fn load(&self) -> StoredSetup {
        let Some(path) = &self.path else {
            return StoredSetup::default();
        };

        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No settings at {}, using defaults", path.display());
                return StoredSetup::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read settings {}: {}", path.display(), e);
                return StoredSetup::default();
            }
        };

        let object = match serde_json::from_str::<Map<String, Value>>(&text) {
            Ok(object) => object,
            Err(e) => {
                tracing::warn!("Failed to parse settings {}: {}", path.display(), e);
                return StoredSetup::default();
            }
        };

        StoredSetup {
            settings: read_key(&object, CONFIGURATION_KEY),
            players: read_key(&object, PLAYERS_KEY),
        }
    }

    pub async fn save(&self, setup: &StoredSetup) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut object = Map::new();
        object.insert(
            CONFIGURATION_KEY.to_string(),
            serde_json::to_value(&setup.settings)?,
        );
        object.insert(PLAYERS_KEY.to_string(), serde_json::to_value(&setup.players)?);

        // Readers only ever see a complete file
        let json = serde_json::to_string_pretty(&Value::Object(object))?;
        let staging = staging_path(path);
        tokio::fs::write(&staging, json).await?;
        tokio::fs::rename(&staging, path).await?;
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn read_key<T>(object: &Map<String, Value>, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match object.get(key) {
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            tracing::warn!("Ignoring stored '{}': {}", key, e);
            T::default()
        }),
        None => T::default(),
    }
}
