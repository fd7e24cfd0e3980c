//! Top-level configuration, loadable from a JSON file.

use std::fs;
use std::path::Path;

use rollcall_registry::{GameEntity, PlayerRegistry, RegistryConfig};
use rollcall_storage::{FileStore, FileStoreConfig};
use serde::{Deserialize, Serialize};

use crate::RollcallError;

/// Everything needed to stand up a file-backed registry.
///
/// Every field has a default, so a config file only has to mention what
/// it changes:
///
/// ```json
/// { "store": { "data_dir": "/var/lib/game/players" }, "log_filter": "debug" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollcallConfig {
    /// Where records are written.
    pub store: FileStoreConfig,

    /// Which namespace the registry uses.
    pub registry: RegistryConfig,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Command queue depth for [`spawn_registry`](crate::spawn_registry).
    pub channel_size: usize,
}

impl Default for RollcallConfig {
    fn default() -> Self {
        Self {
            store: FileStoreConfig::default(),
            registry: RegistryConfig::default(),
            log_filter: "info".to_owned(),
            channel_size: 64,
        }
    }
}

impl RollcallConfig {
    /// Reads a config from a JSON file.
    ///
    /// # Errors
    /// [`RollcallError::ConfigRead`] if the file can't be read,
    /// [`RollcallError::ConfigParse`] if it isn't a valid config.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RollcallError> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|source| RollcallError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_slice(&raw).map_err(|source| {
            RollcallError::ConfigParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Opens the file store and loads a registry from it.
    pub fn open_registry<E: GameEntity>(&self) -> PlayerRegistry<E, FileStore> {
        let store = FileStore::open(self.store.clone());
        PlayerRegistry::new(store, self.registry.clone())
    }
}
