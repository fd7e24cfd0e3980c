//! File store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where and how a [`FileStore`](crate::FileStore) keeps its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// Directory holding one `<namespace>.data` file per namespace.
    /// Created on first save if missing.
    pub data_dir: PathBuf,

    /// Convert `<namespace>.json` files left by older versions into the
    /// binary format the first time a namespace is loaded.
    pub migrate_legacy: bool,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            migrate_legacy: true,
        }
    }
}
