//! Unified error type for Rollcall.

use std::path::PathBuf;

use rollcall_protocol::ProtocolError;
use rollcall_registry::RegistryError;
use rollcall_storage::StorageError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each layer's variant lets `?` convert
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RollcallError {
    /// Encoding or decoding records failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Loading or saving records failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The registry failed a save or has stopped.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The configuration file couldn't be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file isn't valid JSON for
    /// [`RollcallConfig`](crate::RollcallConfig).
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The log filter didn't parse, or a global subscriber is already set.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
