//! Error types for the registry layer.

use rollcall_storage::StorageError;

/// Errors surfaced by the registry.
///
/// Lookups never fail: a miss is `None` or an empty list. The only
/// errors are persistence failures a caller explicitly asked about and
/// a registry that is no longer running.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Saving the record map failed. The in-memory state is still
    /// correct; the next successful save catches the store up.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The task owning the registry has stopped.
    #[error("player registry is unavailable")]
    Unavailable,
}
