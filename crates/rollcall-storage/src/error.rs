//! Error types for the storage layer.

use rollcall_protocol::ProtocolError;

/// Errors that can occur while loading or saving a namespace.
///
/// None of these are fatal to the registry: a failed load starts it
/// empty and a failed save leaves the in-memory state intact.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading, writing, or renaming the data file failed.
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The payload could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] ProtocolError),

    /// The file exists but isn't one of ours (bad magic, unknown
    /// format version, or a header cut short). `FileStore` has already
    /// renamed the file to `<namespace>.data.corrupt` when this is
    /// returned.
    #[error("corrupt data file for namespace {namespace}: {reason}")]
    Corrupt { namespace: String, reason: String },

    /// The namespace can't be used as a file name (empty, or contains a
    /// path separator or `..`).
    #[error("invalid namespace {0:?}")]
    InvalidNamespace(String),

    /// The store refused the operation (e.g. a read-only or failing
    /// backend).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
