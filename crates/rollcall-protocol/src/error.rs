//! Error types for the protocol layer.
//!
//! Each crate in Rollcall defines its own error enum. When you see a
//! `ProtocolError`, the problem is in serialization, not in file I/O or
//! in the registry itself.

/// Errors that can occur while encoding or decoding records.
///
/// Each codec gets its own pair of variants so the original error from
/// the format crate is preserved for logging.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// JSON serialization failed.
    #[cfg(feature = "json")]
    #[error("json encode failed: {0}")]
    Encode(serde_json::Error),

    /// JSON deserialization failed.
    ///
    /// Common causes: malformed JSON, missing required fields, or a
    /// truncated data file.
    #[cfg(feature = "json")]
    #[error("json decode failed: {0}")]
    Decode(serde_json::Error),

    /// Binary serialization failed.
    #[cfg(feature = "bincode")]
    #[error("binary encode failed: {0}")]
    BinaryEncode(bincode::Error),

    /// Binary deserialization failed (truncated or foreign bytes).
    #[cfg(feature = "bincode")]
    #[error("binary decode failed: {0}")]
    BinaryDecode(bincode::Error),

    /// The data decoded but violates a record rule, e.g. a map entry
    /// whose key disagrees with the record's own id.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}
