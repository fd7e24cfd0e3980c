//! Identity types and codecs for Rollcall.
//!
//! This crate defines the data that outlives a server restart:
//!
//! - **Types** ([`PlayerId`], [`PlayerRecord`], [`RecordMap`]) — the
//!   stable identity of a player and the name last seen for it.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`], [`BincodeCodec`]) — how
//!   those records are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! ```text
//! Registry (players) → Protocol (PlayerRecord) → Storage (bytes on disk)
//! ```
//!
//! The protocol layer knows nothing about files or live game entities.
//! It only knows what a record looks like and how to serialize it.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "bincode")]
pub use codec::BincodeCodec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{verify_record_keys, PlayerId, PlayerRecord, RecordMap};
