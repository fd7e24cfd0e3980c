//! Player identity registry for Rollcall.
//!
//! The host game only knows a player by a per-session numeric handle.
//! This crate keeps three views of the players it has seen, and keeps
//! them consistent as the host reports joins, connects and disconnects:
//!
//! 1. **Records** — the durable `{id, name}` pairs, saved on every join
//! 2. **All-time index** — one [`Player`] per id ever seen, rebuilt from
//!    the records at start-up
//! 3. **Connected index** — one [`Player`] per live session
//!
//! # How it fits in the stack
//!
//! ```text
//! Host game (above)  ← calls on_join / on_connect / on_disconnect
//!     ↕
//! Registry (this crate)  ← maps handles to identities, answers lookups
//!     ↕
//! Storage (below)  ← persists the record map between restarts
//! ```

mod config;
mod entity;
mod error;
mod player;
mod registry;

pub use config::{DEFAULT_NAMESPACE, RegistryConfig};
pub use entity::GameEntity;
pub use error::RegistryError;
pub use player::Player;
pub use registry::PlayerRegistry;
