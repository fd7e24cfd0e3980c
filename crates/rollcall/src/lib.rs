//! # Rollcall
//!
//! Persistent player identity and session tracking for game servers.
//!
//! A host game reports three events per player (join, connect,
//! disconnect) and Rollcall keeps a durable `{id, name}` history plus
//! the set of players online right now, with lookup and partial-name
//! search over both.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rollcall::prelude::*;
//!
//! struct Avatar { slot: u64, name: String }
//!
//! impl GameEntity for Avatar {
//!     type Handle = u64;
//!     fn handle(&self) -> u64 { self.slot }
//!     fn name(&self) -> String { self.name.clone() }
//! }
//!
//! # fn main() -> Result<(), RollcallError> {
//! let config = RollcallConfig::default();
//! let mut players: PlayerRegistry<Avatar, FileStore> = config.open_registry();
//!
//! let avatar = std::sync::Arc::new(Avatar { slot: 7, name: "Nova".into() });
//! players.on_join(&avatar);
//! players.on_connect(&avatar);
//! assert_eq!(players.find_player("nov").map(|p| p.id().as_str()), Some("7"));
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod handle;
pub mod logging;

pub use config::RollcallConfig;
pub use error::RollcallError;
pub use handle::{RegistryHandle, spawn_registry};

/// Everything a host integration usually needs.
pub mod prelude {
    pub use crate::{RegistryHandle, RollcallConfig, RollcallError, spawn_registry};
    pub use rollcall_protocol::{PlayerId, PlayerRecord, RecordMap};
    pub use rollcall_registry::{
        GameEntity, Player, PlayerRegistry, RegistryConfig, RegistryError,
    };
    pub use rollcall_storage::{
        FileStore, FileStoreConfig, MemoryStore, RecordStore, StorageError,
    };
}
