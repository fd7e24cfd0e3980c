//! Durable storage for player records.
//!
//! The registry persists its records through the [`RecordStore`] trait:
//! load a namespace, save a namespace. Two stores ship:
//!
//! - [`FileStore`] — one file per namespace in a data directory, written
//!   atomically, with a migration path from the old JSON data files.
//! - [`MemoryStore`] — bytes kept in process, for tests and for hosts
//!   that have nowhere to write.

mod config;
mod error;
mod file;
mod memory;
mod store;

pub use config::FileStoreConfig;
pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::RecordStore;
