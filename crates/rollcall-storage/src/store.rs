//! The storage collaborator seen by the registry.
//!
//! A store is addressed by a string namespace and holds one
//! [`RecordMap`] per namespace. How the map becomes bytes is the store's
//! business; the registry only relies on `save` followed by `load`
//! giving back the same id/name pairs.

use std::sync::Arc;

use rollcall_protocol::RecordMap;

use crate::StorageError;

/// Loads and saves record maps by namespace.
///
/// Methods take `&self`: stores that need to mutate (e.g.
/// [`MemoryStore`](crate::MemoryStore)) use interior mutability, so one
/// store can back several registries.
pub trait RecordStore {
    /// Loads the records for `namespace`.
    ///
    /// # Returns
    /// - `Ok(Some(map))` — the namespace exists
    /// - `Ok(None)` — nothing has been saved under this namespace yet
    /// - `Err(_)` — the data exists but couldn't be read
    fn load(
        &self,
        namespace: &str,
    ) -> Result<Option<RecordMap>, StorageError>;

    /// Replaces everything stored under `namespace` with `records`.
    fn save(
        &self,
        namespace: &str,
        records: &RecordMap,
    ) -> Result<(), StorageError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn load(
        &self,
        namespace: &str,
    ) -> Result<Option<RecordMap>, StorageError> {
        (**self).load(namespace)
    }

    fn save(
        &self,
        namespace: &str,
        records: &RecordMap,
    ) -> Result<(), StorageError> {
        (**self).save(namespace, records)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn load(
        &self,
        namespace: &str,
    ) -> Result<Option<RecordMap>, StorageError> {
        (**self).load(namespace)
    }

    fn save(
        &self,
        namespace: &str,
        records: &RecordMap,
    ) -> Result<(), StorageError> {
        (**self).save(namespace, records)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn load(
        &self,
        namespace: &str,
    ) -> Result<Option<RecordMap>, StorageError> {
        (**self).load(namespace)
    }

    fn save(
        &self,
        namespace: &str,
        records: &RecordMap,
    ) -> Result<(), StorageError> {
        (**self).save(namespace, records)
    }
}
