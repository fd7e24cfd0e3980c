//! In-process record store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rollcall_protocol::{BincodeCodec, Codec, RecordMap, verify_record_keys};

use crate::{RecordStore, StorageError};

/// A [`RecordStore`] that keeps encoded namespaces in memory.
///
/// Records still go through the codec on every save and load, so a
/// registry backed by this store sees the same copy semantics as one
/// backed by files. Saves can be made to fail on demand with
/// [`set_fail_saves`](Self::set_fail_saves).
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// When `true`, every later `save` returns
    /// [`StorageError::Unavailable`] and leaves the stored bytes alone.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }

    /// Returns `true` if anything has been saved under `namespace`.
    pub fn contains(&self, namespace: &str) -> bool {
        self.blobs().contains_key(namespace)
    }

    /// Stores raw bytes under `namespace`, bypassing the codec.
    ///
    /// Lets callers plant unreadable data to exercise load failures.
    pub fn insert_raw(&self, namespace: &str, bytes: Vec<u8>) {
        self.blobs().insert(namespace.to_owned(), bytes);
    }

    // A panic while holding the lock can't leave the map half-updated
    // (every write is a single insert), so a poisoned lock is still usable.
    fn blobs(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordStore for MemoryStore {
    fn load(
        &self,
        namespace: &str,
    ) -> Result<Option<RecordMap>, StorageError> {
        let blobs = self.blobs();
        let Some(bytes) = blobs.get(namespace) else {
            return Ok(None);
        };
        let records: RecordMap = BincodeCodec.decode(bytes)?;
        verify_record_keys(&records)?;
        Ok(Some(records))
    }

    fn save(
        &self,
        namespace: &str,
        records: &RecordMap,
    ) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(StorageError::Unavailable(format!(
                "saves to {namespace} are disabled"
            )));
        }
        let bytes = BincodeCodec.encode(records)?;
        self.blobs().insert(namespace.to_owned(), bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_protocol::{PlayerId, PlayerRecord};

    fn records(pairs: &[(u64, &str)]) -> RecordMap {
        pairs
            .iter()
            .map(|&(id, name)| (PlayerId::from(id), PlayerRecord::new(id, name)))
            .collect()
    }

    #[test]
    fn test_load_unknown_namespace_returns_none() {
        let store = MemoryStore::new();

        assert!(store.load("missing").unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_returns_equal_records() {
        let store = MemoryStore::new();
        let map = records(&[(1, "Ada"), (2, "Bo")]);

        store.save("ns", &map).unwrap();

        assert_eq!(store.load("ns").unwrap(), Some(map));
    }

    #[test]
    fn test_namespaces_are_independent() {
        let store = MemoryStore::new();
        store.save("a", &records(&[(1, "Ada")])).unwrap();

        assert!(store.contains("a"));
        assert!(!store.contains("b"));
        assert!(store.load("b").unwrap().is_none());
    }

    #[test]
    fn test_save_when_failing_returns_unavailable_and_keeps_old_bytes() {
        let store = MemoryStore::new();
        let original = records(&[(1, "Ada")]);
        store.save("ns", &original).unwrap();
        store.set_fail_saves(true);

        let result = store.save("ns", &records(&[(1, "Ada"), (2, "Bo")]));

        assert!(matches!(result, Err(StorageError::Unavailable(_))));
        assert_eq!(store.load("ns").unwrap(), Some(original));
    }

    #[test]
    fn test_load_garbage_returns_codec_error() {
        let store = MemoryStore::new();
        store.insert_raw("ns", vec![0xff; 3]);

        let result = store.load("ns");

        assert!(matches!(result, Err(StorageError::Codec(_))));
    }
}
