//! File-backed record store.
//!
//! Layout on disk, one file per namespace:
//!
//! ```text
//! <data_dir>/<namespace>.data   magic "RCL1" | version u32 LE | payload
//! <data_dir>/<namespace>.json   legacy JSON object, migrated then removed
//! ```
//!
//! Saves write `<namespace>.data.tmp`, flush it to disk, and rename it
//! over the target, so a crash mid-write leaves the previous file in
//! place.
//!
//! A data file that can't be decoded (foreign bytes, a truncated payload,
//! or a format version written by a newer build) is renamed to
//! `<namespace>.data.corrupt` before the error is returned. The next save
//! then starts a fresh file instead of overwriting the unreadable one.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use rollcall_protocol::{
    BincodeCodec, Codec, JsonCodec, RecordMap, verify_record_keys,
};

use crate::{FileStoreConfig, RecordStore, StorageError};

const MAGIC: &[u8; 4] = b"RCL1";
const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = MAGIC.len() + 4;

const DATA_EXT: &str = "data";
const LEGACY_EXT: &str = "json";
const TMP_SUFFIX: &str = ".tmp";
const CORRUPT_SUFFIX: &str = ".corrupt";

/// A [`RecordStore`] that keeps each namespace in its own file.
///
/// Generic over the payload [`Codec`]; the default is [`BincodeCodec`].
#[derive(Debug, Clone)]
pub struct FileStore<C: Codec = BincodeCodec> {
    data_dir: PathBuf,
    migrate_on_load: bool,
    codec: C,
}

impl FileStore<BincodeCodec> {
    /// Opens a binary file store described by `config`.
    ///
    /// Nothing touches the disk until the first load or save.
    pub fn open(config: FileStoreConfig) -> Self {
        Self::with_codec(config, BincodeCodec)
    }
}

impl<C: Codec> FileStore<C> {
    /// Opens a file store that encodes payloads with `codec`.
    pub fn with_codec(config: FileStoreConfig, codec: C) -> Self {
        Self {
            data_dir: config.data_dir,
            migrate_on_load: config.migrate_legacy,
            codec,
        }
    }

    /// The directory this store writes into.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the data file for `namespace`.
    pub fn path_for(
        &self,
        namespace: &str,
    ) -> Result<PathBuf, StorageError> {
        check_namespace(namespace)?;
        Ok(self.data_dir.join(format!("{namespace}.{DATA_EXT}")))
    }

    fn legacy_path_for(
        &self,
        namespace: &str,
    ) -> Result<PathBuf, StorageError> {
        check_namespace(namespace)?;
        Ok(self.data_dir.join(format!("{namespace}.{LEGACY_EXT}")))
    }

    /// Converts a legacy `<namespace>.json` file into the current format.
    ///
    /// Runs only when the legacy file exists and no current data file
    /// does. The legacy file is removed after the new one is written.
    ///
    /// Returns the number of records migrated (`0` if there was nothing
    /// to do).
    pub fn migrate_legacy(
        &self,
        namespace: &str,
    ) -> Result<usize, StorageError> {
        let legacy = self.legacy_path_for(namespace)?;
        let current = self.path_for(namespace)?;

        if current.exists() {
            return Ok(0);
        }
        let raw = match fs::read(&legacy) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let records: RecordMap = JsonCodec.decode(&raw)?;
        verify_record_keys(&records)?;
        self.save(namespace, &records)?;
        fs::remove_file(&legacy)?;

        tracing::info!(
            namespace,
            count = records.len(),
            "migrated legacy data file"
        );
        Ok(records.len())
    }

    fn decode_file(
        &self,
        namespace: &str,
        bytes: &[u8],
    ) -> Result<RecordMap, StorageError> {
        let corrupt = |reason: &str| StorageError::Corrupt {
            namespace: namespace.to_owned(),
            reason: reason.to_owned(),
        };

        if bytes.len() < HEADER_LEN {
            return Err(corrupt("file shorter than header"));
        }
        let (header, payload) = bytes.split_at(HEADER_LEN);
        if &header[..MAGIC.len()] != MAGIC {
            return Err(corrupt("bad magic"));
        }
        let mut version = [0u8; 4];
        version.copy_from_slice(&header[MAGIC.len()..]);
        let version = u32::from_le_bytes(version);
        if version != FORMAT_VERSION {
            return Err(corrupt(&format!("unsupported format version {version}")));
        }

        let records: RecordMap = self.codec.decode(payload)?;
        verify_record_keys(&records)?;
        Ok(records)
    }

    /// Renames an unreadable data file out of the way and returns where
    /// it went.
    ///
    /// Never replaces an earlier set-aside file: the first free name of
    /// `<file>.corrupt`, `<file>.corrupt.1`, `<file>.corrupt.2`, ... is
    /// used.
    fn set_aside(&self, path: &Path) -> Result<PathBuf, StorageError> {
        let mut base = path.as_os_str().to_owned();
        base.push(CORRUPT_SUFFIX);

        let mut target = PathBuf::from(&base);
        let mut n = 0u32;
        while target.exists() {
            n += 1;
            let mut next = base.clone();
            next.push(format!(".{n}"));
            target = PathBuf::from(next);
        }

        fs::rename(path, &target)?;
        Ok(target)
    }
}

impl<C: Codec> RecordStore for FileStore<C> {
    fn load(
        &self,
        namespace: &str,
    ) -> Result<Option<RecordMap>, StorageError> {
        if self.migrate_on_load {
            // A broken legacy file shouldn't stop the current one loading.
            if let Err(e) = self.migrate_legacy(namespace) {
                tracing::warn!(namespace, error = %e, "legacy migration failed");
            }
        }

        let path = self.path_for(namespace)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(namespace, path = %path.display(), "no data file yet");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match self.decode_file(namespace, &bytes) {
            Ok(records) => Ok(Some(records)),
            Err(e) => {
                match self.set_aside(&path) {
                    Ok(moved) => tracing::warn!(
                        namespace,
                        error = %e,
                        moved_to = %moved.display(),
                        "unreadable data file set aside"
                    ),
                    Err(rename_err) => tracing::error!(
                        namespace,
                        error = %e,
                        rename_error = %rename_err,
                        "unreadable data file could not be set aside"
                    ),
                }
                Err(e)
            }
        }
    }

    fn save(
        &self,
        namespace: &str,
        records: &RecordMap,
    ) -> Result<(), StorageError> {
        let path = self.path_for(namespace)?;
        fs::create_dir_all(&self.data_dir)?;

        let payload = self.codec.encode(records)?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&payload);

        let mut tmp = path.clone().into_os_string();
        tmp.push(TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        let written = write_synced(&tmp, &bytes)
            .and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::debug!(
                    namespace,
                    error = %cleanup,
                    "could not remove temp file"
                );
            }
            return Err(e.into());
        }

        tracing::debug!(namespace, count = records.len(), "saved records");
        Ok(())
    }
}

/// Writes `bytes` to a new file at `path` and waits until they reach the
/// disk.
fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Namespaces become file names, so they must stay a single path
/// component.
fn check_namespace(namespace: &str) -> Result<(), StorageError> {
    let bad = namespace.is_empty()
        || namespace.contains(['/', '\\'])
        || namespace.contains("..");
    if bad {
        return Err(StorageError::InvalidNamespace(namespace.to_owned()));
    }
    Ok(())
}
