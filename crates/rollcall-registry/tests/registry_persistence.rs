//! Integration tests: a `PlayerRegistry` backed by a real `FileStore`,
//! restarted between steps the way a game server would be.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rollcall_protocol::{PlayerId, PlayerRecord, RecordMap};
use rollcall_registry::{GameEntity, PlayerRegistry, RegistryConfig};
use rollcall_storage::{FileStore, FileStoreConfig, RecordStore};

// =========================================================================
// Mock host entity
// =========================================================================

struct Avatar {
    slot: u64,
    name: Mutex<String>,
}

impl Avatar {
    fn new(slot: u64, name: &str) -> Arc<Self> {
        Arc::new(Self {
            slot,
            name: Mutex::new(name.to_owned()),
        })
    }

    fn rename(&self, name: &str) {
        *self.name.lock().unwrap() = name.to_owned();
    }
}

impl GameEntity for Avatar {
    type Handle = u64;

    fn handle(&self) -> u64 {
        self.slot
    }

    fn name(&self) -> String {
        self.name.lock().unwrap().clone()
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn store(dir: &Path) -> FileStore {
    FileStore::open(FileStoreConfig {
        data_dir: dir.to_path_buf(),
        migrate_legacy: true,
    })
}

/// Starts a registry the way a fresh server process would.
fn boot(dir: &Path) -> PlayerRegistry<Avatar, FileStore> {
    PlayerRegistry::new(store(dir), RegistryConfig::default())
}

fn id_name_pairs(reg: &PlayerRegistry<Avatar, FileStore>) -> Vec<(String, String)> {
    let mut pairs: Vec<_> = reg
        .all_players()
        .map(|p| (p.id().to_string(), p.name().to_owned()))
        .collect();
    pairs.sort();
    pairs
}

// =========================================================================
// Restart behaviour
// =========================================================================

#[test]
fn test_restart_restores_identical_id_name_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let before = {
        let mut reg = boot(dir.path());
        reg.on_join(&Avatar::new(1, "Ada"));
        reg.on_join(&Avatar::new(7, "Nova"));
        reg.on_join(&Avatar::new(42, "Zed"));
        id_name_pairs(&reg)
    };

    let reg = boot(dir.path());

    assert_eq!(id_name_pairs(&reg), before);
    assert_eq!(reg.connected_len(), 0, "sessions don't survive a restart");
}

#[test]
fn test_restart_keeps_latest_name_after_rename() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut reg = boot(dir.path());
        let nova = Avatar::new(7, "Nova");
        reg.on_join(&nova);
        reg.on_connect(&nova);
        assert_eq!(reg.connected_players().count(), 1);
        nova.rename("NovaX");
        reg.on_join(&nova);
    }

    let reg = boot(dir.path());

    assert_eq!(reg.get_player("7").unwrap().name(), "NovaX");
    assert_eq!(reg.records().len(), 1);
}

#[test]
fn test_rejoin_after_restart_rebinds_stored_player() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut reg = boot(dir.path());
        reg.on_join(&Avatar::new(3, "Cy"));
    }
    let mut reg = boot(dir.path());
    assert!(!reg.get_player(3u64).unwrap().is_bound());

    let cy = Avatar::new(3, "Cy");
    reg.on_join(&cy);

    let bound = reg.get_player(3u64).unwrap().entity().unwrap();
    assert!(Arc::ptr_eq(bound, &cy));
    assert_eq!(reg.len(), 1);
}

#[test]
fn test_boot_with_corrupt_file_starts_empty_and_recovers_on_join() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("rollcall.players.data"), b"garbage").unwrap();

    let mut reg = boot(dir.path());
    assert!(reg.is_empty());

    reg.on_join(&Avatar::new(1, "Ada"));

    let reloaded = boot(dir.path());
    assert_eq!(reloaded.get_player("1").unwrap().name(), "Ada");
}

#[test]
fn test_boot_on_newer_format_keeps_history_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut reg = boot(dir.path());
        for slot in 0..50u64 {
            reg.on_join(&Avatar::new(slot, &format!("player{slot}")));
        }
    }
    // Pretend a newer build wrote the file, then the server rolled back.
    let data = dir.path().join("rollcall.players.data");
    let mut bytes = fs::read(&data).unwrap();
    bytes[4] = 2;
    fs::write(&data, &bytes).unwrap();

    let mut reg = boot(dir.path());
    assert!(reg.is_empty());
    reg.on_join(&Avatar::new(99, "Late"));
    assert_eq!(boot(dir.path()).len(), 1);

    // The unreadable file survived the save; restoring its version
    // brings all 50 players back.
    let aside = dir.path().join("rollcall.players.data.corrupt");
    let mut recovered = fs::read(&aside).unwrap();
    recovered[4] = 1;
    fs::write(&data, &recovered).unwrap();
    assert_eq!(boot(dir.path()).len(), 50);
}

#[test]
fn test_boot_migrates_legacy_json_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("rollcall.players.json"),
        r#"{"5":{"id":"5","name":"Eve"},"6":{"id":"6","name":"Finn"}}"#,
    )
    .unwrap();

    let reg = boot(dir.path());

    assert_eq!(reg.len(), 2);
    assert_eq!(reg.find_player("finn").unwrap().id().as_str(), "6");
    assert!(!dir.path().join("rollcall.players.json").exists());
}

#[test]
fn test_registries_sharing_a_store_use_separate_namespaces() {
    let dir = tempfile::tempdir().unwrap();
    let shared = Arc::new(store(dir.path()));

    let mut red: PlayerRegistry<Avatar, _> = PlayerRegistry::new(
        Arc::clone(&shared),
        RegistryConfig {
            namespace: "red".into(),
        },
    );
    let mut blue: PlayerRegistry<Avatar, _> = PlayerRegistry::new(
        Arc::clone(&shared),
        RegistryConfig {
            namespace: "blue".into(),
        },
    );
    red.on_join(&Avatar::new(1, "Ada"));
    blue.on_join(&Avatar::new(1, "Bo"));

    let red_saved = shared.load("red").unwrap().unwrap();
    let blue_saved = shared.load("blue").unwrap().unwrap();
    assert_eq!(red_saved["1"].name, "Ada");
    assert_eq!(blue_saved["1"].name, "Bo");
}

#[test]
fn test_boot_from_seeded_records() {
    // A store filled by some other tool is picked up as-is.
    let dir = tempfile::tempdir().unwrap();
    let mut seeded = RecordMap::new();
    seeded.insert(PlayerId::from(11u64), PlayerRecord::new(11u64, "Kai"));
    store(dir.path()).save("rollcall.players", &seeded).unwrap();

    let reg = boot(dir.path());

    assert_eq!(reg.get_player(11u64).unwrap().name(), "Kai");
    assert_eq!(reg.find_players("11").len(), 1);
}
