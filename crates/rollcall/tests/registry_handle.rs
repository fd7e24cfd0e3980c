//! Integration tests for the registry actor, driven from several tasks.

use std::sync::{Arc, Mutex};

use rollcall::prelude::*;

// =========================================================================
// Mock host entity
// =========================================================================

struct Avatar {
    slot: u64,
    name: Mutex<String>,
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

fn avatar(slot: u64, name: &str) -> Arc<Avatar> {
    Arc::new(Avatar {
        slot,
        name: Mutex::new(name.to_owned()),
    })
}

fn spawn_in_memory(
    store: Arc<MemoryStore>,
) -> (
    RegistryHandle<Avatar>,
    tokio::task::JoinHandle<PlayerRegistry<Avatar, Arc<MemoryStore>>>,
) {
    let registry = PlayerRegistry::new(store, RegistryConfig::default());
    spawn_registry(registry, 16)
}

// =========================================================================
// Lifecycle through the handle
// =========================================================================

#[tokio::test]
async fn test_handle_join_connect_disconnect_round_trip() {
    let store = Arc::new(MemoryStore::new());
    let (handle, _task) = spawn_in_memory(Arc::clone(&store));
    let nova = avatar(7, "Nova");

    let joined = handle.join(Arc::clone(&nova)).await.unwrap();
    assert_eq!(joined.name(), "Nova");

    handle.connect(Arc::clone(&nova)).await.unwrap();
    assert_eq!(handle.connected_players().await.unwrap().len(), 1);

    let removed = handle.disconnect(Arc::clone(&nova)).await.unwrap();
    assert!(removed.is_some());
    assert!(handle.get_connected_player("7").await.unwrap().is_none());
    assert_eq!(
        handle.get_player(7u64).await.unwrap().map(|p| p.name().to_owned()),
        Some("Nova".to_owned())
    );
}

#[tokio::test]
async fn test_handle_searches_match_registry_semantics() {
    let store = Arc::new(MemoryStore::new());
    let (handle, _task) = spawn_in_memory(store);
    handle.connect(avatar(1, "Alex")).await.unwrap();
    handle.connect(avatar(2, "Alexa")).await.unwrap();
    handle.join(avatar(42, "Zed")).await.unwrap();

    assert!(handle.find_player("alex").await.unwrap().is_none());
    assert_eq!(
        handle.find_player("alexa").await.unwrap().map(|p| p.id().clone()),
        Some(PlayerId::from(2u64))
    );
    assert_eq!(handle.find_players("42").await.unwrap().len(), 1);
    assert!(handle.find_connected_player("alex").await.unwrap().is_some());
    assert_eq!(handle.find_connected_players("ALEX").await.unwrap().len(), 2);
    assert!(handle.find_connected_players("42").await.unwrap().is_empty());
    assert_eq!(handle.all_players().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_handle_concurrent_joins_are_all_recorded() {
    let store = Arc::new(MemoryStore::new());
    let (handle, _task) = spawn_in_memory(Arc::clone(&store));

    let mut tasks = Vec::new();
    for slot in 0..32u64 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            let entity = avatar(slot, &format!("player{slot}"));
            handle.join(Arc::clone(&entity)).await.unwrap();
            handle.connect(entity).await.unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(handle.all_players().await.unwrap().len(), 32);
    assert_eq!(handle.connected_players().await.unwrap().len(), 32);
    let saved = store.load("rollcall.players").unwrap().unwrap();
    assert_eq!(saved.len(), 32);
}

// =========================================================================
// Persistence and shutdown
// =========================================================================

#[tokio::test]
async fn test_handle_save_reports_storage_failure() {
    let store = Arc::new(MemoryStore::new());
    let (handle, _task) = spawn_in_memory(Arc::clone(&store));
    handle.join(avatar(1, "Ada")).await.unwrap();
    store.set_fail_saves(true);

    let result = handle.save().await;

    assert!(matches!(result, Err(RegistryError::Storage(_))));
}

#[tokio::test]
async fn test_handle_shutdown_saves_and_returns_registry() {
    let store = Arc::new(MemoryStore::new());
    let (handle, task) = spawn_in_memory(Arc::clone(&store));
    handle.join(avatar(1, "Ada")).await.unwrap();

    handle.shutdown().await.unwrap();
    let registry = task.await.unwrap();

    assert_eq!(registry.len(), 1);
    assert!(store.contains("rollcall.players"));
}

#[tokio::test]
async fn test_handle_after_shutdown_is_unavailable() {
    let store = Arc::new(MemoryStore::new());
    let (handle, task) = spawn_in_memory(store);
    handle.shutdown().await.unwrap();
    task.await.unwrap();

    let result = handle.get_player("1").await;

    assert!(matches!(result, Err(RegistryError::Unavailable)));
}

#[tokio::test]
async fn test_actor_stops_when_all_handles_dropped() {
    let store = Arc::new(MemoryStore::new());
    let (handle, task) = spawn_in_memory(store);
    handle.join(avatar(3, "Cy")).await.unwrap();

    drop(handle);
    let registry = task.await.unwrap();

    assert_eq!(registry.get_player("3").unwrap().name(), "Cy");
}

#[tokio::test]
async fn test_file_backed_registry_survives_actor_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = RollcallConfig {
        store: FileStoreConfig {
            data_dir: dir.path().to_path_buf(),
            migrate_legacy: true,
        },
        ..RollcallConfig::default()
    };

    let (handle, task) =
        spawn_registry(config.open_registry::<Avatar>(), config.channel_size);
    handle.join(avatar(9, "Ira")).await.unwrap();
    handle.shutdown().await.unwrap();
    task.await.unwrap();

    let (handle, _task) =
        spawn_registry(config.open_registry::<Avatar>(), config.channel_size);
    let ira = handle.find_player("ira").await.unwrap().expect("restored");
    assert_eq!(ira.id().as_str(), "9");
    assert!(!ira.is_bound());
}
