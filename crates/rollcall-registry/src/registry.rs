//! The player registry: tracks every player ever seen and who's online.
//!
//! This is the central piece of the registry layer. It's responsible for:
//! - Rebuilding the all-time index from storage at start-up
//! - Creating or renaming records on join, and saving them
//! - Tracking which players are connected right now
//! - Answering exact-id lookups and partial-name searches
//!
//! # Concurrency note
//!
//! `PlayerRegistry` is NOT thread-safe by itself; it uses plain
//! `HashMap`s. The host's lifecycle callbacks arrive from one sequential
//! context, so the registry is owned by that context. Hosts that call in
//! from several tasks wrap it in a single actor or mutex at a higher
//! level (see `rollcall::RegistryHandle`).

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use rollcall_protocol::{PlayerId, PlayerRecord, RecordMap};
use rollcall_storage::RecordStore;

use crate::{GameEntity, Player, RegistryConfig, RegistryError};

/// Maps transient session handles to stable player identities.
///
/// ## Lifecycle
///
/// ```text
///            on_join() ─────────────→ records + all-time index (saved)
///               │
///            on_connect() ──────────→ connected index
///               │
///            on_disconnect() ───────→ removed from connected index only
/// ```
///
/// Ids are never removed from the records or the all-time index.
pub struct PlayerRegistry<E, S> {
    /// Durable `{id, name}` pairs, saved as a whole after every change.
    records: RecordMap,

    /// One handle per id ever seen. Kept in lockstep with `records`.
    all_players: HashMap<PlayerId, Player<E>>,

    /// One handle per live session. Every key here is also a key in
    /// `all_players`.
    connected_players: HashMap<PlayerId, Player<E>>,

    store: S,
    config: RegistryConfig,
}

impl<E: GameEntity, S: RecordStore> PlayerRegistry<E, S> {
    /// Creates a registry and loads its records from `store`.
    ///
    /// A missing namespace starts the registry empty. So does an
    /// unreadable one: the error is logged and start-up carries on, since
    /// losing the name history is better than refusing to host players.
    pub fn new(store: S, config: RegistryConfig) -> Self {
        let namespace = config.namespace.as_str();
        let records = match store.load(namespace) {
            Ok(Some(records)) => records,
            Ok(None) => {
                tracing::debug!(namespace, "no stored players, starting empty");
                RecordMap::new()
            }
            Err(e) => {
                tracing::warn!(
                    namespace,
                    error = %e,
                    "failed to load stored players, starting empty"
                );
                RecordMap::new()
            }
        };

        let all_players: HashMap<_, _> = records
            .values()
            .map(|record| (record.id.clone(), Player::from_record(record)))
            .collect();

        tracing::info!(namespace, count = all_players.len(), "player registry loaded");

        Self {
            records,
            all_players,
            connected_players: HashMap::new(),
            store,
            config,
        }
    }

    // =====================================================================
    // Lifecycle callbacks
    // =====================================================================

    /// Records that `entity` has joined the game.
    ///
    /// Creates the player's record on first sight, otherwise overwrites
    /// its name. Either way the all-time entry is replaced with a handle
    /// bound to `entity`, and the full record map is saved before
    /// returning. A failed save is logged, not returned: the in-memory
    /// state is already correct and the next save will include it.
    pub fn on_join(&mut self, entity: &Arc<E>) -> &Player<E> {
        let id: PlayerId = entity.handle().into();
        let name = entity.name();

        match self.records.get_mut(&id) {
            Some(record) => {
                if record.name != name {
                    tracing::info!(
                        player_id = %id,
                        old_name = %record.name,
                        new_name = %name,
                        "player rejoined under a new name"
                    );
                } else {
                    tracing::info!(player_id = %id, %name, "player rejoined");
                }
                record.name.clone_from(&name);
            }
            None => {
                tracing::info!(player_id = %id, %name, "new player joined");
                self.records
                    .insert(id.clone(), PlayerRecord::new(id.clone(), name.clone()));
            }
        }

        self.persist();

        let player = Player::bound(id.clone(), name, Arc::clone(entity));
        replace(&mut self.all_players, id, player)
    }

    /// Records that `entity` now holds a live session.
    ///
    /// Any existing connected entry for the same id is overwritten, so a
    /// reconnect without a clean disconnect is fine. If the id has never
    /// joined, it is joined first so that every connected player also
    /// has an all-time entry and a record.
    pub fn on_connect(&mut self, entity: &Arc<E>) -> &Player<E> {
        let id: PlayerId = entity.handle().into();

        if !self.all_players.contains_key(&id) {
            tracing::warn!(player_id = %id, "connect without prior join, joining first");
            self.on_join(entity);
        }

        let player = Player::bound(id.clone(), entity.name(), Arc::clone(entity));
        tracing::info!(player_id = %id, name = %player.name(), "player connected");
        replace(&mut self.connected_players, id, player)
    }

    /// Records that `entity`'s session has ended.
    ///
    /// Only the connected index changes. Returns the removed handle, or
    /// `None` if the player wasn't connected (not an error).
    pub fn on_disconnect(&mut self, entity: &E) -> Option<Player<E>> {
        let id: PlayerId = entity.handle().into();
        let removed = self.connected_players.remove(&id);

        if removed.is_some() {
            tracing::info!(player_id = %id, "player disconnected");
        } else {
            tracing::debug!(player_id = %id, "disconnect for player not connected");
        }
        removed
    }

    // =====================================================================
    // Exact lookups
    // =====================================================================

    /// Looks up a player by id in the all-time index.
    ///
    /// Accepts anything convertible to a [`PlayerId`]: the id itself, a
    /// string, or the host's numeric handle.
    pub fn get_player(&self, id: impl Into<PlayerId>) -> Option<&Player<E>> {
        self.all_players.get(&id.into())
    }

    /// Looks up a player by id in the connected index.
    pub fn get_connected_player(&self, id: impl Into<PlayerId>) -> Option<&Player<E>> {
        self.connected_players.get(&id.into())
    }

    /// Returns `true` if the player holds a live session.
    pub fn is_connected(&self, id: impl Into<PlayerId>) -> bool {
        self.connected_players.contains_key(&id.into())
    }

    /// Looks up the durable record for an id.
    pub fn record(&self, id: impl Into<PlayerId>) -> Option<&PlayerRecord> {
        self.records.get(&id.into())
    }

    // =====================================================================
    // Enumeration
    // =====================================================================

    /// Every player ever seen, in no particular order.
    pub fn all_players(&self) -> impl ExactSizeIterator<Item = &Player<E>> {
        self.all_players.values()
    }

    /// Every currently connected player, in no particular order.
    pub fn connected_players(&self) -> impl ExactSizeIterator<Item = &Player<E>> {
        self.connected_players.values()
    }

    /// The durable record map as last saved (or as pending a save).
    pub fn records(&self) -> &RecordMap {
        &self.records
    }

    // =====================================================================
    // Search
    // =====================================================================

    /// Finds the one player matching `partial`.
    ///
    /// A player matches if its name contains `partial` ignoring case, or
    /// its id equals `partial` exactly. Returns `None` when nothing
    /// matches and also when more than one player does; use
    /// [`find_players`](Self::find_players) to see the candidates.
    pub fn find_player(&self, partial: &str) -> Option<&Player<E>> {
        let needle = partial.to_lowercase();
        let mut matches = self
            .all_players
            .values()
            .filter(|&p| name_or_id_matches(p, partial, &needle));

        let first = matches.next()?;
        if matches.next().is_some() {
            tracing::debug!(partial, "ambiguous player search");
            return None;
        }
        Some(first)
    }

    /// Every player whose name contains `partial` ignoring case, or whose
    /// id equals `partial` exactly.
    pub fn find_players(&self, partial: &str) -> Vec<&Player<E>> {
        let needle = partial.to_lowercase();
        self.all_players
            .values()
            .filter(|&p| name_or_id_matches(p, partial, &needle))
            .collect()
    }

    /// The first connected player whose name contains `partial` ignoring
    /// case.
    ///
    /// Unlike [`find_player`](Self::find_player) this neither checks ids
    /// nor requires a unique match.
    pub fn find_connected_player(&self, partial: &str) -> Option<&Player<E>> {
        let needle = partial.to_lowercase();
        self.connected_players
            .values()
            .find(|&p| name_matches(p, &needle))
    }

    /// Every connected player whose name contains `partial` ignoring case.
    /// Ids are not checked.
    pub fn find_connected_players(&self, partial: &str) -> Vec<&Player<E>> {
        let needle = partial.to_lowercase();
        self.connected_players
            .values()
            .filter(|&p| name_matches(p, &needle))
            .collect()
    }

    // =====================================================================
    // Persistence
    // =====================================================================

    /// Saves the full record map now.
    ///
    /// Joins already save on their own; this is for hosts that want a
    /// final save on shutdown, or a retry after a failed one, and want
    /// to see the error.
    pub fn save(&self) -> Result<(), RegistryError> {
        self.store.save(&self.config.namespace, &self.records)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.config.namespace, &self.records) {
            tracing::error!(
                namespace = %self.config.namespace,
                error = %e,
                "failed to save players, will retry on next join"
            );
        }
    }

    // =====================================================================
    // Size
    // =====================================================================

    /// Number of players ever seen.
    pub fn len(&self) -> usize {
        self.all_players.len()
    }

    /// Returns `true` if no player has ever been seen.
    pub fn is_empty(&self) -> bool {
        self.all_players.is_empty()
    }

    /// Number of live sessions.
    pub fn connected_len(&self) -> usize {
        self.connected_players.len()
    }

    /// The storage namespace this registry persists to.
    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }
}

/// Inserts `player` under `id`, replacing any previous entry, and returns
/// a reference to the stored handle.
fn replace<E>(
    map: &mut HashMap<PlayerId, Player<E>>,
    id: PlayerId,
    player: Player<E>,
) -> &Player<E> {
    match map.entry(id) {
        Entry::Occupied(mut slot) => {
            slot.insert(player);
            slot.into_mut()
        }
        Entry::Vacant(slot) => slot.insert(player),
    }
}

/// `needle` is `partial` already lowercased.
fn name_matches<E>(player: &Player<E>, needle: &str) -> bool {
    player.name().to_lowercase().contains(needle)
}

fn name_or_id_matches<E>(player: &Player<E>, partial: &str, needle: &str) -> bool {
    name_matches(player, needle) || player.id().as_str() == partial
}

// =========================================================================
// Tests
// =========================================================================
