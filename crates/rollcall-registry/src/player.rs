//! The runtime player handle.
//!
//! A [`Player`] pairs an identity (`id`, `name`) with, optionally, the
//! live game entity it was built from:
//!
//! - Built from a stored record at start-up → **unbound** (no entity).
//! - Built on join or connect → **bound** to that session's entity.
//!
//! Entries in the all-time index keep the entity from the player's last
//! join, so between a disconnect and the next join they point at a
//! stale session. Entries in the connected index are always current.

use std::fmt;
use std::sync::Arc;

use rollcall_protocol::{PlayerId, PlayerRecord};

/// A player known to the registry.
pub struct Player<E> {
    id: PlayerId,
    name: String,
    entity: Option<Arc<E>>,
}

impl<E> Player<E> {
    /// An unbound player rebuilt from a stored record.
    pub(crate) fn from_record(record: &PlayerRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            entity: None,
        }
    }

    /// A player bound to a live entity.
    pub(crate) fn bound(id: PlayerId, name: String, entity: Arc<E>) -> Self {
        Self {
            id,
            name,
            entity: Some(entity),
        }
    }

    /// The stable identity key.
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// The name seen when this handle was built.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The game entity this handle was built from, if any.
    pub fn entity(&self) -> Option<&Arc<E>> {
        self.entity.as_ref()
    }

    /// Returns `true` if this handle references a game entity.
    pub fn is_bound(&self) -> bool {
        self.entity.is_some()
    }

    /// The durable form of this player.
    pub fn to_record(&self) -> PlayerRecord {
        PlayerRecord {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

// Manual impls: cloning or printing a player only touches the `Arc`,
// so `E` itself needn't be `Clone` or `Debug`.
impl<E> Clone for Player<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            entity: self.entity.clone(),
        }
    }
}

impl<E> fmt::Debug for Player<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("bound", &self.is_bound())
            .finish()
    }
}
