//! Core identity types.
//!
//! A player is known to the host game only by a per-session numeric
//! handle. Rollcall turns that handle into a [`PlayerId`] and remembers
//! the last name seen for it in a [`PlayerRecord`].

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The stable identity key of a player.
///
/// This is a newtype around the string form of the host's numeric
/// handle. Keeping it as its own type means the handle is formatted in
/// exactly one place (the `From` impls below) instead of at every call
/// site that needs a map key.
///
/// `#[serde(transparent)]` stores a `PlayerId("7")` as just `"7"`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id and returns the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lets a `HashMap<PlayerId, _>` be queried with a plain `&str`.
impl Borrow<str> for PlayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&PlayerId> for PlayerId {
    fn from(id: &PlayerId) -> Self {
        id.clone()
    }
}

// Numeric session handles. The id is the decimal form of the handle, so
// `PlayerId::from(42u64)` and `PlayerId::from("42")` are the same key.
macro_rules! impl_from_handle {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for PlayerId {
                fn from(handle: $ty) -> Self {
                    Self(handle.to_string())
                }
            }
        )*
    };
}

impl_from_handle!(u16, u32, u64, usize, i32, i64);

// ---------------------------------------------------------------------------
// PlayerRecord
// ---------------------------------------------------------------------------

/// The durable form of a player's identity.
///
/// One record exists per id. It is created the first time the id joins,
/// its `name` is overwritten on every later join, and it is never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// The stable key. Always equal to the map key it is stored under.
    pub id: PlayerId,

    /// The display name seen on the most recent join.
    pub name: String,
}

impl PlayerRecord {
    /// Creates a record for the given id and name.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// All records for one namespace, keyed by id.
pub type RecordMap = HashMap<PlayerId, PlayerRecord>;

/// Checks that every record is stored under its own id.
///
/// Decoding only proves the bytes have the right shape. A hand-edited
/// or legacy data file can still map `"3"` to a record whose id is
/// `"4"`, which would break the one-record-per-id rule.
pub fn verify_record_keys(records: &RecordMap) -> Result<(), ProtocolError> {
    for (key, record) in records {
        if *key != record.id {
            return Err(ProtocolError::InvalidRecord(format!(
                "record stored under {key} carries id {}",
                record.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_from_numeric_handle_matches_string_form() {
        assert_eq!(PlayerId::from(42u64), PlayerId::from("42"));
        assert_eq!(PlayerId::from(7i32), PlayerId::new("7"));
        assert_eq!(PlayerId::from(0usize).as_str(), "0");
    }

    #[test]
    fn test_player_id_display_is_raw_id() {
        assert_eq!(PlayerId::from(12u32).to_string(), "12");
    }

    #[test]
    fn test_player_id_borrow_allows_str_lookup() {
        let mut map = RecordMap::new();
        map.insert(PlayerId::from(5u64), PlayerRecord::new(5u64, "Nova"));

        assert_eq!(map.get("5").map(|r| r.name.as_str()), Some("Nova"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_player_id_serializes_transparently() {
        let json = serde_json::to_string(&PlayerId::from(9u64)).unwrap();
        assert_eq!(json, "\"9\"");
    }

    #[test]
    fn test_verify_record_keys_accepts_consistent_map() {
        let mut map = RecordMap::new();
        map.insert(PlayerId::from("1"), PlayerRecord::new("1", "Ada"));
        map.insert(PlayerId::from("2"), PlayerRecord::new("2", "Bo"));

        assert!(verify_record_keys(&map).is_ok());
    }

    #[test]
    fn test_verify_record_keys_rejects_mismatched_id() {
        let mut map = RecordMap::new();
        map.insert(PlayerId::from("3"), PlayerRecord::new("4", "Cy"));

        let result = verify_record_keys(&map);

        assert!(matches!(result, Err(ProtocolError::InvalidRecord(_))));
    }
}
