//! The host's view of a player.
//!
//! Rollcall never creates or owns game entities. The host hands them
//! over (as `Arc<E>`) on each lifecycle callback, and the registry reads
//! two things from them: the session handle and the display name.

use rollcall_protocol::PlayerId;

/// A live player object owned by the host game.
///
/// # Trait bounds
///
/// `Send + Sync + 'static` lets a registry holding `Arc<E>` handles be
/// moved into a Tokio task and driven from there.
///
/// # Example
///
/// ```rust
/// use std::sync::Mutex;
/// use rollcall_registry::GameEntity;
///
/// struct Avatar {
///     slot: u32,
///     name: Mutex<String>,
/// }
///
/// impl GameEntity for Avatar {
///     type Handle = u32;
///
///     fn handle(&self) -> u32 {
///         self.slot
///     }
///
///     fn name(&self) -> String {
///         self.name.lock().map(|n| n.clone()).unwrap_or_default()
///     }
/// }
/// ```
pub trait GameEntity: Send + Sync + 'static {
    /// The host's handle type. Any integer type [`PlayerId`] converts
    /// from works, signed ones included.
    type Handle: Into<PlayerId>;

    /// The per-session handle. The player's id is its decimal string
    /// form, so `-1` becomes `"-1"`.
    fn handle(&self) -> Self::Handle;

    /// The current display name. Hosts may let players rename, so this
    /// is read fresh on every join.
    fn name(&self) -> String;
}
