//! Registry configuration.

use serde::{Deserialize, Serialize};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "rollcall.players";

/// Configuration for a [`PlayerRegistry`](crate::PlayerRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Storage namespace the record map is loaded from and saved to.
    ///
    /// Two registries sharing a store must use different namespaces or
    /// they'll overwrite each other's records.
    pub namespace: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_owned(),
        }
    }
}
