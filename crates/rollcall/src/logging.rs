//! Logging setup.
//!
//! Library code only emits `tracing` events. Binaries call [`init`] once
//! at start-up to print them.

use tracing_subscriber::EnvFilter;

use crate::RollcallError;

/// Installs a formatted stderr subscriber as the global default.
///
/// `RUST_LOG`, when set and valid, wins over `default_filter`.
///
/// # Errors
/// [`RollcallError::Logging`] if `default_filter` doesn't parse or a
/// global subscriber was already installed.
pub fn init(default_filter: &str) -> Result<(), RollcallError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| RollcallError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| RollcallError::Logging(e.to_string()))
}
