use tracing_subscriber::EnvFilter;

use crate::error::{SyncError, SyncResult};

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (usually
/// [`SyncConfig::log_filter`](crate::SyncConfig::log_filter)) is used.
/// Fails if a global subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> SyncResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| SyncError::Config(e.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| SyncError::Config(e.to_string()))
}
