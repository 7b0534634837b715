use std::path::Path;

use atelier_state::StateConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Configuration for hydration, persistence and the local state store.
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Log every partial update with its target collection and id.
    pub debug_writes: bool,
    /// Treat data-shape mismatches (unknown tags, a selected surface option
    /// the surface does not offer) as errors instead of dropping the link.
    pub strict: bool,
    /// Default `tracing` filter when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Local state store settings.
    pub state: StateConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debug_writes: false,
            strict: false,
            log_filter: "info".into(),
            state: StateConfig::default(),
        }
    }
}

impl SyncConfig {
    /// A configuration that rejects every data-shape mismatch.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Default::default()
        }
    }

    pub fn from_toml_str(s: &str) -> SyncResult<Self> {
        toml::from_str(s).map_err(|e| SyncError::Config(e.to_string()))
    }

    /// Read a TOML configuration file.
    pub fn load(path: &Path) -> SyncResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
