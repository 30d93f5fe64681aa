//! Core types for state rehydration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default prefix prepended to every slice name to form a storage key.
pub const DEFAULT_KEY_PREFIX: &str = "persist:";

/// Environment variable consulted by [`RuntimeMode::from_env`].
pub const RUNTIME_MODE_ENV: &str = "REHYDRATE_ENV";

/// Restored state, keyed by logical slice name.
pub type RestoredState = serde_json::Map<String, serde_json::Value>;

/// Snapshot of the live application state tree.
pub type TreeState = serde_json::Value;

/// Source of the live application state tree.
///
/// Only used as context for key fragmentation and filter mapping.
pub trait StateSource: Send + Sync {
    fn get_state(&self) -> TreeState;
}

impl<F> StateSource for F
where
    F: Fn() -> TreeState + Send + Sync,
{
    fn get_state(&self) -> TreeState {
        self()
    }
}

/// Runtime mode controlling diagnostic output.
///
/// Warnings for per-key and enumeration failures are only emitted in
/// [`RuntimeMode::Development`]. Control flow is identical in both modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeMode {
    #[default]
    Development,
    Production,
}

impl RuntimeMode {
    /// Read the mode from `REHYDRATE_ENV` ("production" selects production).
    pub fn from_env() -> Self {
        match std::env::var(RUNTIME_MODE_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("production") => RuntimeMode::Production,
            _ => RuntimeMode::Development,
        }
    }

    pub fn warnings_enabled(self) -> bool {
        self != RuntimeMode::Production
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeMode::Development => write!(f, "development"),
            RuntimeMode::Production => write!(f, "production"),
        }
    }
}

/// One in-flight retrieval issued during a restore.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingFetch {
    /// Key suffix as discovered in storage (prefix stripped).
    pub raw_key: String,
    /// Exact key passed to the backend.
    pub storage_key: String,
    /// Slice name the restored value is assigned to.
    pub slice: String,
}

/// Counters describing one completed restore.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestoreStats {
    /// Keys returned by the backend.
    pub discovered: usize,
    /// Keys surviving prefix and whitelist/blacklist filtering.
    pub selected: usize,
    /// Slices assigned in the result.
    pub restored: usize,
    /// Keys dropped because of a fetch, deserialization or transform failure.
    pub failed: usize,
}
