//! Restores persisted slices from a storage backend.
//!
//! A restore runs in four phases:
//! 1. Enumerate every key held by the backend
//! 2. Keep keys under the configured prefix that pass the whitelist
//!    and blacklist (blacklist wins)
//! 3. Issue one retrieval per surviving key, all in a single pass
//! 4. Once every retrieval has resolved, deserialize and run inverse
//!    transforms over each result
//!
//! Per-key failures drop that slice and are otherwise silent. Only a failed
//! enumeration is reported to the caller.

use crate::config::RehydrateConfig;
use crate::error::{RehydrateError, Result};
use crate::transform::apply_outbound;
use crate::types::{PendingFetch, RestoreStats, RestoredState};
use futures::future::join_all;
use serde_json::Value;
use std::collections::HashSet;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Rebuilds a [`RestoredState`] from storage.
#[derive(Clone, Debug)]
pub struct Rehydrator {
    config: RehydrateConfig,
}

impl Rehydrator {
    pub fn new(config: RehydrateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RehydrateConfig {
        &self.config
    }

    /// Restore every selected slice.
    ///
    /// Resolves once all retrievals have completed. Fails only if the
    /// backend could not enumerate its keys.
    pub async fn restore(&self) -> Result<RestoredState> {
        self.restore_with_stats().await.map(|(state, _)| state)
    }

    /// Restore and deliver the outcome to `on_complete`.
    ///
    /// The restore is spawned on the current tokio runtime and this returns
    /// immediately. `on_complete` runs exactly once: with `(None, state)` on
    /// success, or with `(Some(err), empty)` if enumeration failed.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn restore_with<F>(self, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(Option<RehydrateError>, RestoredState) + Send + 'static,
    {
        tokio::spawn(async move {
            match self.restore().await {
                Ok(state) => on_complete(None, state),
                Err(e) => on_complete(Some(e), RestoredState::new()),
            }
        })
    }

    /// Restore, also returning counters for the run.
    #[tracing::instrument(skip_all, fields(prefix = %self.config.key_prefix))]
    pub async fn restore_with_stats(&self) -> Result<(RestoredState, RestoreStats)> {
        let mut stats = RestoreStats::default();
        let mut restored = RestoredState::new();

        let all_keys = match self.config.storage.get_all_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                let err = match e {
                    RehydrateError::Enumeration(_) => e,
                    other => RehydrateError::Enumeration(other.to_string()),
                };
                if self.config.mode.warnings_enabled() {
                    warn!(error = %err, "Error in storage key enumeration");
                }
                return Err(err);
            }
        };
        stats.discovered = all_keys.len();

        let selected = self.select_keys(all_keys);
        stats.selected = selected.len();
        debug!(
            discovered = stats.discovered,
            selected = stats.selected,
            "Selected keys to restore"
        );

        if selected.is_empty() {
            return Ok((restored, stats));
        }

        // join_all polls every retrieval before any result is handled.
        let storage = &self.config.storage;
        let fetches = selected.into_iter().map(|raw_key| {
            let fetch = self.pending_fetch(raw_key);
            async move {
                let result = storage.get_item(&fetch.storage_key).await;
                (fetch, result)
            }
        });
        let results = join_all(fetches).await;

        let issued = results.len();
        for (completed, (fetch, result)) in results.into_iter().enumerate() {
            let outcome = match result {
                Ok(Some(serialized)) => self.rehydrate_slice(&fetch.slice, &serialized),
                Ok(None) => Err(RehydrateError::MissingValue(fetch.storage_key.clone())),
                Err(e) => Err(RehydrateError::Fetch {
                    key: fetch.storage_key.clone(),
                    reason: e.to_string(),
                }),
            };

            match outcome {
                Ok(value) => {
                    restored.insert(fetch.slice, value);
                }
                Err(e) => {
                    stats.failed += 1;
                    if self.config.mode.warnings_enabled() {
                        warn!(key = %fetch.raw_key, error = %e, "Error restoring data for key");
                    }
                }
            }

            trace!(completed = completed + 1, issued, "Fetch handled");
        }

        stats.restored = restored.len();
        debug!(
            restored = stats.restored,
            failed = stats.failed,
            "Restore complete"
        );

        Ok((restored, stats))
    }

    /// Keep keys under the prefix that pass the whitelist and blacklist.
    ///
    /// Returned keys have the prefix stripped. Filter entries are slice names
    /// and are mapped through the fragmentation function before comparison.
    pub fn select_keys(&self, all_keys: Vec<String>) -> Vec<String> {
        let tree = self.config.current_tree();
        let map = |slices: &[String]| -> HashSet<String> {
            slices
                .iter()
                .map(|slice| self.config.fragment_key(slice, tree.as_ref()))
                .collect()
        };
        let whitelist = self.config.whitelist.as_deref().map(map);
        let blacklist = map(&self.config.blacklist);

        all_keys
            .into_iter()
            .filter_map(|key| {
                key.strip_prefix(self.config.key_prefix.as_str())
                    .map(str::to_string)
            })
            .filter(|raw| whitelist.as_ref().map_or(true, |w| w.contains(raw)))
            .filter(|raw| !blacklist.contains(raw))
            .collect()
    }

    /// Deserialize a stored value and run the inverse transforms over it.
    pub fn rehydrate_slice(&self, slice: &str, serialized: &str) -> Result<Value> {
        let value = self.config.serializer.deserialize(slice, serialized)?;
        apply_outbound(&self.config.transforms, value, slice)
    }

    fn pending_fetch(&self, raw_key: String) -> PendingFetch {
        let tree = self.config.current_tree();
        PendingFetch {
            storage_key: self.config.storage_key(&raw_key, tree.as_ref()),
            slice: self.config.reducer_key(&raw_key, tree.as_ref()),
            raw_key,
        }
    }
}

/// Restore all persisted slices described by `config`.
pub async fn get_stored_state(config: RehydrateConfig) -> Result<RestoredState> {
    Rehydrator::new(config).restore().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::Serializer;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn seeded() -> MemoryStorage {
        [
            ("persist:a", r#"{"x":1}"#),
            ("persist:b", r#"{"y":2}"#),
            ("other:c", r#"{"z":3}"#),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_select_keys_prefix() {
        let rehydrator = Rehydrator::new(RehydrateConfig::new(MemoryStorage::new()));
        let keys = vec![
            "persist:a".to_string(),
            "other:persist:b".to_string(),
            "persist:".to_string(),
        ];
        assert_eq!(rehydrator.select_keys(keys), vec!["a", ""]);
    }

    #[test]
    fn test_select_keys_blacklist_wins() {
        let rehydrator = Rehydrator::new(
            RehydrateConfig::new(MemoryStorage::new())
                .with_whitelist(["a", "b"])
                .with_blacklist(["b"]),
        );
        let keys = vec![
            "persist:a".to_string(),
            "persist:b".to_string(),
            "persist:c".to_string(),
        ];
        assert_eq!(rehydrator.select_keys(keys), vec!["a"]);
    }

    #[test]
    fn test_select_keys_empty_whitelist_selects_nothing() {
        let rehydrator = Rehydrator::new(
            RehydrateConfig::new(MemoryStorage::new()).with_whitelist(Vec::<String>::new()),
        );
        assert!(rehydrator
            .select_keys(vec!["persist:a".to_string()])
            .is_empty());
    }

    #[test]
    fn test_select_keys_maps_filters_through_fragmentation() {
        let rehydrator = Rehydrator::new(
            RehydrateConfig::new(MemoryStorage::new())
                .with_whitelist(["todos"])
                .with_create_fragmented_key(|key, _| format!("{}#0", key)),
        );
        let keys = vec!["persist:todos#0".to_string(), "persist:todos".to_string()];
        assert_eq!(rehydrator.select_keys(keys), vec!["todos#0"]);
    }

    #[test]
    fn test_rehydrate_slice_passthrough() {
        let rehydrator = Rehydrator::new(
            RehydrateConfig::new(MemoryStorage::new()).with_serializer(Serializer::Passthrough),
        );
        assert_eq!(
            rehydrator.rehydrate_slice("a", "raw").unwrap(),
            json!("raw")
        );
    }

    #[tokio::test]
    async fn test_restore_basic() {
        let (state, stats) = Rehydrator::new(RehydrateConfig::new(seeded()))
            .restore_with_stats()
            .await
            .unwrap();

        assert_eq!(Value::Object(state), json!({"a": {"x": 1}, "b": {"y": 2}}));
        assert_eq!(
            stats,
            RestoreStats {
                discovered: 3,
                selected: 2,
                restored: 2,
                failed: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_restore_counts_bad_json_as_failed() {
        let storage = seeded();
        storage.set_item("persist:bad", "{nope");

        let (state, stats) = Rehydrator::new(RehydrateConfig::new(storage))
            .restore_with_stats()
            .await
            .unwrap();

        assert!(!state.contains_key("bad"));
        assert_eq!(stats.selected, 3);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.restored, 2);
    }

    #[tokio::test]
    async fn test_get_stored_state() {
        let config = RehydrateConfig::new(seeded()).with_key_prefix("other:");
        let state = get_stored_state(config).await.unwrap();
        assert_eq!(Value::Object(state), json!({"c": {"z": 3}}));
    }
}
