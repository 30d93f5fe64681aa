//! Shared test backends.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use rehydrate::{MemoryStorage, RehydrateError, Result, Storage};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Backend wrapping `MemoryStorage` with injectable failures and delays.
#[derive(Default)]
pub struct FaultyStorage {
    pub inner: MemoryStorage,
    /// Fail key enumeration.
    pub fail_enumeration: bool,
    /// Keys whose retrieval fails.
    pub failing_keys: HashSet<String>,
    /// Keys whose retrieval never completes.
    pub hanging_keys: HashSet<String>,
    /// Per-key retrieval delay.
    pub delays: HashMap<String, Duration>,
    /// Every key passed to `get_item`, in call order.
    pub fetched: Mutex<Vec<String>>,
}

impl FaultyStorage {
    pub fn new(items: &[(&str, &str)]) -> Self {
        Self {
            inner: items.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn failing(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    pub fn hanging(mut self, key: &str) -> Self {
        self.hanging_keys.insert(key.to_string());
        self
    }

    pub fn delayed(mut self, key: &str, millis: u64) -> Self {
        self.delays
            .insert(key.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn broken_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }
}

#[async_trait]
impl Storage for FaultyStorage {
    async fn get_all_keys(&self) -> Result<Vec<String>> {
        if self.fail_enumeration {
            return Err(RehydrateError::Storage("backend offline".into()));
        }
        self.inner.get_all_keys().await
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.fetched.lock().push(key.to_string());

        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        if self.hanging_keys.contains(key) {
            futures::future::pending::<()>().await;
        }
        if self.failing_keys.contains(key) {
            return Err(RehydrateError::Storage(format!("read failed: {}", key)));
        }
        self.inner.get_item(key).await
    }
}

/// Standard three-key fixture: two under `persist:`, one outside.
pub fn scenario_items() -> Vec<(&'static str, &'static str)> {
    vec![
        ("persist:a", r#"{"x":1}"#),
        ("persist:b", r#"{"y":2}"#),
        ("other:c", r#"{"z":3}"#),
    ]
}
