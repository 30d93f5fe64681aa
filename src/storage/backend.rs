//! Storage traits and the legacy enumeration adapter.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Asynchronous key-value backend holding persisted slices.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Enumerate every key the backend currently holds.
    async fn get_all_keys(&self) -> Result<Vec<String>>;

    /// Fetch one stored value by exact key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;
}

/// Backend exposing `keys` instead of `get_all_keys`.
#[async_trait]
pub trait LegacyStorage: Send + Sync {
    async fn keys(&self) -> Result<Vec<String>>;

    async fn get_item(&self, key: &str) -> Result<Option<String>>;
}

/// Presents a [`LegacyStorage`] backend through the canonical [`Storage`] contract.
pub struct LegacyAdapter<S> {
    inner: S,
}

impl<S: LegacyStorage> LegacyAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: LegacyStorage> Storage for LegacyAdapter<S> {
    async fn get_all_keys(&self) -> Result<Vec<String>> {
        self.inner.keys().await
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key).await
    }
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for Arc<S> {
    async fn get_all_keys(&self) -> Result<Vec<String>> {
        (**self).get_all_keys().await
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key).await
    }
}
