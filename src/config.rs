//! Rehydration configuration.

use crate::error::{RehydrateError, Result};
use crate::serializer::Serializer;
use crate::storage::Storage;
use crate::transform::Transform;
use crate::types::{RuntimeMode, StateSource, TreeState, DEFAULT_KEY_PREFIX};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Maps a key to another key, given the current tree state (if any).
pub type KeyMapFn = dyn Fn(&str, Option<&TreeState>) -> String + Send + Sync;

/// Rehydration configuration.
#[derive(Clone)]
pub struct RehydrateConfig {
    /// Backend holding the persisted slices.
    pub storage: Arc<dyn Storage>,

    /// Deserializer for stored values.
    /// Default: JSON
    pub serializer: Serializer,

    /// Slices allowed to be restored (None = no inclusion rule).
    pub whitelist: Option<Vec<String>>,

    /// Slices never restored. Wins over the whitelist.
    pub blacklist: Vec<String>,

    /// Transforms in configuration order. Inverses run last-first.
    pub transforms: Vec<Arc<dyn Transform>>,

    /// Prefix shared by every storage key.
    /// Default: `DEFAULT_KEY_PREFIX`
    pub key_prefix: String,

    /// Slice name -> storage key suffix (None = identity).
    pub create_fragmented_key: Option<Arc<KeyMapFn>>,

    /// Storage key suffix -> slice name (None = identity).
    pub fragment_key_to_reducer_key: Option<Arc<KeyMapFn>>,

    /// Live state tree handed to the key mapping functions.
    pub state_source: Option<Arc<dyn StateSource>>,

    /// Controls whether failures are reported as warnings.
    pub mode: RuntimeMode,
}

impl RehydrateConfig {
    /// Create a config with default options over `storage`.
    pub fn new<S: Storage + 'static>(storage: S) -> Self {
        Self::with_shared_storage(Arc::new(storage))
    }

    /// Create a config with default options over an already shared backend.
    pub fn with_shared_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            serializer: Serializer::default(),
            whitelist: None,
            blacklist: Vec::new(),
            transforms: Vec::new(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            create_fragmented_key: None,
            fragment_key_to_reducer_key: None,
            state_source: None,
            mode: RuntimeMode::default(),
        }
    }

    /// Create a config over `storage` from plain options.
    pub fn from_options(storage: Arc<dyn Storage>, options: RehydrateOptions) -> Self {
        let mut config = Self::with_shared_storage(storage);
        config.apply_options(options);
        config
    }

    /// Overwrite the plain options of this config.
    pub fn apply_options(&mut self, options: RehydrateOptions) {
        self.key_prefix = options.key_prefix;
        self.whitelist = options.whitelist;
        self.blacklist = options.blacklist;
        self.mode = options.mode;
        if !options.serialize {
            self.serializer = Serializer::Passthrough;
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_serializer(mut self, serializer: Serializer) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn with_whitelist<I, S>(mut self, slices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = Some(slices.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_blacklist<I, S>(mut self, slices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist = slices.into_iter().map(Into::into).collect();
        self
    }

    /// Append a transform. Order matters: see [`crate::transform`].
    pub fn with_transform<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Arc::new(transform));
        self
    }

    pub fn with_create_fragmented_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, Option<&TreeState>) -> String + Send + Sync + 'static,
    {
        self.create_fragmented_key = Some(Arc::new(f));
        self
    }

    pub fn with_fragment_key_to_reducer_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, Option<&TreeState>) -> String + Send + Sync + 'static,
    {
        self.fragment_key_to_reducer_key = Some(Arc::new(f));
        self
    }

    pub fn with_state_source<S: StateSource + 'static>(mut self, source: S) -> Self {
        self.state_source = Some(Arc::new(source));
        self
    }

    pub fn with_mode(mut self, mode: RuntimeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Read the live tree state, if a state source is attached.
    pub fn current_tree(&self) -> Option<TreeState> {
        self.state_source.as_ref().map(|source| source.get_state())
    }

    /// Map a slice name to its storage key suffix.
    pub fn fragment_key(&self, slice: &str, tree: Option<&TreeState>) -> String {
        match &self.create_fragmented_key {
            Some(f) => f(slice, tree),
            None => slice.to_string(),
        }
    }

    /// Map a discovered storage key suffix back to its slice name.
    pub fn reducer_key(&self, raw_key: &str, tree: Option<&TreeState>) -> String {
        match &self.fragment_key_to_reducer_key {
            Some(f) => f(raw_key, tree),
            None => raw_key.to_string(),
        }
    }

    /// Full storage key for a raw key.
    pub fn storage_key(&self, raw_key: &str, tree: Option<&TreeState>) -> String {
        format!("{}{}", self.key_prefix, self.fragment_key(raw_key, tree))
    }
}

impl fmt::Debug for RehydrateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RehydrateConfig")
            .field("serializer", &self.serializer)
            .field("whitelist", &self.whitelist)
            .field("blacklist", &self.blacklist)
            .field("transforms", &self.transforms.len())
            .field("key_prefix", &self.key_prefix)
            .field("create_fragmented_key", &self.create_fragmented_key.is_some())
            .field(
                "fragment_key_to_reducer_key",
                &self.fragment_key_to_reducer_key.is_some(),
            )
            .field("state_source", &self.state_source.is_some())
            .field("mode", &self.mode)
            .finish()
    }
}

/// Plain, serializable subset of [`RehydrateConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RehydrateOptions {
    pub key_prefix: String,
    pub whitelist: Option<Vec<String>>,
    pub blacklist: Vec<String>,
    /// False disables deserialization (values are restored as raw strings).
    pub serialize: bool,
    pub mode: RuntimeMode,
}

impl Default for RehydrateOptions {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            whitelist: None,
            blacklist: Vec::new(),
            serialize: true,
            mode: RuntimeMode::default(),
        }
    }
}

impl RehydrateOptions {
    /// Parse options from a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RehydrateError::InvalidOptions(e.to_string()))
    }
}
