//! # Rehydrate
//!
//! Restores a persisted application-state tree from an asynchronous
//! key-value storage backend.
//!
//! ## Core Concepts
//!
//! - **Slices**: Named subtrees of the state, each persisted under its own key
//! - **Storage**: Async backend that can list keys and fetch one value
//! - **Transforms**: Reversible operations; inverses run last-first on restore
//! - **Fragmentation**: Optional mapping between slice names and storage keys
//!
//! ## Example
//!
//! ```ignore
//! use rehydrate::{MemoryStorage, RehydrateConfig, Rehydrator};
//!
//! let storage = MemoryStorage::new();
//! storage.set_item("persist:session", r#"{"user":"ada"}"#);
//!
//! let config = RehydrateConfig::new(storage).with_blacklist(["router"]);
//!
//! // Await the restored state
//! let state = Rehydrator::new(config.clone()).restore().await?;
//!
//! // Or receive it through a callback
//! Rehydrator::new(config).restore_with(|err, state| {
//!     if let Some(err) = err {
//!         eprintln!("restore failed: {err}");
//!     }
//!     println!("restored {} slices", state.len());
//! });
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod rehydrator;
pub mod serializer;
pub mod storage;
pub mod transform;
pub mod types;

// Re-exports
pub use config::{KeyMapFn, RehydrateConfig, RehydrateOptions};
pub use error::{RehydrateError, Result};
pub use rehydrator::{get_stored_state, Rehydrator};
pub use serializer::Serializer;
pub use storage::{LegacyAdapter, LegacyStorage, MemoryStorage, Storage};
pub use transform::{apply_inbound, apply_outbound, Transform};
pub use types::*;
