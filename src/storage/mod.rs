//! Storage capability contract consumed by the rehydrator.
//!
//! A backend must be able to:
//! - Enumerate every key it currently holds
//! - Fetch one stored value by exact key
//!
//! Backends that only expose the older `keys` enumeration can implement
//! [`LegacyStorage`] and be wrapped in a [`LegacyAdapter`].
//!
//! # Example
//!
//! ```ignore
//! let storage = MemoryStorage::new();
//! storage.set_item("persist:session", r#"{"user":"ada"}"#);
//!
//! let keys = storage.get_all_keys().await?;
//! let value = storage.get_item("persist:session").await?;
//! ```

mod backend;
mod memory;

pub use backend::{LegacyAdapter, LegacyStorage, Storage};
pub use memory::MemoryStorage;
