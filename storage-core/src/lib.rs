//! # Storage Core
//!
//! A concurrent, in-memory key-value store holding string values under string keys.
//!
//! ## Features
//!
//! - Thread-safe storage using `DashMap` (sharded locking, reads never block other reads)
//! - Cheap handle cloning: every clone of a [`KeyValueStore`] shares the same map
//! - Snapshot enumeration of keys and entries
//! - No persistence, no eviction, no capacity limit
//!
//! ## Example
//!
//! ```rust
//! use storage_core::{KeyValueStore, StoreConfig};
//!
//! // Create a store with the default configuration
//! let store = KeyValueStore::new();
//!
//! // Or pre-size it
//! let config = StoreConfig::default().with_initial_capacity(1024);
//! let sized = KeyValueStore::with_config(config);
//! assert!(sized.is_empty());
//!
//! assert!(store.set("user:123", "John Doe"));
//!
//! if let Some(value) = store.get("user:123") {
//!     println!("User: {}", value);
//! }
//!
//! assert!(store.remove("user:123"));
//! assert!(!store.has("user:123"));
//! assert_eq!(store.size(), 0);
//! ```

mod config;
mod entry;
mod store;

pub use config::{StoreConfig, MAX_INITIAL_CAPACITY, MAX_SHARD_AMOUNT};
pub use entry::Entry;
pub use store::{KeyValueStore, SetError};
