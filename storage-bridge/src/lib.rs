//! # Storage Bridge
//!
//! Exposes a [`KeyValueStore`](storage_core::KeyValueStore) to a host
//! application through a name-indexed module registry.
//!
//! The store is registered as the `"Storage"` module. Hosts invoke its seven
//! methods (`set`, `get`, `remove`, `has`, `clear`, `size`, `getAllKeys`) with
//! positional JSON arguments and receive JSON results.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use storage_bridge::{ModuleRegistry, StorageModule};
//! use storage_core::KeyValueStore;
//!
//! let store = KeyValueStore::new();
//! let mut registry = ModuleRegistry::new();
//! registry.register(StorageModule::new(store.clone()));
//!
//! registry.call("Storage", "set", &[json!("a"), json!("1")]).unwrap();
//! assert_eq!(registry.call("Storage", "size", &[]).unwrap(), json!(1));
//! assert_eq!(store.get("a").as_deref(), Some("1"));
//! ```

mod config;
mod error;
pub mod frame;
mod module;
mod registry;
mod service;

pub use config::{HostConfig, INITIAL_CAPACITY_VAR, SHARDS_VAR};
pub use error::BridgeError;
pub use module::NativeModule;
pub use registry::ModuleRegistry;
pub use service::StorageModule;
