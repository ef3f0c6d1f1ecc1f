use dashmap::DashMap;
use std::collections::TryReserveError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{normalize_shard_amount, StoreConfig, MAX_INITIAL_CAPACITY};
use crate::entry::Entry;

/// Error type for set operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    /// The owned copy of a key or value could not be allocated
    #[error("failed to allocate {bytes} bytes for entry")]
    AllocationFailed {
        /// Size of the string that could not be copied
        bytes: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Thread-safe in-memory key-value store
///
/// Uses `DashMap` for concurrent access. Reads never block other reads,
/// and writes only block access to the shard holding the key being written.
/// Cloning a `KeyValueStore` yields another handle to the same map.
///
/// # Consistency
///
/// `set`, `get`, `remove` and `has` are linearizable per key. `clear`, `size`,
/// `get_all_keys` and `entries` visit the shards one after another, so a writer
/// running concurrently on another shard may or may not be reflected in their
/// result. Without concurrent writers they are exact.
///
/// # Example
///
/// ```rust
/// use storage_core::KeyValueStore;
///
/// let store = KeyValueStore::new();
/// let handle = store.clone();
///
/// store.set("k1", "v1");
/// assert_eq!(handle.get("k1").as_deref(), Some("v1"));
/// ```
#[derive(Clone)]
pub struct KeyValueStore {
    data: Arc<DashMap<String, String>>,
}

impl KeyValueStore {
    /// Creates a new store with default configuration
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a new store with custom configuration
    ///
    /// Out-of-range values written directly into the config fields are
    /// clamped the same way the builder methods clamp them.
    pub fn with_config(config: StoreConfig) -> Self {
        let capacity = config.initial_capacity.min(MAX_INITIAL_CAPACITY);
        let data = match config.shard_amount {
            Some(shards) => DashMap::with_capacity_and_shard_amount(capacity, normalize_shard_amount(shards)),
            None => DashMap::with_capacity(capacity),
        };

        Self {
            data: Arc::new(data),
        }
    }

    fn owned_copy(s: &str) -> Result<String, SetError> {
        let mut owned = String::new();
        owned
            .try_reserve_exact(s.len())
            .map_err(|source| SetError::AllocationFailed {
                bytes: s.len(),
                source,
            })?;
        owned.push_str(s);
        Ok(owned)
    }

    /// Stores `value` under `key`, overwriting any previous value
    ///
    /// Returns `true` once the entry is stored. Returns `false` only if memory
    /// for the entry could not be allocated, in which case the store is unchanged.
    /// Empty strings are valid keys and values.
    pub fn set(&self, key: &str, value: &str) -> bool {
        self.try_set(key, value).is_ok()
    }

    /// Like [`set`](Self::set), but reports why the entry was not stored
    pub fn try_set(&self, key: &str, value: &str) -> Result<(), SetError> {
        let key = Self::owned_copy(key)?;
        let value = Self::owned_copy(value)?;
        self.data.insert(key, value);
        Ok(())
    }

    /// Retrieves the value stored under `key`
    ///
    /// Returns `None` if the key is absent.
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.get(key).map(|entry| entry.value().clone())
    }

    /// Deletes a key from the store
    ///
    /// Returns `true` if an entry was removed, `false` if the key was absent.
    #[must_use = "returns whether the key existed"]
    pub fn remove(&self, key: &str) -> bool {
        self.data.remove(key).is_some()
    }

    /// Checks if a key is present
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Deletes all entries from the store
    ///
    /// Shards are cleared one at a time. An entry written concurrently into a
    /// shard that was already cleared survives the call.
    pub fn clear(&self) {
        self.data.clear();
    }

    /// Returns the number of entries in the store
    ///
    /// Counted shard by shard; see the type-level note on consistency.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the store holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a snapshot of every key currently present, in no particular order
    ///
    /// The returned vector is an owned copy and does not change when the store does.
    pub fn get_all_keys(&self) -> Vec<String> {
        self.data.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Returns a snapshot of every entry currently present, in no particular order
    pub fn entries(&self) -> Vec<Entry> {
        self.data
            .iter()
            .map(|entry| Entry::new(entry.key().as_str(), entry.value().as_str()))
            .collect()
    }
}

impl Default for KeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeyValueStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyValueStore")
            .field("size", &self.data.len())
            .finish()
    }
}
