//! # Storage Client
//!
//! A typed Rust client for the `"Storage"` native module.
//!
//! This crate hides the dynamic argument marshalling of the bridge behind the
//! seven store operations with ordinary Rust types.
//!
//! ## Quick Start
//!
//! ```rust
//! use storage_bridge::ModuleRegistry;
//! use storage_client::StorageClient;
//! use storage_core::KeyValueStore;
//!
//! fn main() -> Result<(), storage_client::Error> {
//!     let registry = ModuleRegistry::with_storage(KeyValueStore::new());
//!     let client = StorageClient::new(&registry)?;
//!
//!     client.set("my-key", "my-value")?;
//!
//!     if let Some(value) = client.get("my-key")? {
//!         println!("Got: {}", value);
//!     }
//!
//!     client.remove("my-key")?;
//!     Ok(())
//! }
//! ```
//!
//! ## JSON Serialization (requires `json` feature)
//!
//! ```rust,ignore
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! let user = User { name: "Alice".into(), age: 30 };
//! client.set_json("user:1", &user)?;
//!
//! let retrieved: Option<User> = client.get_json("user:1")?;
//! ```

mod error;
mod options;

pub use error::Error;
pub use options::{StorageClientOptions, DEFAULT_MODULE_NAME};

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use storage_bridge::{ModuleRegistry, NativeModule};

/// A typed client for the Storage module.
///
/// The module is resolved once, when the client is created. The client is
/// thread-safe and can be cloned cheaply (it uses internal Arc).
#[derive(Clone)]
pub struct StorageClient {
    module: Arc<dyn NativeModule>,
}

impl StorageClient {
    /// Resolve the default `"Storage"` module from `registry`.
    ///
    /// Fails with [`Error::ModuleNotFound`] if it is not registered.
    pub fn new(registry: &ModuleRegistry) -> Result<Self, Error> {
        Self::with_options(registry, StorageClientOptions::default())
    }

    /// Resolve the module named in `options` from `registry`.
    pub fn with_options(registry: &ModuleRegistry, options: StorageClientOptions) -> Result<Self, Error> {
        let module = registry
            .get_enforcing(&options.module_name)
            .map_err(Error::from_bridge)?;

        Ok(Self { module })
    }

    /// Name of the module this client talks to.
    pub fn module_name(&self) -> &str {
        self.module.name()
    }

    fn call(&self, method: &'static str, args: &[Value]) -> Result<Value, Error> {
        Ok(self.module.invoke(method, args)?)
    }

    fn call_bool(&self, method: &'static str, args: &[Value]) -> Result<bool, Error> {
        match self.call(method, args)? {
            Value::Bool(b) => Ok(b),
            value => Err(Error::UnexpectedResponse { method, value }),
        }
    }

    /// Store a value, overwriting any previous value for `key`.
    ///
    /// Returns `false` if the store could not hold the entry.
    pub fn set(&self, key: &str, value: &str) -> Result<bool, Error> {
        self.call_bool("set", &[Value::from(key), Value::from(value)])
    }

    /// Retrieve a value.
    ///
    /// Returns `None` if the key doesn't exist. An empty string is a
    /// present value, not a miss.
    pub fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match self.call("get", &[Value::from(key)])? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            value => Err(Error::UnexpectedResponse { method: "get", value }),
        }
    }

    /// Delete a key.
    ///
    /// Returns `true` if the key existed and was deleted, `false` otherwise.
    pub fn remove(&self, key: &str) -> Result<bool, Error> {
        self.call_bool("remove", &[Value::from(key)])
    }

    /// Check if a key exists.
    pub fn has(&self, key: &str) -> Result<bool, Error> {
        self.call_bool("has", &[Value::from(key)])
    }

    /// Delete every entry.
    pub fn clear(&self) -> Result<(), Error> {
        self.call("clear", &[])?;
        Ok(())
    }

    /// Number of entries currently stored.
    pub fn size(&self) -> Result<usize, Error> {
        let value = self.call("size", &[])?;
        value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(Error::UnexpectedResponse { method: "size", value })
    }

    /// Snapshot of all keys, in no particular order.
    pub fn get_all_keys(&self) -> Result<Vec<String>, Error> {
        match self.call("getAllKeys", &[])? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    value => Err(Error::UnexpectedResponse {
                        method: "getAllKeys",
                        value,
                    }),
                })
                .collect(),
            value => Err(Error::UnexpectedResponse {
                method: "getAllKeys",
                value,
            }),
        }
    }
}

impl fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageClient")
            .field("module", &self.module.name())
            .finish()
    }
}

// JSON extension methods (only available with "json" feature)
#[cfg(feature = "json")]
impl StorageClient {
    /// Store a JSON-serializable value.
    pub fn set_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<bool, Error> {
        let json = serde_json::to_string(value).map_err(Error::Serialization)?;
        self.set(key, &json)
    }

    /// Retrieve and deserialize a JSON value.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        match self.get(key)? {
            Some(json) => {
                let value = serde_json::from_str(&json).map_err(Error::Deserialization)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}
