use serde_json::Value;
use storage_core::KeyValueStore;

use crate::error::BridgeError;
use crate::module::{expect_arity, string_arg, NativeModule};

/// Methods exposed by [`StorageModule`], in host naming
const METHODS: &[&str] = &["set", "get", "remove", "has", "clear", "size", "getAllKeys"];

/// Truncates a key for safe logging (prevents leaking sensitive key data)
fn truncate_key_for_log(key: &str) -> String {
    const MAX_LOG_CHARS: usize = 16;
    match key.char_indices().nth(MAX_LOG_CHARS) {
        Some((cut, _)) => format!("{}...", &key[..cut]),
        None => key.to_string(),
    }
}

/// The "Storage" native module
///
/// Marshals the seven store operations between dynamic host values and a
/// [`KeyValueStore`] handle. Absent values come back as `null`, counts as
/// numbers and key listings as arrays of strings.
pub struct StorageModule {
    store: KeyValueStore,
}

impl StorageModule {
    /// Name the module is registered under in the host registry
    pub const NAME: &'static str = "Storage";

    pub fn new(store: KeyValueStore) -> Self {
        Self { store }
    }

    /// The store this module serves
    pub fn store(&self) -> &KeyValueStore {
        &self.store
    }
}

impl NativeModule for StorageModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, BridgeError> {
        match method {
            "set" => {
                expect_arity(method, args, 2)?;
                let key = string_arg(method, args, 0)?;
                let value = string_arg(method, args, 1)?;
                tracing::debug!("SET {}", truncate_key_for_log(key));

                let stored = self.store.set(key, value);
                if !stored {
                    tracing::warn!("SET {} failed: entry could not be allocated", truncate_key_for_log(key));
                }
                Ok(Value::Bool(stored))
            }
            "get" => {
                expect_arity(method, args, 1)?;
                let key = string_arg(method, args, 0)?;
                tracing::debug!("GET {}", truncate_key_for_log(key));

                Ok(self.store.get(key).map_or(Value::Null, Value::String))
            }
            "remove" => {
                expect_arity(method, args, 1)?;
                let key = string_arg(method, args, 0)?;
                tracing::debug!("REMOVE {}", truncate_key_for_log(key));

                Ok(Value::Bool(self.store.remove(key)))
            }
            "has" => {
                expect_arity(method, args, 1)?;
                let key = string_arg(method, args, 0)?;
                tracing::debug!("HAS {}", truncate_key_for_log(key));

                Ok(Value::Bool(self.store.has(key)))
            }
            "clear" => {
                expect_arity(method, args, 0)?;
                tracing::warn!("CLEAR: removing all {} entries", self.store.size());

                self.store.clear();
                Ok(Value::Null)
            }
            "size" => {
                expect_arity(method, args, 0)?;
                tracing::debug!("SIZE");

                Ok(Value::from(self.store.size()))
            }
            "getAllKeys" => {
                expect_arity(method, args, 0)?;
                tracing::debug!("GET_ALL_KEYS");

                let keys = self.store.get_all_keys().into_iter().map(Value::String).collect();
                Ok(Value::Array(keys))
            }
            _ => Err(BridgeError::UnknownMethod {
                module: Self::NAME.to_string(),
                method: method.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_module() -> StorageModule {
        StorageModule::new(KeyValueStore::new())
    }

    #[test]
    fn test_truncate_key_for_log_short() {
        assert_eq!(truncate_key_for_log("short"), "short");
    }

    #[test]
    fn test_truncate_key_for_log_long() {
        let long_key = "this_is_a_very_long_key_that_should_be_truncated";
        let truncated = truncate_key_for_log(long_key);
        assert_eq!(truncated, "this_is_a_very_l...");
    }

    #[test]
    fn test_truncate_key_for_log_multibyte() {
        // Must not split a multi-byte character
        let key = "ключ_ключ_ключ_ключ";
        assert_eq!(truncate_key_for_log(key), "ключ_ключ_ключ_к...");
    }

    #[test]
    fn test_set_and_get() {
        let module = create_test_module();

        let set = module.invoke("set", &[json!("a"), json!("1")]).unwrap();
        assert_eq!(set, json!(true));

        let get = module.invoke("get", &[json!("a")]).unwrap();
        assert_eq!(get, json!("1"));
    }

    #[test]
    fn test_get_missing_is_null() {
        let module = create_test_module();
        assert_eq!(module.invoke("get", &[json!("missing")]).unwrap(), Value::Null);
    }

    #[test]
    fn test_remove_and_has() {
        let module = create_test_module();
        module.invoke("set", &[json!("a"), json!("1")]).unwrap();

        assert_eq!(module.invoke("has", &[json!("a")]).unwrap(), json!(true));
        assert_eq!(module.invoke("remove", &[json!("a")]).unwrap(), json!(true));
        assert_eq!(module.invoke("remove", &[json!("a")]).unwrap(), json!(false));
        assert_eq!(module.invoke("has", &[json!("a")]).unwrap(), json!(false));
    }

    #[test]
    fn test_size_get_all_keys_and_clear() {
        let module = create_test_module();
        for (k, v) in [("k1", "v1"), ("k2", "v2"), ("k3", "v3")] {
            module.invoke("set", &[json!(k), json!(v)]).unwrap();
        }

        assert_eq!(module.invoke("size", &[]).unwrap(), json!(3));

        let keys = module.invoke("getAllKeys", &[]).unwrap();
        let mut keys: Vec<String> = serde_json::from_value(keys).unwrap();
        keys.sort();
        assert_eq!(keys, vec!["k1", "k2", "k3"]);

        assert_eq!(module.invoke("clear", &[]).unwrap(), Value::Null);
        assert_eq!(module.invoke("size", &[]).unwrap(), json!(0));
        assert_eq!(module.invoke("getAllKeys", &[]).unwrap(), json!([]));
    }

    #[test]
    fn test_module_shares_store_handle() {
        let store = KeyValueStore::new();
        let module = StorageModule::new(store.clone());

        module.invoke("set", &[json!("shared"), json!("yes")]).unwrap();
        assert_eq!(store.get("shared").as_deref(), Some("yes"));
        assert_eq!(module.store().size(), 1);
    }

    #[test]
    fn test_wrong_arity() {
        let module = create_test_module();
        let err = module.invoke("set", &[json!("only-key")]).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Arity { expected: 2, actual: 1, .. }
        ));

        let err = module.invoke("size", &[json!("extra")]).unwrap_err();
        assert!(matches!(err, BridgeError::Arity { expected: 0, .. }));
    }

    #[test]
    fn test_non_string_argument() {
        let module = create_test_module();
        let err = module.invoke("set", &[json!("key"), json!(5)]).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument { index: 1, .. }));

        let err = module.invoke("get", &[Value::Null]).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument { index: 0, .. }));
    }

    #[test]
    fn test_unknown_method() {
        let module = create_test_module();
        let err = module.invoke("flush", &[]).unwrap_err();
        assert_eq!(err.to_string(), "module 'Storage' has no method 'flush'");
    }

    #[test]
    fn test_methods_listed() {
        let module = create_test_module();
        assert_eq!(module.name(), "Storage");
        assert_eq!(module.methods().len(), 7);
        assert!(module.methods().contains(&"getAllKeys"));
    }
}
