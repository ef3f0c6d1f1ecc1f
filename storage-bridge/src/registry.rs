use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use storage_core::KeyValueStore;

use crate::error::BridgeError;
use crate::module::NativeModule;
use crate::service::StorageModule;

/// Name-indexed table of native modules owned by the host's composition root.
///
/// Registration happens up front; afterwards the registry is shared read-only
/// (typically behind an `Arc`) and modules are resolved by name.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use storage_bridge::ModuleRegistry;
/// use storage_core::KeyValueStore;
///
/// let registry = ModuleRegistry::with_storage(KeyValueStore::new());
/// registry.call("Storage", "set", &[json!("a"), json!("1")]).unwrap();
/// assert_eq!(registry.call("Storage", "get", &[json!("a")]).unwrap(), json!("1"));
/// ```
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn NativeModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with a [`StorageModule`] serving `store`
    pub fn with_storage(store: KeyValueStore) -> Self {
        let mut registry = Self::new();
        registry.register(StorageModule::new(store));
        registry
    }

    /// Registers `module` under its own name, returning any module it replaced
    pub fn register<M>(&mut self, module: M) -> Option<Arc<dyn NativeModule>>
    where
        M: NativeModule + 'static,
    {
        let name = module.name().to_string();
        tracing::info!("registering module {} ({} methods)", name, module.methods().len());

        let previous = self.modules.insert(name, Arc::new(module));
        if let Some(previous) = &previous {
            tracing::warn!("module {} replaced an earlier registration", previous.name());
        }
        previous
    }

    /// Looks up a module by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn NativeModule>> {
        self.modules.get(name).cloned()
    }

    /// Looks up a module by name, failing if it is not registered
    pub fn get_enforcing(&self, name: &str) -> Result<Arc<dyn NativeModule>, BridgeError> {
        self.get(name)
            .ok_or_else(|| BridgeError::ModuleNotFound(name.to_string()))
    }

    /// Resolves `module` and invokes `method` on it
    pub fn call(&self, module: &str, method: &str, args: &[Value]) -> Result<Value, BridgeError> {
        self.get_enforcing(module)?.invoke(method, args)
    }

    /// Names of all registered modules, sorted
    pub fn module_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.module_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoModule;

    impl NativeModule for EchoModule {
        fn name(&self) -> &str {
            "Echo"
        }

        fn methods(&self) -> &'static [&'static str] {
            &["echo"]
        }

        fn invoke(&self, _method: &str, args: &[Value]) -> Result<Value, BridgeError> {
            Ok(Value::Array(args.to_vec()))
        }
    }

    #[test]
    fn test_with_storage_registers_storage() {
        let registry = ModuleRegistry::with_storage(KeyValueStore::new());
        assert_eq!(registry.module_names(), vec!["Storage"]);
        assert!(registry.get("Storage").is_some());
    }

    #[test]
    fn test_get_enforcing_missing_module() {
        let registry = ModuleRegistry::new();
        let err = registry.get_enforcing("Storage").err().unwrap();
        assert!(matches!(err, BridgeError::ModuleNotFound(ref name) if name == "Storage"));
    }

    #[test]
    fn test_call_routes_to_module() {
        let store = KeyValueStore::new();
        let mut registry = ModuleRegistry::with_storage(store.clone());
        registry.register(EchoModule);

        assert_eq!(
            registry.call("Storage", "set", &[json!("k"), json!("v")]).unwrap(),
            json!(true)
        );
        assert_eq!(store.get("k").as_deref(), Some("v"));

        assert_eq!(
            registry.call("Echo", "echo", &[json!(1), json!("two")]).unwrap(),
            json!([1, "two"])
        );
        assert_eq!(registry.module_names(), vec!["Echo", "Storage"]);
    }

    #[test]
    fn test_register_replaces_existing() {
        let first = KeyValueStore::new();
        let second = KeyValueStore::new();
        let mut registry = ModuleRegistry::with_storage(first.clone());

        let replaced = registry.register(StorageModule::new(second.clone()));
        assert!(replaced.is_some());

        registry.call("Storage", "set", &[json!("k"), json!("v")]).unwrap();
        assert!(!first.has("k"));
        assert!(second.has("k"));
    }

    #[test]
    fn test_call_unknown_module() {
        let registry = ModuleRegistry::new();
        let err = registry.call("Nope", "get", &[]).unwrap_err();
        assert_eq!(err.to_string(), "module 'Nope' is not registered");
    }
}
