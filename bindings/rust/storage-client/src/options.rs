//! Client configuration options.

/// Default name of the storage module in the host registry
pub const DEFAULT_MODULE_NAME: &str = "Storage";

/// Options for configuring the Storage client.
///
/// # Example
///
/// ```rust
/// use storage_client::StorageClientOptions;
///
/// let options = StorageClientOptions::new().with_module_name("SessionStorage");
/// assert_eq!(options.module_name, "SessionStorage");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageClientOptions {
    /// Name the storage module is registered under
    pub module_name: String,
}

impl StorageClientOptions {
    /// Create options targeting the default `"Storage"` module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the module name to resolve in the registry.
    pub fn with_module_name(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = module_name.into();
        self
    }

    /// Create options from environment variables.
    ///
    /// Reads:
    /// - `STORAGE_MODULE_NAME` - Module name (defaults to "Storage")
    pub fn from_env() -> Self {
        let module_name = std::env::var("STORAGE_MODULE_NAME")
            .unwrap_or_else(|_| DEFAULT_MODULE_NAME.to_string());

        Self { module_name }
    }
}

impl Default for StorageClientOptions {
    fn default() -> Self {
        Self {
            module_name: DEFAULT_MODULE_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_module_name() {
        assert_eq!(StorageClientOptions::default().module_name, "Storage");
        assert_eq!(StorageClientOptions::new(), StorageClientOptions::default());
    }

    #[test]
    fn test_with_module_name() {
        let options = StorageClientOptions::new().with_module_name("Other");
        assert_eq!(options.module_name, "Other");
    }
}
