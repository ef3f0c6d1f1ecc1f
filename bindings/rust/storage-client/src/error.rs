//! Error types for the Storage client.

use storage_bridge::BridgeError;
use thiserror::Error;

/// Errors that can occur when using the Storage client.
#[derive(Error, Debug)]
pub enum Error {
    /// The configured module is not registered with the host
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// The bridge rejected the call
    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// The bridge answered with a value of the wrong shape
    #[error("unexpected response from {method}: {value}")]
    UnexpectedResponse {
        method: &'static str,
        value: serde_json::Value,
    },

    /// JSON serialization error (requires `json` feature)
    #[cfg(feature = "json")]
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON deserialization error (requires `json` feature)
    #[cfg(feature = "json")]
    #[error("Deserialization error: {0}")]
    Deserialization(#[source] serde_json::Error),
}

impl Error {
    /// Returns `true` if the module could not be resolved.
    pub fn is_module_not_found(&self) -> bool {
        matches!(self, Error::ModuleNotFound(_))
    }

    /// Converts a resolution failure into [`Error::ModuleNotFound`]
    pub(crate) fn from_bridge(error: BridgeError) -> Self {
        match error {
            BridgeError::ModuleNotFound(name) => Error::ModuleNotFound(name),
            other => Error::Bridge(other),
        }
    }
}
