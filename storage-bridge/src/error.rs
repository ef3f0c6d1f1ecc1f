//! Error types for the bridge layer.

use thiserror::Error;

/// Errors raised while resolving or invoking a native module.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// No module is registered under the requested name
    #[error("module '{0}' is not registered")]
    ModuleNotFound(String),

    /// The module does not expose the requested method
    #[error("module '{module}' has no method '{method}'")]
    UnknownMethod { module: String, method: String },

    /// Wrong number of arguments for the method
    #[error("{method} expects {expected} argument(s), got {actual}")]
    Arity {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// An argument had the wrong type
    #[error("{method}: argument {index} {reason}")]
    InvalidArgument {
        method: String,
        index: usize,
        reason: String,
    },

    /// A frame could not be decoded or encoded
    #[error("frame codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Reading or writing the host channel failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
