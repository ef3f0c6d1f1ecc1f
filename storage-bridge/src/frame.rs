//! Line-delimited JSON framing used by the `storage-host` binary.
//!
//! Each request line is an [`Invocation`]; each produces exactly one [`Reply`]
//! line. A line that cannot be decoded gets an error reply and the session
//! carries on.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::BridgeError;
use crate::registry::ModuleRegistry;

/// A single method call sent by the host
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Invocation {
    /// Opaque correlation id, echoed back in the reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub module: String,
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Outcome of one invocation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Reply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, error: impl Into<String>) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Dispatches a decoded invocation through `registry`
pub fn dispatch(registry: &ModuleRegistry, invocation: Invocation) -> Reply {
    match registry.call(&invocation.module, &invocation.method, &invocation.args) {
        Ok(result) => Reply::success(invocation.id, result),
        Err(e) => {
            tracing::debug!("{}.{} rejected: {}", invocation.module, invocation.method, e);
            Reply::failure(invocation.id, e.to_string())
        }
    }
}

/// Decodes one request line and dispatches it
///
/// A line that is valid JSON but not a valid invocation still gets its `id`
/// echoed back in the failure reply.
pub fn handle_line(registry: &ModuleRegistry, line: &str) -> Reply {
    let raw: Value = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("malformed frame: {}", e);
            return Reply::failure(None, BridgeError::Codec(e).to_string());
        }
    };

    let id = raw.get("id").filter(|id| !id.is_null()).cloned();
    match serde_json::from_value::<Invocation>(raw) {
        Ok(invocation) => dispatch(registry, invocation),
        Err(e) => {
            tracing::warn!("malformed frame: {}", e);
            Reply::failure(id, BridgeError::Codec(e).to_string())
        }
    }
}

/// Serves invocations from `reader` until EOF, writing one reply line per request.
///
/// Blank lines are skipped and a line that is not UTF-8 gets an error reply.
/// Only a failure of the underlying reader or writer ends the session early.
/// Returns the number of replies written.
pub async fn serve<R, W>(registry: &ModuleRegistry, mut reader: R, mut writer: W) -> Result<usize, BridgeError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut served = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let reply = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                handle_line(registry, line)
            }
            Err(e) => {
                tracing::warn!("malformed frame: {}", e);
                Reply::failure(None, format!("malformed frame: {}", e))
            }
        };
        let mut encoded = serde_json::to_string(&reply)?;
        encoded.push('\n');

        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        served += 1;
    }

    Ok(served)
}
