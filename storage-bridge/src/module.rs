use serde_json::Value;

use crate::error::BridgeError;

/// A module the host can look up by name and invoke with dynamic arguments.
///
/// Implementations must be callable from any thread; the host makes no
/// attempt to serialize invocations.
pub trait NativeModule: Send + Sync {
    /// Name the module is registered under
    fn name(&self) -> &str;

    /// Method names accepted by [`invoke`](Self::invoke)
    fn methods(&self) -> &'static [&'static str];

    /// Invokes `method` with positional `args`
    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, BridgeError>;
}

/// Fails unless exactly `expected` arguments were passed
pub(crate) fn expect_arity(method: &str, args: &[Value], expected: usize) -> Result<(), BridgeError> {
    if args.len() != expected {
        return Err(BridgeError::Arity {
            method: method.to_string(),
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}

/// Borrows argument `index` as a string
pub(crate) fn string_arg<'a>(method: &str, args: &'a [Value], index: usize) -> Result<&'a str, BridgeError> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(BridgeError::InvalidArgument {
            method: method.to_string(),
            index,
            reason: format!("must be a string, got {}", json_type_name(other)),
        }),
        None => Err(BridgeError::Arity {
            method: method.to_string(),
            expected: index + 1,
            actual: args.len(),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expect_arity() {
        assert!(expect_arity("has", &[json!("k")], 1).is_ok());

        let err = expect_arity("has", &[], 1).unwrap_err();
        assert_eq!(err.to_string(), "has expects 1 argument(s), got 0");
    }

    #[test]
    fn test_string_arg() {
        let args = [json!("key"), json!(42)];
        assert_eq!(string_arg("set", &args, 0).unwrap(), "key");

        let err = string_arg("set", &args, 1).unwrap_err();
        assert_eq!(err.to_string(), "set: argument 1 must be a string, got number");
    }

    #[test]
    fn test_string_arg_missing() {
        let err = string_arg("get", &[], 0).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Arity { expected: 1, actual: 0, .. }
        ));
    }
}
