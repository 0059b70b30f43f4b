//! Body encoding for flow log records

use flowlog_domain::CallContext;
use serde::Serialize;
use tracing::warn;

/// Renders request and response values as text
pub trait BodyEncoder: Send + Sync {
    /// Encode `value`, returning an empty string when it cannot be encoded.
    fn encode<T>(&self, ctx: &CallContext, value: &T) -> String
    where
        T: Serialize + ?Sized;
}

/// Compact JSON encoding via `serde_json`.
///
/// A missing value encodes as `null`. Encoding failures are logged and
/// produce an empty body; they never fail the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBodyEncoder;

impl BodyEncoder for JsonBodyEncoder {
    fn encode<T>(&self, ctx: &CallContext, value: &T) -> String
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_string(value) {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    request_id = %ctx.request_id(),
                    rpc = %ctx.rpc_name(),
                    error = %e,
                    "Failed to encode flow log body"
                );
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, Serializer};
    use std::collections::HashMap;

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("unsupported payload"))
        }
    }

    #[test]
    fn test_encodes_compact_json() {
        let mut body = HashMap::new();
        body.insert("id", 7);
        let encoded = JsonBodyEncoder.encode(&CallContext::new(), &body);
        assert_eq!(encoded, "{\"id\":7}");
    }

    #[test]
    fn test_missing_value_is_null() {
        let none: Option<u32> = None;
        assert_eq!(JsonBodyEncoder.encode(&CallContext::new(), &none), "null");
    }

    #[test]
    fn test_failure_yields_empty_body() {
        assert_eq!(JsonBodyEncoder.encode(&CallContext::new(), &Unencodable), "");
    }
}
