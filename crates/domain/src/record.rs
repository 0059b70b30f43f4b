//! Flow log record types.
//!
//! A [`FlowLogRecord`] describes one intercepted call: who called whom, over
//! which addresses, how the call ended and how long it took. Records are
//! built once per call and rendered to a single JSON line.

use crate::errors::codes;
use serde::{Serialize, Serializer};
use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::Duration;

/// Which side of the call this process was on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// This process received the call (server side)
    Inbound,
    /// This process issued the call (client side)
    Outbound,
}

impl Direction {
    /// Label used in the serialized record
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One participant of a call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceEndpoint {
    /// Service name
    pub name: String,
    /// Method name
    pub method: String,
    /// Environment / namespace the call runs in
    pub namespace: String,
    /// Transport address, empty when unknown
    pub address: String,
}

/// Origin classification of a call error.
///
/// Labels are informational only; they never change the code or message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No classification (success, opaque errors)
    #[default]
    None,
    /// Business logic failure reported by the handler
    Business,
    /// Framework failure reported by the remote callee
    CalleeFramework,
    /// Framework failure raised locally
    Framework,
}

impl ErrorCategory {
    /// Label written to the `status.type` field
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Business => "business",
            Self::CalleeFramework => "callee_framework",
            Self::Framework => "framework",
        }
    }

    /// Numeric wire value, as carried in error metadata
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::Framework => 1,
            Self::Business => 2,
            Self::CalleeFramework => 3,
        }
    }

    /// Map a numeric wire value; unknown values classify as `None`
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::Framework,
            2 => Self::Business,
            3 => Self::CalleeFramework,
            _ => Self::None,
        }
    }
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ErrorCategory {
    type Err = std::convert::Infallible;

    /// Accepts labels and numeric wire values; anything else is `None`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s.trim() {
            "business" => Self::Business,
            "callee_framework" => Self::CalleeFramework,
            "framework" => Self::Framework,
            other => other.parse::<i32>().map(Self::from_i32).unwrap_or_default(),
        };
        Ok(category)
    }
}

impl Serialize for ErrorCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

/// Normalized outcome of a call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallStatus {
    /// Numeric status code, 0 on success
    pub code: i32,
    /// Human-readable message, empty unless an error was returned
    pub message: String,
    /// Error classification
    #[serde(rename = "type")]
    pub category: ErrorCategory,
}

impl CallStatus {
    /// Status of a call that succeeded without a business code
    pub fn ok() -> Self {
        Self::default()
    }

    /// Status carrying only a business code read from the response
    pub fn from_code(code: i32) -> Self {
        Self {
            code,
            ..Self::default()
        }
    }

    /// True when the code is `RET_OK`
    pub fn is_success(&self) -> bool {
        self.code == codes::RET_OK
    }
}

/// One flow log entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLogRecord {
    /// Whether this process received or issued the call
    #[serde(rename = "kind")]
    pub direction: Direction,
    /// Call originator
    pub source: ServiceEndpoint,
    /// Call destination
    pub target: ServiceEndpoint,
    /// Normalized outcome
    pub status: CallStatus,
    /// Bounded request body text
    #[serde(rename = "request", serialize_with = "serialize_body")]
    pub request_body: String,
    /// Bounded response body text
    #[serde(rename = "response", serialize_with = "serialize_body")]
    pub response_body: String,
    /// Wall-clock time spent in the wrapped handler
    #[serde(rename = "cost", serialize_with = "serialize_duration_as_text")]
    pub elapsed: Duration,
}

impl FlowLogRecord {
    /// Create a record with empty bodies and zero elapsed time
    pub fn new(
        direction: Direction,
        source: ServiceEndpoint,
        target: ServiceEndpoint,
        status: CallStatus,
    ) -> Self {
        Self {
            direction,
            source,
            target,
            status,
            request_body: String::new(),
            response_body: String::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Render the record as a single JSON line
    pub fn one_line_string(&self) -> String {
        // Every field is a plain string or number, so this cannot fail in
        // practice; keep the Debug rendering as a last resort anyway.
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

impl Display for FlowLogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.one_line_string())
    }
}

#[derive(Serialize)]
struct Body<'a> {
    body: &'a str,
}

fn serialize_body<S>(body: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    Body { body }.serialize(serializer)
}

/// Serialize a Duration as human-readable text (`1.5ms`, `20µs`).
pub fn serialize_duration_as_text<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&format_args!("{:?}", duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> FlowLogRecord {
        let mut record = FlowLogRecord::new(
            Direction::Inbound,
            ServiceEndpoint {
                name: "caller".to_string(),
                method: "/caller/Run".to_string(),
                namespace: "test".to_string(),
                address: "10.0.0.2:5000".to_string(),
            },
            ServiceEndpoint {
                name: "callee".to_string(),
                method: "/callee/Get".to_string(),
                namespace: "test".to_string(),
                address: "10.0.0.1:8000".to_string(),
            },
            CallStatus {
                code: 501,
                message: "timeout".to_string(),
                category: ErrorCategory::Framework,
            },
        );
        record.request_body = "{\"id\":1}".to_string();
        record.elapsed = Duration::from_millis(3);
        record
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(ErrorCategory::None.label(), "");
        assert_eq!(ErrorCategory::Business.label(), "business");
        assert_eq!(ErrorCategory::CalleeFramework.label(), "callee_framework");
        assert_eq!(ErrorCategory::Framework.label(), "framework");
    }

    #[test]
    fn test_category_wire_values() {
        for category in [
            ErrorCategory::None,
            ErrorCategory::Business,
            ErrorCategory::CalleeFramework,
            ErrorCategory::Framework,
        ] {
            assert_eq!(ErrorCategory::from_i32(category.as_i32()), category);
        }
        assert_eq!(ErrorCategory::from_i32(42), ErrorCategory::None);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("framework".parse::<ErrorCategory>().unwrap(), ErrorCategory::Framework);
        assert_eq!("2".parse::<ErrorCategory>().unwrap(), ErrorCategory::Business);
        assert_eq!("bogus".parse::<ErrorCategory>().unwrap(), ErrorCategory::None);
    }

    #[test]
    fn test_record_is_single_line_json() {
        let line = sample_record().one_line_string();
        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["kind"], "inbound");
        assert_eq!(value["source"]["address"], "10.0.0.2:5000");
        assert_eq!(value["target"]["name"], "callee");
        assert_eq!(value["status"]["code"], 501);
        assert_eq!(value["status"]["message"], "timeout");
        assert_eq!(value["status"]["type"], "framework");
        assert_eq!(value["request"]["body"], "{\"id\":1}");
        assert_eq!(value["response"]["body"], "");
        assert_eq!(value["cost"], "3ms");
    }

    #[test]
    fn test_multiline_body_is_escaped() {
        let mut record = sample_record();
        record.response_body = "line one\nline two".to_string();
        assert!(!record.one_line_string().contains('\n'));
    }

    #[test]
    fn test_call_status_helpers() {
        assert!(CallStatus::ok().is_success());
        let status = CallStatus::from_code(7);
        assert_eq!(status.code, 7);
        assert!(status.message.is_empty());
        assert_eq!(status.category, ErrorCategory::None);
        assert!(!status.is_success());
    }
}
