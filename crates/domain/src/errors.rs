//! Structured call errors.
//!
//! A structured call error carries a numeric code, a message and an
//! [`ErrorCategory`]. Anything else a handler returns is treated as opaque.

use crate::record::ErrorCategory;

/// Code recorded for errors that do not carry a structured code
pub const RET_UNKNOWN: i32 = 999;

/// Common framework return codes
pub mod codes {
    /// Success
    pub const RET_OK: i32 = 0;
    /// Server-side handler timed out
    pub const RET_SERVER_TIMEOUT: i32 = 21;
    /// Server could not find the requested method
    pub const RET_SERVER_NO_FUNC: i32 = 12;
    /// Client-side call timed out
    pub const RET_CLIENT_TIMEOUT: i32 = 101;
    /// Client could not connect to the callee
    pub const RET_CLIENT_CONNECT_FAIL: i32 = 111;
    /// Unclassified failure
    pub const RET_UNKNOWN: i32 = super::RET_UNKNOWN;
}

/// Read access to a structured call error.
///
/// Implemented by [`RpcError`] and by transport status types that carry the
/// same information.
pub trait StructuredError {
    /// Numeric error code
    fn code(&self) -> i32;

    /// Error message
    fn message(&self) -> &str;

    /// Error origin
    fn category(&self) -> ErrorCategory;
}

/// A call error with code, message and origin category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("type:{}, code:{code}, msg:{message}", category_name(.category))]
pub struct RpcError {
    /// Numeric error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Error origin
    pub category: ErrorCategory,
}

fn category_name(category: &ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::None => "unknown",
        ErrorCategory::Business => "business",
        ErrorCategory::CalleeFramework => "callee framework",
        ErrorCategory::Framework => "framework",
    }
}

impl RpcError {
    /// Create an error with an explicit category
    pub fn new(code: i32, message: impl Into<String>, category: ErrorCategory) -> Self {
        Self {
            code,
            message: message.into(),
            category,
        }
    }

    /// Business error returned by a handler
    pub fn business(code: i32, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorCategory::Business)
    }

    /// Framework error raised by this process
    pub fn framework(code: i32, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorCategory::Framework)
    }

    /// Framework error reported by the remote callee
    pub fn callee_framework(code: i32, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorCategory::CalleeFramework)
    }
}

impl StructuredError for RpcError {
    fn code(&self) -> i32 {
        self.code
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn category(&self) -> ErrorCategory {
        self.category
    }
}
