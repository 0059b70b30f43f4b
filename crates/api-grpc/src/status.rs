//! Call status resolution.
//!
//! Precedence:
//! 1. A returned error decides the status, even when the response also
//!    carries a failing business code.
//! 2. Without an error, the response's business status accessors are probed
//!    in fixed order (`retcode`, `ret_code`, `code`).
//! 3. Otherwise the call is a plain success.

use crate::error::status_from_grpc;
use flowlog_domain::{
    probe_status_code, CallStatus, ErrorCategory, ResponseStatus, RpcError, StructuredError,
    RET_UNKNOWN,
};
use std::error::Error;

/// Resolves the status of a finished call
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusResolver;

impl StatusResolver {
    pub fn new() -> Self {
        Self
    }

    /// Determine code, message and category of a call.
    pub fn resolve<R>(&self, error: Option<&(dyn Error + 'static)>, response: &R) -> CallStatus
    where
        R: ResponseStatus + ?Sized,
    {
        if let Some(err) = error {
            return inspect_error(err).unwrap_or_else(|| CallStatus {
                code: RET_UNKNOWN,
                message: err.to_string(),
                category: ErrorCategory::None,
            });
        }

        match probe_status_code(response) {
            Some(code) => CallStatus::from_code(code),
            None => CallStatus::ok(),
        }
    }
}

/// Structured view of an error, if it has one.
///
/// Recognizes [`RpcError`] and `tonic::Status`; every other error type is
/// opaque.
pub fn inspect_error(err: &(dyn Error + 'static)) -> Option<CallStatus> {
    if let Some(rpc_error) = err.downcast_ref::<RpcError>() {
        return Some(from_structured(rpc_error));
    }
    if let Some(status) = err.downcast_ref::<tonic::Status>() {
        return Some(status_from_grpc(status));
    }
    None
}

fn from_structured(err: &dyn StructuredError) -> CallStatus {
    CallStatus {
        code: err.code(),
        message: err.message().to_string(),
        category: err.category(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowlog_domain::codes;
    use std::fmt;

    struct Reply {
        code: i32,
    }

    impl ResponseStatus for Reply {
        fn code(&self) -> Option<i32> {
            Some(self.code)
        }
    }

    struct FailedReply;

    impl ResponseStatus for FailedReply {
        fn retcode(&self) -> Option<i32> {
            Some(4001)
        }
    }

    #[derive(Debug)]
    struct Opaque;

    impl fmt::Display for Opaque {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection reset by peer")
        }
    }

    impl Error for Opaque {}

    #[test]
    fn test_structured_error_wins_over_response() {
        let err = RpcError::business(100, "x");
        let status = StatusResolver::new().resolve(Some(&err), &FailedReply);
        assert_eq!(status.code, 100);
        assert_eq!(status.message, "x");
        assert_eq!(status.category, ErrorCategory::Business);
    }

    #[test]
    fn test_response_code_without_error() {
        let status = StatusResolver::new().resolve(None, &Reply { code: 7 });
        assert_eq!(status, CallStatus::from_code(7));
        assert_eq!(status.category.label(), "");
    }

    #[test]
    fn test_nothing_to_report() {
        let status = StatusResolver::new().resolve(None, &());
        assert_eq!(status, CallStatus::ok());

        let missing: Option<Reply> = None;
        assert_eq!(StatusResolver::new().resolve(None, &missing), CallStatus::ok());
    }

    #[test]
    fn test_opaque_error_is_unknown() {
        let status = StatusResolver::new().resolve(Some(&Opaque), &Reply { code: 0 });
        assert_eq!(status.code, RET_UNKNOWN);
        assert_eq!(status.message, "connection reset by peer");
        assert_eq!(status.category, ErrorCategory::None);
    }

    #[test]
    fn test_grpc_status_is_structured() {
        let err = tonic::Status::deadline_exceeded("too slow");
        let status = StatusResolver::new().resolve(Some(&err), &());
        assert_eq!(status.code, tonic::Code::DeadlineExceeded as i32);
        assert_eq!(status.message, "too slow");
    }

    #[test]
    fn test_inspect_error() {
        let err = RpcError::callee_framework(codes::RET_SERVER_TIMEOUT, "server timeout");
        let status = inspect_error(&err).unwrap();
        assert_eq!(status.category.label(), "callee_framework");
        assert!(inspect_error(&Opaque).is_none());
    }
}
