//! Test fixtures for call contexts and message shapes.
//!
//! Reply types cover each business status accessor the resolver probes,
//! plus one type with none of them.

use fake::{faker::lorem::en::Sentence, Fake};
use flowlog_domain::{CallContext, ResponseStatus};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Address of this process in the fixture contexts
pub const LOCAL_ADDR: &str = "10.0.0.1:8000";
/// Address of the peer in the fixture contexts
pub const REMOTE_ADDR: &str = "10.0.0.2:5000";
/// Logical RPC name of the fixture contexts
pub const RPC_NAME: &str = "/users.v1.UserService/GetUser";

/// Request message used by interceptor tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoRequest {
    pub id: u64,
    pub message: String,
}

/// Reply carrying a `retcode` field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetcodeReply {
    pub retcode: i32,
    pub payload: String,
}

impl ResponseStatus for RetcodeReply {
    fn retcode(&self) -> Option<i32> {
        Some(self.retcode)
    }
}

/// Reply carrying a `ret_code` field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetCodeReply {
    pub ret_code: i32,
}

impl ResponseStatus for RetCodeReply {
    fn ret_code(&self) -> Option<i32> {
        Some(self.ret_code)
    }
}

/// Reply carrying a `code` field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeReply {
    pub code: i32,
}

impl ResponseStatus for CodeReply {
    fn code(&self) -> Option<i32> {
        Some(self.code)
    }
}

/// Reply with both `retcode` and `code`; `retcode` must win
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayeredReply {
    pub retcode: i32,
    pub code: i32,
}

impl ResponseStatus for LayeredReply {
    fn retcode(&self) -> Option<i32> {
        Some(self.retcode)
    }

    fn code(&self) -> Option<i32> {
        Some(self.code)
    }
}

/// Reply without any business status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlainReply {
    pub message: String,
}

impl ResponseStatus for PlainReply {}

/// Fixture local address
pub fn local_addr() -> SocketAddr {
    parse_addr(LOCAL_ADDR)
}

/// Fixture remote address
pub fn remote_addr() -> SocketAddr {
    parse_addr(REMOTE_ADDR)
}

fn parse_addr(addr: &str) -> SocketAddr {
    addr.parse().expect("fixture address is valid")
}

/// Context of a call with both addresses and full identities
pub fn create_test_context() -> CallContext {
    CallContext::new()
        .with_local_addr(local_addr())
        .with_remote_addr(remote_addr())
        .with_caller("gateway", "/gateway/Proxy")
        .with_callee("users.v1.UserService", "GetUser")
        .with_namespace("test")
        .with_rpc_name(RPC_NAME)
        .with_request_id("req-fixture")
}

/// Request with a random message
pub fn create_test_request() -> EchoRequest {
    EchoRequest {
        id: (1..10_000u64).fake(),
        message: Sentence(3..8).fake(),
    }
}

/// Request whose encoded body is at least `len` bytes
pub fn create_large_request(len: usize) -> EchoRequest {
    EchoRequest {
        id: 1,
        message: "m".repeat(len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowlog_domain::probe_status_code;

    #[test]
    fn test_fixture_context() {
        let ctx = create_test_context();
        assert_eq!(ctx.local_addr(), LOCAL_ADDR);
        assert_eq!(ctx.remote_addr(), REMOTE_ADDR);
        assert_eq!(ctx.rpc_name(), RPC_NAME);
    }

    #[test]
    fn test_reply_shapes() {
        assert_eq!(probe_status_code(&RetcodeReply { retcode: 3, ..Default::default() }), Some(3));
        assert_eq!(probe_status_code(&RetCodeReply { ret_code: 4 }), Some(4));
        assert_eq!(probe_status_code(&CodeReply { code: 5 }), Some(5));
        assert_eq!(probe_status_code(&LayeredReply { retcode: 1, code: 2 }), Some(1));
        assert_eq!(probe_status_code(&PlainReply::default()), None);
    }

    #[test]
    fn test_random_request() {
        let request = create_test_request();
        assert!(request.id >= 1 && request.id < 10_000);
        assert!(!request.message.is_empty());
    }
}
