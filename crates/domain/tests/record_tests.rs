//! Tests for flow log records and status probing
//!
//! Property tests check that any body text renders to a single parseable
//! line and comes back unchanged.

use flowlog_domain::{
    probe_status_code, CallContext, CallStatus, Direction, ErrorCategory, FlowLogRecord,
    ResponseStatus, RpcError, ServiceEndpoint,
};
use proptest::prelude::*;
use serde_json::json;
use std::time::Duration;

fn endpoint(name: &str, address: &str) -> ServiceEndpoint {
    ServiceEndpoint {
        name: name.to_string(),
        method: String::new(),
        namespace: "prod".to_string(),
        address: address.to_string(),
    }
}

// ============================================================================
// Status probing
// ============================================================================

#[test]
fn test_json_probe_order() {
    assert_eq!(probe_status_code(&json!({"retcode": 1, "retCode": 2, "code": 3})), Some(1));
    assert_eq!(probe_status_code(&json!({"retCode": 2, "code": 3})), Some(2));
    assert_eq!(probe_status_code(&json!({"ret_code": 5})), Some(5));
    assert_eq!(probe_status_code(&json!({"code": 3})), Some(3));
    assert_eq!(probe_status_code(&json!({"msg": "ok"})), None);
    assert_eq!(probe_status_code(&json!([1, 2, 3])), None);
    assert_eq!(probe_status_code(&json!({"code": "7"})), None);
}

#[test]
fn test_wrappers_delegate() {
    struct Reply;
    impl ResponseStatus for Reply {
        fn ret_code(&self) -> Option<i32> {
            Some(-1)
        }
    }

    assert_eq!(probe_status_code(&Some(Reply)), Some(-1));
    assert_eq!(probe_status_code(&Box::new(Reply)), Some(-1));
    assert_eq!(probe_status_code(&&Reply), Some(-1));
    assert_eq!(probe_status_code(&None::<Reply>), None);
    assert_eq!(probe_status_code("text"), None);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_rpc_error_display() {
    assert_eq!(RpcError::business(100, "x").to_string(), "type:business, code:100, msg:x");
    assert_eq!(
        RpcError::callee_framework(21, "server timeout").to_string(),
        "type:callee framework, code:21, msg:server timeout"
    );
    assert_eq!(
        RpcError::new(7, "boom", ErrorCategory::None).to_string(),
        "type:unknown, code:7, msg:boom"
    );
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn test_record_with_context_addresses() {
    let ctx = CallContext::new()
        .with_local_addr("127.0.0.1:9000".parse().unwrap())
        .with_remote_addr("[::1]:4000".parse().unwrap());

    let record = FlowLogRecord::new(
        Direction::Outbound,
        endpoint("me", &ctx.local_addr()),
        endpoint("peer", &ctx.remote_addr()),
        CallStatus::ok(),
    );

    let value: serde_json::Value = serde_json::from_str(&record.to_string()).unwrap();
    assert_eq!(value["source"]["address"], "127.0.0.1:9000");
    assert_eq!(value["target"]["address"], "[::1]:4000");
    assert_eq!(value["status"]["type"], "");
    assert_eq!(value["cost"], "0ns");
}

proptest! {
    #[test]
    fn test_any_body_renders_one_line(request in "\\PC*", response in ".*", micros in 0u64..10_000_000) {
        let mut record = FlowLogRecord::new(
            Direction::Inbound,
            endpoint("a", "10.0.0.2:1"),
            endpoint("b", "10.0.0.1:2"),
            CallStatus::from_code(3),
        );
        record.request_body = request.clone();
        record.response_body = response.clone();
        record.elapsed = Duration::from_micros(micros);

        let line = record.one_line_string();
        prop_assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        prop_assert_eq!(value["request"]["body"].as_str().unwrap(), request.as_str());
        prop_assert_eq!(value["response"]["body"].as_str().unwrap(), response.as_str());
        prop_assert_eq!(value["status"]["code"].as_i64(), Some(3));
    }

    #[test]
    fn test_category_label_never_changes_code(code in any::<i32>(), raw in 0i32..4) {
        let category = ErrorCategory::from_i32(raw);
        let err = RpcError::new(code, "m", category);
        prop_assert_eq!(err.code, code);
        prop_assert_eq!(err.category.as_i32(), raw);
    }
}
