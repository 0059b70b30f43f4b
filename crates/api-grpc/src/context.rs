//! Call context extraction for tonic requests.

use flowlog_domain::CallContext;
use tonic::metadata::MetadataMap;
use tonic::{GrpcMethod, Request};
use uuid::Uuid;

/// Reserved metadata keys read by the interceptors
pub mod metadata_keys {
    /// Name of the calling service
    pub const CALLER_SERVICE: &str = "x-caller-service";
    /// Method of the calling service that issued the call
    pub const CALLER_METHOD: &str = "x-caller-method";
    /// Called service, used when the method extension is missing
    pub const CALLEE_SERVICE: &str = "x-callee-service";
    /// Called method, used when the method extension is missing
    pub const CALLEE_METHOD: &str = "x-callee-method";
    /// Environment / namespace
    pub const ENV_NAME: &str = "x-env-name";
    /// Correlation id
    pub const REQUEST_ID: &str = "x-request-id";
    /// Framework error code next to a gRPC status
    pub const ERROR_CODE: &str = "x-error-code";
    /// Error category next to a gRPC status
    pub const ERROR_CATEGORY: &str = "x-error-category";
}

use metadata_keys::*;

/// Build the context of a call received by a tonic server.
///
/// Addresses come from the connection, the callee from the `GrpcMethod`
/// extension set by generated server code, everything else from metadata.
/// A request id is generated when the caller did not send one.
pub fn server_context<T>(request: &Request<T>) -> CallContext {
    let metadata = request.metadata();
    let mut ctx = CallContext::new();

    if let Some(addr) = request.local_addr() {
        ctx = ctx.with_local_addr(addr);
    }
    if let Some(addr) = request.remote_addr() {
        ctx = ctx.with_remote_addr(addr);
    }

    ctx = ctx.with_caller(
        metadata_str(metadata, CALLER_SERVICE),
        metadata_str(metadata, CALLER_METHOD),
    );

    let (service, method) = match request.extensions().get::<GrpcMethod>() {
        Some(grpc_method) => (grpc_method.service(), grpc_method.method()),
        None => (
            metadata_str(metadata, CALLEE_SERVICE),
            metadata_str(metadata, CALLEE_METHOD),
        ),
    };
    ctx = ctx.with_callee(service, method);
    if !service.is_empty() || !method.is_empty() {
        ctx = ctx.with_rpc_name(rpc_name(service, method));
    }

    let namespace = metadata_str(metadata, ENV_NAME);
    if !namespace.is_empty() {
        ctx = ctx.with_namespace(namespace);
    }

    let request_id = match metadata_str(metadata, REQUEST_ID) {
        "" => Uuid::new_v4().to_string(),
        id => id.to_string(),
    };
    ctx.with_request_id(request_id)
}

/// Logical RPC name in gRPC path form
pub fn rpc_name(service: &str, method: &str) -> String {
    format!("/{}/{}", service, method)
}

fn metadata_str<'a>(metadata: &'a MetadataMap, key: &str) -> &'a str {
    metadata
        .get(key)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
