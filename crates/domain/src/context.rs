//! Call context.
//!
//! The metadata a flow log needs about an in-flight call. Transports fill it
//! in from whatever they know; every field is optional and reads back as an
//! empty string when absent.

use std::net::SocketAddr;

/// Metadata of one in-flight call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    local_addr: Option<SocketAddr>,
    remote_addr: Option<SocketAddr>,
    caller_service: Option<String>,
    caller_method: Option<String>,
    callee_service: Option<String>,
    callee_method: Option<String>,
    namespace: Option<String>,
    rpc_name: Option<String>,
    request_id: Option<String>,
}

impl CallContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the local transport address
    pub fn with_local_addr(mut self, addr: SocketAddr) -> Self {
        self.local_addr = Some(addr);
        self
    }

    /// Set the remote transport address
    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Set the calling service and method
    pub fn with_caller(mut self, service: impl Into<String>, method: impl Into<String>) -> Self {
        self.caller_service = Some(service.into());
        self.caller_method = Some(method.into());
        self
    }

    /// Set the called service and method
    pub fn with_callee(mut self, service: impl Into<String>, method: impl Into<String>) -> Self {
        self.callee_service = Some(service.into());
        self.callee_method = Some(method.into());
        self
    }

    /// Set the environment / namespace shared by both sides
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the logical RPC name (e.g. `/pkg.Greeter/SayHello`)
    pub fn with_rpc_name(mut self, rpc_name: impl Into<String>) -> Self {
        self.rpc_name = Some(rpc_name.into());
        self
    }

    /// Set the correlation id used to tag emitted lines
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Local address as text, empty when unknown
    pub fn local_addr(&self) -> String {
        addr_text(self.local_addr)
    }

    /// Remote address as text, empty when unknown
    pub fn remote_addr(&self) -> String {
        addr_text(self.remote_addr)
    }

    pub fn caller_service(&self) -> &str {
        self.caller_service.as_deref().unwrap_or_default()
    }

    pub fn caller_method(&self) -> &str {
        self.caller_method.as_deref().unwrap_or_default()
    }

    pub fn callee_service(&self) -> &str {
        self.callee_service.as_deref().unwrap_or_default()
    }

    pub fn callee_method(&self) -> &str {
        self.callee_method.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or_default()
    }

    pub fn rpc_name(&self) -> &str {
        self.rpc_name.as_deref().unwrap_or_default()
    }

    pub fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or_default()
    }
}

fn addr_text(addr: Option<SocketAddr>) -> String {
    addr.map(|a| a.to_string()).unwrap_or_default()
}
