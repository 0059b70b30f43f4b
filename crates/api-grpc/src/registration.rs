//! Interceptor factories.
//!
//! Hosts that keep a registry of named interceptors register both sides
//! under [`FILTER_NAME`].

use crate::interceptors::{InboundInterceptor, OutboundInterceptor};
use flowlog_common::FlowLogConfig;
use tracing::debug;

/// Registry key of the flow log interceptors
pub const FILTER_NAME: &str = "flowlog";

/// Server-side interceptor for `config`
pub fn server_interceptor(config: &FlowLogConfig) -> InboundInterceptor {
    debug!(
        filter = FILTER_NAME,
        max_string_length = config.max_string_length.get(),
        "Creating inbound flow log interceptor"
    );
    InboundInterceptor::new(config)
}

/// Client-side interceptor for `config`
pub fn client_interceptor(config: &FlowLogConfig) -> OutboundInterceptor {
    debug!(
        filter = FILTER_NAME,
        max_string_length = config.max_string_length.get(),
        "Creating outbound flow log interceptor"
    );
    OutboundInterceptor::new(config)
}

/// Both interceptors, for hosts that register them together
pub fn interceptor_pair(config: &FlowLogConfig) -> (InboundInterceptor, OutboundInterceptor) {
    (server_interceptor(config), client_interceptor(config))
}
