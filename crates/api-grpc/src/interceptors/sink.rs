//! Default flow log sink

use flowlog_common::FLOW_LOG_TARGET;
use flowlog_domain::{CallContext, FlowLogSink};
use tracing::debug;

/// Writes each line as a `debug` event on the `flowlog` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl FlowLogSink for TracingSink {
    fn emit(&self, ctx: &CallContext, line: &str) {
        debug!(
            target: FLOW_LOG_TARGET,
            request_id = %ctx.request_id(),
            rpc = %ctx.rpc_name(),
            "{}",
            line
        );
    }
}
