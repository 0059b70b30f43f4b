//! Flow log record construction.

use crate::status::StatusResolver;
use flowlog_domain::{CallContext, Direction, FlowLogRecord, ResponseStatus, ServiceEndpoint};
use std::error::Error;

/// A record plus the identifier used for empty bodies
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltFlow {
    /// Record with participants and status filled in, bodies still empty
    pub record: FlowLogRecord,
    /// Logical RPC name of the call, when known
    pub fallback_body: Option<String>,
}

/// Builds flow log records from a finished call
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowLogBuilder {
    resolver: StatusResolver,
}

impl FlowLogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the record for one call.
    ///
    /// Transport addresses are assigned by direction: an inbound call came
    /// from the remote peer to this process, an outbound call went from
    /// this process to the remote peer.
    pub fn build<R>(
        &self,
        ctx: &CallContext,
        response: &R,
        error: Option<&(dyn Error + 'static)>,
        direction: Direction,
    ) -> BuiltFlow
    where
        R: ResponseStatus + ?Sized,
    {
        let local = ctx.local_addr();
        let remote = ctx.remote_addr();
        let (source_addr, target_addr) = match direction {
            Direction::Inbound => (remote, local),
            Direction::Outbound => (local, remote),
        };

        let source = ServiceEndpoint {
            name: ctx.caller_service().to_string(),
            method: ctx.caller_method().to_string(),
            namespace: ctx.namespace().to_string(),
            address: source_addr,
        };
        let target = ServiceEndpoint {
            name: ctx.callee_service().to_string(),
            method: ctx.callee_method().to_string(),
            namespace: ctx.namespace().to_string(),
            address: target_addr,
        };

        let status = self.resolver.resolve(error, response);

        let fallback_body = match ctx.rpc_name() {
            "" => None,
            name => Some(name.to_string()),
        };

        BuiltFlow {
            record: FlowLogRecord::new(direction, source, target, status),
            fallback_body,
        }
    }
}
