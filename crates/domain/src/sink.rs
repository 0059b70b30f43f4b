//! Log sink port.

use crate::context::CallContext;
use std::sync::Arc;

/// Destination for rendered flow log lines.
///
/// Sinks receive the call context for correlation and one single-line
/// string. Routing, formatting and retention belong to the sink.
pub trait FlowLogSink: Send + Sync {
    /// Write one line at debug severity
    fn emit(&self, ctx: &CallContext, line: &str);
}

impl<S: FlowLogSink + ?Sized> FlowLogSink for Arc<S> {
    fn emit(&self, ctx: &CallContext, line: &str) {
        (**self).emit(ctx, line)
    }
}

impl<S: FlowLogSink + ?Sized> FlowLogSink for Box<S> {
    fn emit(&self, ctx: &CallContext, line: &str) {
        (**self).emit(ctx, line)
    }
}

/// Sink that drops every line
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl FlowLogSink for NoopSink {
    fn emit(&self, _ctx: &CallContext, _line: &str) {}
}
