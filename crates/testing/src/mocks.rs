//! Mock sinks for inspecting emitted flow log lines.

use flowlog_domain::{CallContext, FlowLogSink};
use parking_lot::RwLock;
use std::sync::Arc;

/// Sink that keeps every emitted line in memory.
///
/// Clones share the same storage, so a test can hand one clone to an
/// interceptor and inspect the lines through another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    lines: Arc<RwLock<Vec<(CallContext, String)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emitted lines in emission order
    pub fn lines(&self) -> Vec<String> {
        self.lines.read().iter().map(|(_, line)| line.clone()).collect()
    }

    /// Contexts the lines were emitted with
    pub fn contexts(&self) -> Vec<CallContext> {
        self.lines.read().iter().map(|(ctx, _)| ctx.clone()).collect()
    }

    /// Emitted lines parsed back as JSON
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.lines
            .read()
            .iter()
            .map(|(_, line)| serde_json::from_str(line).expect("flow log line is not JSON"))
            .collect()
    }

    /// The only emitted record; panics unless exactly one line was emitted
    pub fn single_record(&self) -> serde_json::Value {
        let records = self.records();
        assert_eq!(records.len(), 1, "expected exactly one flow log line");
        records.into_iter().next().expect("checked above")
    }

    pub fn count(&self) -> usize {
        self.lines.read().len()
    }

    pub fn clear(&self) {
        self.lines.write().clear();
    }
}

impl FlowLogSink for RecordingSink {
    fn emit(&self, ctx: &CallContext, line: &str) {
        self.lines.write().push((ctx.clone(), line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_lines() {
        let sink = RecordingSink::new();
        let handle = sink.clone();
        sink.emit(&CallContext::new(), "{\"kind\":\"inbound\"}");

        assert_eq!(handle.count(), 1);
        assert_eq!(handle.single_record()["kind"], "inbound");

        handle.clear();
        assert_eq!(sink.count(), 0);
    }
}
