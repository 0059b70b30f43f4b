//! Flow log interceptors
//!
//! [`InboundInterceptor`] wraps calls received by a server,
//! [`OutboundInterceptor`] wraps calls issued by a client. Both delegate to
//! one [`FlowLogPipeline`], which times the wrapped handler, builds the
//! record and hands the rendered line to a [`FlowLogSink`].

pub mod inbound;
pub mod outbound;
pub mod sink;

pub use inbound::InboundInterceptor;
pub use outbound::OutboundInterceptor;
pub use sink::TracingSink;

use crate::builder::{BuiltFlow, FlowLogBuilder};
use crate::encoding::{BodyEncoder, JsonBodyEncoder};
use flowlog_common::{FlowLogConfig, StringBounder};
use flowlog_domain::{CallContext, Direction, FlowLogRecord, FlowLogSink, ResponseStatus};
use serde::Serialize;
use std::error::Error;
use std::future::Future;
use std::time::{Duration, Instant};
use tonic::{Request, Response, Status};

/// Outcome of observing one call
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLogEntry {
    /// The finished record
    pub record: FlowLogRecord,
    /// The record rendered as a single line
    pub line: String,
}

/// Shared per-call logic of both interceptors
#[derive(Debug, Clone)]
pub struct FlowLogPipeline<S, E = JsonBodyEncoder> {
    builder: FlowLogBuilder,
    bounder: StringBounder,
    substitute_empty_body: bool,
    encoder: E,
    sink: S,
}

impl<S, E> FlowLogPipeline<S, E>
where
    S: FlowLogSink,
    E: BodyEncoder,
{
    /// Create a pipeline; settings are fixed from here on
    pub fn new(config: &FlowLogConfig, sink: S, encoder: E) -> Self {
        Self {
            builder: FlowLogBuilder::new(),
            bounder: StringBounder::new(config.max_string_length),
            substitute_empty_body: config.substitute_empty_body,
            encoder,
            sink,
        }
    }

    /// Replace the sink
    pub fn with_sink<S2: FlowLogSink>(self, sink: S2) -> FlowLogPipeline<S2, E> {
        FlowLogPipeline {
            builder: self.builder,
            bounder: self.bounder,
            substitute_empty_body: self.substitute_empty_body,
            encoder: self.encoder,
            sink,
        }
    }

    /// Replace the body encoder
    pub fn with_encoder<E2: BodyEncoder>(self, encoder: E2) -> FlowLogPipeline<S, E2> {
        FlowLogPipeline {
            builder: self.builder,
            bounder: self.bounder,
            substitute_empty_body: self.substitute_empty_body,
            encoder,
            sink: self.sink,
        }
    }

    /// Encode a body and bound it to the configured length
    pub fn encode<T>(&self, ctx: &CallContext, value: &T) -> String
    where
        T: Serialize + ?Sized,
    {
        self.bounder.bound_owned(self.encoder.encode(ctx, value))
    }

    /// Build the entry for a finished call without emitting it.
    ///
    /// `request_body` is the already encoded request. `response` is `None`
    /// when the handler failed; it then encodes as `null`.
    pub fn observe<Rsp>(
        &self,
        ctx: &CallContext,
        direction: Direction,
        request_body: String,
        response: Option<&Rsp>,
        error: Option<&(dyn Error + 'static)>,
        elapsed: Duration,
    ) -> FlowLogEntry
    where
        Rsp: Serialize + ResponseStatus + ?Sized,
    {
        let BuiltFlow {
            mut record,
            fallback_body,
        } = self.builder.build(ctx, &response, error, direction);

        let response_body = self.encode(ctx, &response);
        record.request_body = self.substitute(request_body, fallback_body.as_deref());
        record.response_body = self.substitute(response_body, fallback_body.as_deref());
        record.elapsed = elapsed;

        let line = record.one_line_string();
        FlowLogEntry { record, line }
    }

    /// Hand the rendered line to the sink
    pub fn emit(&self, ctx: &CallContext, entry: &FlowLogEntry) {
        self.sink.emit(ctx, &entry.line);
    }

    /// Run `next` with `req`, log the call, and return the handler's result
    /// unchanged.
    ///
    /// `elapsed` covers the handler alone; body encoding is not timed.
    pub async fn run<Req, Rsp, Err, F, Fut>(
        &self,
        ctx: &CallContext,
        direction: Direction,
        req: Req,
        next: F,
    ) -> Result<Rsp, Err>
    where
        Req: Serialize,
        Rsp: Serialize + ResponseStatus,
        Err: Error + 'static,
        F: FnOnce(Req) -> Fut,
        Fut: Future<Output = Result<Rsp, Err>>,
    {
        self.run_with(ctx, direction, req, next, std_error::<Err>).await
    }

    /// [`run`](Self::run) for handlers failing with type-erased errors such
    /// as `anyhow::Error` or `Box<dyn Error + Send + Sync>`.
    pub async fn run_dyn<Req, Rsp, Err, F, Fut>(
        &self,
        ctx: &CallContext,
        direction: Direction,
        req: Req,
        next: F,
    ) -> Result<Rsp, Err>
    where
        Req: Serialize,
        Rsp: Serialize + ResponseStatus,
        Err: AsRef<dyn Error + Send + Sync + 'static>,
        F: FnOnce(Req) -> Fut,
        Fut: Future<Output = Result<Rsp, Err>>,
    {
        self.run_with(ctx, direction, req, next, erased_error::<Err>).await
    }

    /// [`run`](Self::run) for tonic requests and responses.
    ///
    /// Bodies are the inner messages; metadata and extensions are not
    /// logged.
    pub async fn run_grpc<Req, Rsp, F, Fut>(
        &self,
        ctx: &CallContext,
        direction: Direction,
        request: Request<Req>,
        next: F,
    ) -> Result<Response<Rsp>, Status>
    where
        Req: Serialize,
        Rsp: Serialize + ResponseStatus,
        F: FnOnce(Request<Req>) -> Fut,
        Fut: Future<Output = Result<Response<Rsp>, Status>>,
    {
        let request_body = self.encode(ctx, request.get_ref());

        let started = Instant::now();
        let result = next(request).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(response) => {
                self.finish(ctx, direction, request_body, Ok(response.get_ref()), elapsed)
            }
            Err(status) => self.finish::<Rsp>(ctx, direction, request_body, Err(status), elapsed),
        }
        result
    }

    async fn run_with<Req, Rsp, Err, F, Fut>(
        &self,
        ctx: &CallContext,
        direction: Direction,
        req: Req,
        next: F,
        as_error: fn(&Err) -> &(dyn Error + 'static),
    ) -> Result<Rsp, Err>
    where
        Req: Serialize,
        Rsp: Serialize + ResponseStatus,
        F: FnOnce(Req) -> Fut,
        Fut: Future<Output = Result<Rsp, Err>>,
    {
        let request_body = self.encode(ctx, &req);

        let started = Instant::now();
        let result = next(req).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(rsp) => self.finish(ctx, direction, request_body, Ok(rsp), elapsed),
            Err(e) => {
                self.finish::<Rsp>(ctx, direction, request_body, Err(as_error(e)), elapsed)
            }
        }
        result
    }

    fn finish<Rsp>(
        &self,
        ctx: &CallContext,
        direction: Direction,
        request_body: String,
        outcome: Result<&Rsp, &(dyn Error + 'static)>,
        elapsed: Duration,
    ) where
        Rsp: Serialize + ResponseStatus + ?Sized,
    {
        let entry = match outcome {
            Ok(rsp) => self.observe(ctx, direction, request_body, Some(rsp), None, elapsed),
            Err(e) => self.observe::<Rsp>(ctx, direction, request_body, None, Some(e), elapsed),
        };
        self.emit(ctx, &entry);
    }

    fn substitute(&self, body: String, fallback: Option<&str>) -> String {
        match fallback {
            Some(name) if self.substitute_empty_body && is_empty_body(&body) => {
                name.to_string()
            }
            _ => body,
        }
    }
}

fn std_error<E: Error + 'static>(err: &E) -> &(dyn Error + 'static) {
    err
}

fn erased_error<E: AsRef<dyn Error + Send + Sync + 'static>>(err: &E) -> &(dyn Error + 'static) {
    err.as_ref()
}

/// Bodies replaced by the RPC name when substitution is on
fn is_empty_body(body: &str) -> bool {
    body.is_empty() || body == "null"
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowlog_domain::{NoopSink, RpcError};
    use serde_json::json;

    fn pipeline(config: &FlowLogConfig) -> FlowLogPipeline<NoopSink> {
        FlowLogPipeline::new(config, NoopSink, JsonBodyEncoder)
    }

    fn ctx() -> CallContext {
        CallContext::new().with_rpc_name("/orders/Create")
    }

    #[test]
    fn test_observe_success() {
        let pipeline = pipeline(&FlowLogConfig::default());
        let response = json!({"retcode": 0, "id": 9});
        let entry = pipeline.observe(
            &ctx(),
            Direction::Inbound,
            "{\"sku\":\"a\"}".to_string(),
            Some(&response),
            None,
            Duration::from_millis(2),
        );

        assert_eq!(entry.record.request_body, "{\"sku\":\"a\"}");
        let logged: serde_json::Value = serde_json::from_str(&entry.record.response_body).unwrap();
        assert_eq!(logged, response);
        assert_eq!(entry.record.status.code, 0);
        assert_eq!(entry.record.elapsed, Duration::from_millis(2));
        assert_eq!(entry.line, entry.record.one_line_string());
    }

    #[test]
    fn test_failed_call_substitutes_rpc_name() {
        let pipeline = pipeline(&FlowLogConfig::default());
        let err = RpcError::framework(101, "deadline exceeded");
        let entry = pipeline.observe::<serde_json::Value>(
            &ctx(),
            Direction::Outbound,
            String::new(),
            None,
            Some(&err),
            Duration::ZERO,
        );

        assert_eq!(entry.record.request_body, "/orders/Create");
        assert_eq!(entry.record.response_body, "/orders/Create");
        assert_eq!(entry.record.status.code, 101);
    }

    #[test]
    fn test_substitution_disabled() {
        let config = FlowLogConfig::default().with_substitute_empty_body(false);
        let pipeline = pipeline(&config);
        let err = RpcError::framework(101, "deadline exceeded");
        let entry = pipeline.observe::<serde_json::Value>(
            &ctx(),
            Direction::Outbound,
            String::new(),
            None,
            Some(&err),
            Duration::ZERO,
        );

        assert_eq!(entry.record.request_body, "");
        assert_eq!(entry.record.response_body, "null");
    }

    #[test]
    fn test_no_rpc_name_keeps_body() {
        let pipeline = pipeline(&FlowLogConfig::default());
        let entry = pipeline.observe::<()>(
            &CallContext::new(),
            Direction::Inbound,
            String::new(),
            None,
            None,
            Duration::ZERO,
        );
        assert_eq!(entry.record.response_body, "null");
    }

    #[test]
    fn test_encode_is_bounded() {
        let config = FlowLogConfig::default().with_max_string_length(40);
        let pipeline = pipeline(&config);
        let body = pipeline.encode(&ctx(), &"x".repeat(100));
        assert_eq!(body.len(), 40);
        assert!(body.ends_with(flowlog_common::TRUNCATION_SUFFIX));
    }

    #[test]
    fn test_is_empty_body() {
        assert!(is_empty_body(""));
        assert!(is_empty_body("null"));
        assert!(!is_empty_body("{}"));
        assert!(!is_empty_body("\"null\""));
    }
}
