//! Server-side flow log interceptor

use super::{FlowLogPipeline, TracingSink};
use crate::context::server_context;
use crate::encoding::{BodyEncoder, JsonBodyEncoder};
use flowlog_common::FlowLogConfig;
use flowlog_domain::{CallContext, Direction, FlowLogSink, ResponseStatus};
use serde::Serialize;
use std::error::Error;
use std::future::Future;
use tonic::{Request, Response, Status};

/// Logs every call this process receives.
///
/// The record's source is the remote peer and its target is this process.
///
/// # Examples
///
/// ```
/// use flowlog_common::FlowLogConfig;
/// use flowlog_domain::{CallContext, RpcError};
/// use flowlog_grpc::interceptors::InboundInterceptor;
///
/// # futures::executor::block_on(async {
/// let interceptor = InboundInterceptor::new(&FlowLogConfig::default());
/// let reply: Result<String, RpcError> = interceptor
///     .intercept(&CallContext::new(), "ping", |req| async move { Ok(req.to_uppercase()) })
///     .await;
/// assert_eq!(reply.unwrap(), "PING");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct InboundInterceptor<S = TracingSink, E = JsonBodyEncoder> {
    pipeline: FlowLogPipeline<S, E>,
}

impl InboundInterceptor {
    /// Interceptor logging through `tracing` with JSON bodies
    pub fn new(config: &FlowLogConfig) -> Self {
        Self {
            pipeline: FlowLogPipeline::new(config, TracingSink, JsonBodyEncoder),
        }
    }
}

impl<S, E> InboundInterceptor<S, E>
where
    S: FlowLogSink,
    E: BodyEncoder,
{
    /// Send lines to another sink
    pub fn with_sink<S2: FlowLogSink>(self, sink: S2) -> InboundInterceptor<S2, E> {
        InboundInterceptor {
            pipeline: self.pipeline.with_sink(sink),
        }
    }

    /// Encode bodies with another encoder
    pub fn with_encoder<E2: BodyEncoder>(self, encoder: E2) -> InboundInterceptor<S, E2> {
        InboundInterceptor {
            pipeline: self.pipeline.with_encoder(encoder),
        }
    }

    pub fn pipeline(&self) -> &FlowLogPipeline<S, E> {
        &self.pipeline
    }

    /// Wrap a handler invocation.
    ///
    /// The handler's result is returned as is, error included.
    pub async fn intercept<Req, Rsp, Err, F, Fut>(
        &self,
        ctx: &CallContext,
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
        self.pipeline.run(ctx, Direction::Inbound, req, next).await
    }

    /// [`intercept`](Self::intercept) for handlers failing with
    /// `anyhow::Error` or `Box<dyn Error + Send + Sync>`
    pub async fn intercept_dyn<Req, Rsp, Err, F, Fut>(
        &self,
        ctx: &CallContext,
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
        self.pipeline.run_dyn(ctx, Direction::Inbound, req, next).await
    }

    /// Wrap a tonic handler; the call context is read from the request.
    pub async fn intercept_grpc<Req, Rsp, F, Fut>(
        &self,
        request: Request<Req>,
        next: F,
    ) -> Result<Response<Rsp>, Status>
    where
        Req: Serialize,
        Rsp: Serialize + ResponseStatus,
        F: FnOnce(Request<Req>) -> Fut,
        Fut: Future<Output = Result<Response<Rsp>, Status>>,
    {
        let ctx = server_context(&request);
        self.pipeline
            .run_grpc(&ctx, Direction::Inbound, request, next)
            .await
    }
}
