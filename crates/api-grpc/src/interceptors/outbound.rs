//! Client-side flow log interceptor

use super::{FlowLogPipeline, TracingSink};
use crate::encoding::{BodyEncoder, JsonBodyEncoder};
use flowlog_common::FlowLogConfig;
use flowlog_domain::{CallContext, Direction, FlowLogSink, ResponseStatus};
use serde::Serialize;
use std::error::Error;
use std::future::Future;
use tonic::{Request, Response, Status};

/// Logs every call this process issues.
///
/// The record's source is this process and its target is the remote peer.
/// The caller supplies the context, since a client knows both ends of the
/// call before it is sent.
#[derive(Debug, Clone)]
pub struct OutboundInterceptor<S = TracingSink, E = JsonBodyEncoder> {
    pipeline: FlowLogPipeline<S, E>,
}

impl OutboundInterceptor {
    /// Interceptor logging through `tracing` with JSON bodies
    pub fn new(config: &FlowLogConfig) -> Self {
        Self {
            pipeline: FlowLogPipeline::new(config, TracingSink, JsonBodyEncoder),
        }
    }
}

impl<S, E> OutboundInterceptor<S, E>
where
    S: FlowLogSink,
    E: BodyEncoder,
{
    /// Send lines to another sink
    pub fn with_sink<S2: FlowLogSink>(self, sink: S2) -> OutboundInterceptor<S2, E> {
        OutboundInterceptor {
            pipeline: self.pipeline.with_sink(sink),
        }
    }

    /// Encode bodies with another encoder
    pub fn with_encoder<E2: BodyEncoder>(self, encoder: E2) -> OutboundInterceptor<S, E2> {
        OutboundInterceptor {
            pipeline: self.pipeline.with_encoder(encoder),
        }
    }

    pub fn pipeline(&self) -> &FlowLogPipeline<S, E> {
        &self.pipeline
    }

    /// Wrap an outgoing call
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
        self.pipeline.run(ctx, Direction::Outbound, req, next).await
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
        self.pipeline.run_dyn(ctx, Direction::Outbound, req, next).await
    }

    /// Wrap an outgoing tonic call
    pub async fn intercept_grpc<Req, Rsp, F, Fut>(
        &self,
        ctx: &CallContext,
        request: Request<Req>,
        next: F,
    ) -> Result<Response<Rsp>, Status>
    where
        Req: Serialize,
        Rsp: Serialize + ResponseStatus,
        F: FnOnce(Request<Req>) -> Fut,
        Fut: Future<Output = Result<Response<Rsp>, Status>>,
    {
        self.pipeline
            .run_grpc(ctx, Direction::Outbound, request, next)
            .await
    }
}
