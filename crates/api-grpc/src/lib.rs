//! Flow log interceptors for RPC calls
//!
//! Wraps inbound (server) and outbound (client) call handling and writes one
//! structured flow log line per call: participants, addresses, status,
//! bounded request/response bodies and latency. Works with plain async
//! handlers and with tonic requests and responses.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use flowlog_common::{init_tracing, FlowLogConfig};
//! use flowlog_grpc::registration::interceptor_pair;
//!
//! let config = FlowLogConfig::from_env().expect("Failed to load configuration");
//! init_tracing(&config.telemetry).expect("Failed to initialize tracing");
//! let (server, client) = interceptor_pair(&config);
//! ```

#![warn(clippy::all)]

pub mod builder;
pub mod context;
pub mod encoding;
pub mod error;
pub mod interceptors;
pub mod registration;
pub mod status;

pub use builder::{BuiltFlow, FlowLogBuilder};
pub use context::server_context;
pub use encoding::{BodyEncoder, JsonBodyEncoder};
pub use error::{status_from_grpc, IntoStatus, StatusExt};
pub use interceptors::{
    FlowLogEntry, FlowLogPipeline, InboundInterceptor, OutboundInterceptor, TracingSink,
};
pub use registration::{client_interceptor, interceptor_pair, server_interceptor, FILTER_NAME};
pub use status::{inspect_error, StatusResolver};
