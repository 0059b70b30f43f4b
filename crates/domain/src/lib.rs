//! Flow log domain types
//!
//! This crate holds the vocabulary shared by every layer of the flow-log
//! interceptor: the record written per intercepted call, the call context
//! it is built from, structured call errors, the response status capability
//! set and the sink port lines are handed to.
//!
//! ## Architecture
//!
//! - **record**: `FlowLogRecord`, `Direction`, `ServiceEndpoint`, `CallStatus`, `ErrorCategory`
//! - **context**: `CallContext`, the per-call metadata accessor
//! - **errors**: `RpcError` and the `StructuredError` inspector trait
//! - **response**: `ResponseStatus`, business status accessors on response values
//! - **sink**: `FlowLogSink`, where rendered lines go
//!
//! ## Usage
//!
//! ```rust
//! use flowlog_domain::{CallStatus, Direction, FlowLogRecord, ServiceEndpoint};
//!
//! let record = FlowLogRecord::new(
//!     Direction::Outbound,
//!     ServiceEndpoint::default(),
//!     ServiceEndpoint::default(),
//!     CallStatus::ok(),
//! );
//! assert!(record.one_line_string().starts_with("{\"kind\":\"outbound\""));
//! ```

#![warn(clippy::all)]

pub mod context;
pub mod errors;
pub mod record;
pub mod response;
pub mod sink;

pub use context::CallContext;
pub use errors::{codes, RpcError, StructuredError, RET_UNKNOWN};
pub use record::{CallStatus, Direction, ErrorCategory, FlowLogRecord, ServiceEndpoint};
pub use response::{probe_status_code, ResponseStatus};
pub use sink::{FlowLogSink, NoopSink};
