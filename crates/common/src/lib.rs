//! Shared utilities for the flow-log interceptors.
//!
//! This crate provides the pieces every interceptor needs besides the call
//! pipeline itself:
//! - Configuration (`FlowLogConfig`, body length limit)
//! - String bounding for oversized log fields
//! - Telemetry setup

pub mod config;
pub mod telemetry;
pub mod truncation;

// Re-export commonly used types
pub use crate::config::{FlowLogConfig, MaxStringLength, TelemetryConfig, MAX_STRING_LENGTH_CEILING};
pub use telemetry::{init_tracing, FLOW_LOG_TARGET};
pub use truncation::{bound_str, StringBounder, TRUNCATION_SUFFIX};
