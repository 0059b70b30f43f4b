//! Testing utilities for the flow log interceptors
//!
//! This crate provides:
//! - Fixtures for call contexts, requests and reply shapes
//! - A recording sink that captures emitted flow log lines
//!
//! # Examples
//!
//! ```
//! use flowlog_domain::FlowLogSink;
//! use flowlog_testing::{create_test_context, RecordingSink};
//!
//! let sink = RecordingSink::new();
//! sink.emit(&create_test_context(), "{\"kind\":\"outbound\"}");
//! assert_eq!(sink.single_record()["kind"], "outbound");
//! ```

pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
pub use fixtures::*;
pub use mocks::*;

// Re-export testing dependencies for convenience
pub use fake;
pub use proptest;
