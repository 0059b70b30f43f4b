//! Structured errors on the gRPC wire.
//!
//! gRPC statuses only know the sixteen canonical codes. The framework code
//! and the error category of an [`RpcError`] travel next to the status in
//! reserved metadata so the receiving side can classify it again.
//!
//! Only framework errors whose code is a canonical failure code (1-16) keep
//! it as the gRPC code. Everything else goes out as `Unknown`; an error is
//! never sent as `Ok`.

use crate::context::metadata_keys::{ERROR_CATEGORY, ERROR_CODE};
use flowlog_domain::{CallStatus, ErrorCategory, RpcError, StructuredError};
use tonic::metadata::{MetadataMap, MetadataValue};
use tonic::{Code, Status};

/// Conversion of a structured error into a gRPC status
pub trait IntoStatus {
    /// Build the status sent to the peer
    fn into_status(self) -> Status;
}

impl IntoStatus for RpcError {
    fn into_status(self) -> Status {
        let grpc_code = match self.category {
            ErrorCategory::Framework | ErrorCategory::CalleeFramework
                if (1..=16).contains(&self.code) =>
            {
                Code::from(self.code)
            }
            _ => Code::Unknown,
        };

        let mut metadata = MetadataMap::new();
        metadata.insert(ERROR_CODE, MetadataValue::from(self.code));
        metadata.insert(ERROR_CATEGORY, MetadataValue::from(self.category.as_i32()));

        Status::with_metadata(grpc_code, self.message, metadata)
    }
}

/// Read a gRPC status back as a structured error
pub trait StatusExt {
    /// Structured view of the status
    fn to_rpc_error(&self) -> RpcError;
}

impl StatusExt for Status {
    fn to_rpc_error(&self) -> RpcError {
        let code = metadata_str(self.metadata(), ERROR_CODE)
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(self.code() as i32);

        let category = metadata_str(self.metadata(), ERROR_CATEGORY)
            .and_then(|v| v.parse::<ErrorCategory>().ok())
            .unwrap_or_default();

        RpcError::new(code, self.message(), category)
    }
}

/// Call status carried by a gRPC status
pub fn status_from_grpc(status: &Status) -> CallStatus {
    let err = status.to_rpc_error();
    CallStatus {
        code: err.code(),
        message: err.message,
        category: err.category,
    }
}

fn metadata_str<'a>(metadata: &'a MetadataMap, key: &str) -> Option<&'a str> {
    metadata.get(key).and_then(|v| v.to_str().ok())
}
