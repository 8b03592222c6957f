//! RPC error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use qhda_scheduler::{ErrorKind, SchedulerError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Error payload, wrapped as `{"error": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error kind, e.g. "validation_error"
    pub kind: String,
    /// Human-readable message
    pub message: String,
    /// HTTP status code
    pub status: u16,
}

/// Top-level error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error details
    pub error: ErrorDetail,
}

/// RPC server errors
#[derive(Debug, Error)]
pub enum RpcError {
    /// Listener bind or accept failure
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request body could not be decoded
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Scheduling rejected or failed
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// Scheduling did not finish within the request deadline
    #[error("scheduling exceeded the {0:?} request deadline")]
    Timeout(Duration),

    /// Worker task failed
    #[error("internal error: {0}")]
    Internal(String),
}

impl RpcError {
    /// Classify for status mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            RpcError::InvalidBody(_) => ErrorKind::Validation,
            RpcError::Scheduler(e) => e.kind(),
            RpcError::Timeout(_) => ErrorKind::Cancelled,
            RpcError::Io(_) | RpcError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        status_for(self.kind())
    }

    /// Response body for this error
    pub fn body(&self) -> ErrorBody {
        let kind = self.kind();
        ErrorBody {
            error: ErrorDetail {
                kind: kind.as_str().to_string(),
                message: self.to_string(),
                status: status_for(kind).as_u16(),
            },
        }
    }
}

/// HTTP status for an error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Capacity => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;
