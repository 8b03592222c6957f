//! # qhda-rpc
//!
//! HTTP front end for the QHDA batch scheduler.
//!
//! ## Usage
//!
//! ```ignore
//! use qhda_rpc::{RpcServer, ServerConfig};
//! use qhda_scheduler::{Scheduler, SchedulerConfig};
//!
//! let scheduler = Scheduler::new(SchedulerConfig::default());
//! let server = RpcServer::new(ServerConfig::default(), scheduler);
//!
//! // Run the server
//! server.run().await?;
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/scheduler` | Schedule a batch of pending orders |
//! | `GET` | `/api/scheduler/status` | Active colorer and limits |
//! | `GET` | `/api/health` | Liveness probe |
//! | `GET` | `/api/metrics` | Request counters and histograms |
//!
//! Failures are returned as `{"error": {"kind", "message", "status"}}` with
//! status 400 (validation), 413 (batch too large), 503 (deadline exceeded)
//! or 500.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod handler;
pub mod metrics;
pub mod server;
pub mod types;

// Re-export main types
pub use error::{ErrorBody, ErrorDetail, RpcError, RpcResult};
pub use handler::AppState;
pub use metrics::{Metrics, MetricsSnapshot};
pub use server::{RpcServer, ServerConfig};
pub use types::{
    GraphMetrics, HealthResponse, OrderInput, ScheduleRequest, ScheduleResponse, StatusResponse,
};
