//! Request handlers

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use qhda_scheduler::{CancelFlag, Order, Scheduler};

use crate::error::{RpcError, RpcResult};
use crate::metrics::{self, Metrics, MetricsSnapshot};
use crate::types::{HealthResponse, ScheduleRequest, ScheduleResponse, StatusResponse};

/// Shared state for request handlers
pub struct AppState {
    /// Batch scheduler
    pub scheduler: Arc<Scheduler>,
    /// Request metrics
    pub metrics: Arc<Metrics>,
    /// Deadline for a single scheduling request
    pub request_timeout: Duration,
}

impl AppState {
    /// Create handler state
    pub fn new(scheduler: Scheduler, request_timeout: Duration) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
            metrics: Arc::new(Metrics::new()),
            request_timeout,
        }
    }

    /// Run one batch on the blocking pool, cancelling it at the deadline
    pub async fn schedule(&self, request: ScheduleRequest) -> RpcResult<ScheduleResponse> {
        let orders: Vec<Order> = request.pending_orders.into_iter().map(Order::from).collect();
        let matrix = request.conflict_matrix;
        let batch_size = orders.len();

        let cancel = CancelFlag::new();
        let worker_cancel = cancel.clone();
        let scheduler = Arc::clone(&self.scheduler);
        let task = tokio::task::spawn_blocking(move || {
            scheduler.schedule_cancellable(&orders, matrix.as_deref(), &worker_cancel)
        });

        let report = match tokio::time::timeout(self.request_timeout, task).await {
            Ok(joined) => joined.map_err(|e| RpcError::Internal(e.to_string()))??,
            Err(_) => {
                cancel.cancel();
                tracing::warn!(
                    orders = batch_size,
                    timeout_ms = self.request_timeout.as_millis() as u64,
                    "scheduling request timed out"
                );
                return Err(RpcError::Timeout(self.request_timeout));
            }
        };

        Ok(ScheduleResponse::from(report))
    }
}

/// `POST /api/scheduler`
pub async fn schedule(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ScheduleRequest>, JsonRejection>,
) -> RpcResult<Json<ScheduleResponse>> {
    let started = Instant::now();
    state.metrics.counter(metrics::REQUESTS_TOTAL, 1);

    let result = match body {
        Ok(Json(request)) => {
            state
                .metrics
                .histogram(metrics::BATCH_SIZE, request.pending_orders.len() as f64);
            state.schedule(request).await
        }
        Err(rejection) => Err(RpcError::InvalidBody(rejection.body_text())),
    };

    state.metrics.histogram(
        metrics::LATENCY_MS,
        started.elapsed().as_secs_f64() * 1000.0,
    );

    match result {
        Ok(response) => {
            state.metrics.counter(metrics::SCHEDULED_TOTAL, 1);
            state.metrics.histogram(metrics::SLOTS, response.total_slots as f64);
            Ok(Json(response))
        }
        Err(err) => {
            tracing::debug!(error = %err, "scheduling request rejected");
            state
                .metrics
                .counter(&metrics::errors_counter(err.kind().as_str()), 1);
            Err(err)
        }
    }
}

/// `GET /api/scheduler/status`
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse::new(
        state.scheduler.config(),
        state.request_timeout.as_millis() as u64,
    ))
}

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// `GET /api/metrics`
pub async fn metrics_snapshot(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
