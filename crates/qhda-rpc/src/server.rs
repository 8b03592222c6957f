//! HTTP server implementation

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use qhda_scheduler::Scheduler;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::error::RpcResult;
use crate::handler::{self, AppState};
use crate::metrics::Metrics;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,
    /// Maximum request body size (default: 10MB)
    pub max_body_size: usize,
    /// Scheduling deadline per request (default: 30s)
    pub request_timeout: Duration,
    /// Enable CORS (default: true)
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            max_body_size: 10 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
            enable_cors: true,
        }
    }
}

impl ServerConfig {
    /// Create a new server config with the given address
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }
}

/// Scheduling HTTP server
pub struct RpcServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl RpcServer {
    /// Create a new server around a scheduler
    pub fn new(config: ServerConfig, scheduler: Scheduler) -> Self {
        let state = Arc::new(AppState::new(scheduler, config.request_timeout));
        Self { config, state }
    }

    /// Build the router
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/api/scheduler", post(handler::schedule))
            .route("/api/scheduler/status", get(handler::status))
            .route("/api/health", get(handler::health))
            .route("/api/metrics", get(handler::metrics_snapshot))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(RequestBodyLimitLayer::new(self.config.max_body_size)),
            );

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        router.with_state(self.state.clone())
    }

    /// Run the server until the process is stopped
    pub async fn run(self) -> RpcResult<()> {
        let app = self.build_router();

        let listener = TcpListener::bind(self.config.listen_addr).await?;
        tracing::info!(
            addr = %self.config.listen_addr,
            colorer = self.state.scheduler.colorer_name(),
            "scheduler service listening"
        );

        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Get the server listen address
    pub fn listen_addr(&self) -> SocketAddr {
        self.config.listen_addr
    }

    /// Shared metrics store
    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.state.metrics)
    }
}
