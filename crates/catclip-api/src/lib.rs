//! Axum analytics dashboard.
//!
//! This crate provides:
//! - Read-only analytics queries over a shared `PerformanceStore`
//! - Record ingestion and promotion checks for external pipelines
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;

/// Bind the dashboard listener at `config.bind_addr()`.
pub async fn bind(config: &ApiConfig) -> std::io::Result<TcpListener> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Dashboard listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_on<F>(
    listener: TcpListener,
    state: AppState,
    metrics_handle: Option<PrometheusHandle>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = create_router(state, metrics_handle);
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}

/// Bind `config.bind_addr()` and serve until `shutdown` resolves.
pub async fn serve<F>(state: AppState, metrics_handle: Option<PrometheusHandle>, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = bind(&state.config).await?;
    serve_on(listener, state, metrics_handle, shutdown).await
}
