//! tcpcheck-api — HTTP surface of the exporter.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/metrics` | Prometheus exposition of `tcp_endpoint_up` |

pub mod handlers;

use axum::Router;
use axum::routing::get;
use tcpcheck_metrics::MetricsRegistry;

/// Shared state for handlers.
#[derive(Clone)]
pub struct ApiState {
    pub registry: MetricsRegistry,
}

/// Build the exporter router.
pub fn build_router(registry: MetricsRegistry) -> Router {
    Router::new()
        .route("/metrics", get(handlers::prometheus_metrics))
        .with_state(ApiState { registry })
}
