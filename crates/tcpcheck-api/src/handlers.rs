//! Request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::debug;

use crate::ApiState;

/// Exposition format content type.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /metrics — current gauge for every observed label tuple.
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let series = state.registry.snapshot().await;
    debug!(series = series.len(), "serving metrics scrape");

    let body = tcpcheck_metrics::render_prometheus(&series);
    (
        StatusCode::OK,
        [("content-type", PROMETHEUS_CONTENT_TYPE)],
        body,
    )
}
