use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use swarm_prometheus::PrometheusMetrics;
use thiserror::Error;
use tracing::{error, trace};

/// Metrics exposition service builder.
pub struct MetricsApi {
    metrics: Arc<PrometheusMetrics>,
}

impl MetricsApi {
    pub fn new(metrics: Arc<PrometheusMetrics>) -> Self {
        Self { metrics }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - GET /metrics - Prometheus text exposition
    /// - GET /healthz - Liveness check
    pub fn router(self) -> Router {
        Router::new()
            .route("/metrics", get(metrics))
            .route("/healthz", get(healthz))
            .with_state(self.metrics)
    }
}

#[derive(Debug, Error)]
enum HttpError {
    #[error("failed to encode metrics: {0}")]
    Encode(#[from] prometheus::Error),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        error!(error = %self, "metrics request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// GET /metrics
async fn metrics(
    State(metrics): State<Arc<PrometheusMetrics>>,
) -> Result<impl IntoResponse, HttpError> {
    let body = metrics.encode_text()?;
    trace!(bytes = body.len(), "metrics scraped");

    Ok(([(header::CONTENT_TYPE, metrics.content_type())], body))
}

/// GET /healthz
async fn healthz() -> &'static str {
    "ok"
}
