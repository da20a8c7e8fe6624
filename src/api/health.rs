/// Health check and metrics endpoints
///
/// Liveness always answers while the process runs; readiness additionally
/// requires the face collection to be readable.
use crate::{context::AppContext, metrics};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(liveness_probe))
        .route("/health/ready", get(readiness_probe))
        .route("/metrics", get(metrics_endpoint))
}

/// Liveness probe
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: 503 when the store cannot be read
pub async fn readiness_probe(
    State(ctx): State<AppContext>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match ctx.store.list().await {
        Ok(records) => Ok(Json(serde_json::json!({
            "status": "ready",
            "version": env!("CARGO_PKG_VERSION"),
            "faces": records.len()
        }))),
        Err(e) => {
            tracing::warn!(error = %e, "readiness_probe_failed: face store unreadable");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Prometheus exposition
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render_metrics(),
    )
}
