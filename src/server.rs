/// HTTP server setup and routing
use crate::{
    context::AppContext,
    error::{FaceError, FaceResult},
    metrics,
};
use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::{header, Method, StatusCode},
    middleware,
    response::Json,
    Router,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

/// Build the main application router
///
/// API routes take precedence; every other path is looked up in the public
/// directory, which includes the recognition model assets under `/models`.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let body_limit = ctx.config.service.body_limit;
    let assets = ServeDir::new(&ctx.config.assets.public_directory)
        .append_index_html_on_directories(true)
        .not_found_service(not_found.into_service());

    Router::new()
        .merge(crate::api::routes())
        .with_state(ctx)
        .fallback_service(assets)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(metrics::track_http))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": "Not found"
        })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> FaceResult<()> {
    let addr = ctx.config.bind_address();

    info!("face registry listening on {}", addr);
    info!("   database: {}", ctx.config.storage.database_path.display());
    info!("   public:   {}", ctx.config.assets.public_directory.display());

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FaceError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FaceError::Internal(format!("Server error: {}", e)))?;

    info!("face registry stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
