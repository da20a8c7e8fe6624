/// Face Registry server
///
/// Serves the enrollment and recognition pages, the recognition model
/// assets, and the two-endpoint face store API.
use face_registry::{config::ServerConfig, context::AppContext, error::FaceResult, metrics, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> FaceResult<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "face_registry=debug,tower_http=debug".into());
    if config.logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    metrics::init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting face registry");

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}
