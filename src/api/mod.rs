/// API routes and handlers
pub mod faces;
pub mod health;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(faces::routes())
        .merge(health::routes())
}
