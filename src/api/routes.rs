//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the API router.
///
/// Route names match the serverless functions the frontend already calls.
/// CORS is permissive: the frontend is served from a different origin and
/// authorization rides in the forwarded bearer token.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/getOrphanedResources",
            get(handlers::get_orphaned_resources),
        )
        .route("/api/unattachedDisks", get(handlers::get_unattached_disks))
        .route(
            "/api/scanDeprecatedResources",
            get(handlers::scan_deprecated_resources),
        )
        .route("/api/deleteResources", post(handlers::delete_resources))
        .route("/api/upgradeResources", post(handlers::upgrade_resources))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
