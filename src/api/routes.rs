use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::request_id_middleware;

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog browsing
        .route("/movies", get(handlers::get_movies))
        .route("/movies/trending", get(handlers::get_trending))
        .route("/movies/:id", get(handlers::get_movie))
        .route("/genres", get(handlers::get_genres))
        // Recommendations
        .route("/recommendations", get(handlers::recommend))
        // Index rebuild
        .route("/catalog", post(handlers::rebuild_catalog))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
