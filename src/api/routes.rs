use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        // Request IDs are assigned before the trace span is created
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Local catalog
        .route("/movies", get(handlers::list_movies))
        .route("/recommendations", get(handlers::recommend))
        // Live catalog
        .route("/movies/search", get(handlers::search_movies))
        .route("/movies/trending", get(handlers::trending_movies))
        .route("/movies/top-rated", get(handlers::top_rated_movies))
        .route("/movies/:id", get(handlers::movie_details))
}
