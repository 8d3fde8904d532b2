use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Movie, MovieDetails, MovieId},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub catalog_size: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub title: String,
    pub recommendations: Vec<MovieDetails>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        catalog_size: state.recommender.catalog().len(),
        loaded_at: state.loaded_at,
    })
}

/// Every recommendable movie, in catalog order
pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<Movie>> {
    Json(state.recommender.catalog().iter().cloned().collect())
}

/// Movies similar to a catalog title, with display details
///
/// An unknown title is not an error: it returns an empty list.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> Json<RecommendationResponse> {
    let k = state.limits.resolve(query.k);

    tracing::info!(
        request_id = %request_id,
        title = %query.title,
        k = k,
        "Processing recommendation request"
    );

    let movies = state.recommender.recommend(&query.title, k);
    let ids: Vec<MovieId> = movies.iter().map(|movie| movie.movie_id).collect();
    let recommendations = state.enricher.enrich_batch(ids).await;

    tracing::info!(
        request_id = %request_id,
        results = recommendations.len(),
        "Recommendations completed"
    );

    Json(RecommendationResponse {
        title: query.title,
        recommendations,
    })
}

/// Details for a single movie, degraded to placeholders when TMDB fails
pub async fn movie_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Json<MovieDetails> {
    Json(state.enricher.enrich(MovieId(id)).await)
}

/// Live search against the external catalog
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<MovieDetails>>> {
    let movies = state.provider.search(&params.q).await?;
    Ok(Json(movies))
}

/// Movies trending this week
pub async fn trending_movies(State(state): State<AppState>) -> AppResult<Json<Vec<MovieDetails>>> {
    let movies = state.provider.trending().await?;
    Ok(Json(movies))
}

/// Top rated movies
pub async fn top_rated_movies(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MovieDetails>>> {
    let movies = state.provider.top_rated().await?;
    Ok(Json(movies))
}
