use std::collections::HashSet;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use movie_recommender::{
    api::{create_router, AppState, RecommendationLimits},
    error::{AppError, AppResult},
    models::{MovieDetails, MovieId, Rating},
    services::{providers::MovieProvider, CatalogStore, Recommender, SimilarityIndex},
};

/// In-memory stand-in for TMDB
struct FakeProvider {
    failing_ids: HashSet<u64>,
    lists_available: bool,
}

impl FakeProvider {
    fn healthy() -> Self {
        Self {
            failing_ids: HashSet::new(),
            lists_available: true,
        }
    }

    fn details(id: MovieId) -> MovieDetails {
        MovieDetails {
            id,
            title: format!("TMDB {}", id),
            poster_url: format!("https://image.tmdb.org/t/p/w500/{}.jpg", id),
            overview: format!("Overview of {}", id),
            release_date: "1999-03-31".to_string(),
            rating: Rating(Some(8.2)),
        }
    }

    fn list(&self, prefix: &str) -> AppResult<Vec<MovieDetails>> {
        if !self.lists_available {
            return Err(AppError::ExternalApi("TMDB API returned status 503".to_string()));
        }
        Ok((1..=3)
            .map(|i| MovieDetails {
                title: format!("{} {}", prefix, i),
                ..Self::details(MovieId(i))
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl MovieProvider for FakeProvider {
    async fn fetch_details(&self, id: MovieId) -> AppResult<MovieDetails> {
        if self.failing_ids.contains(&id.0) {
            return Err(AppError::ExternalApi("TMDB API returned status 500".to_string()));
        }
        Ok(Self::details(id))
    }

    async fn trending(&self) -> AppResult<Vec<MovieDetails>> {
        self.list("Trending")
    }

    async fn top_rated(&self) -> AppResult<Vec<MovieDetails>> {
        self.list("Top")
    }

    async fn search(&self, query: &str) -> AppResult<Vec<MovieDetails>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        self.list(query)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Six movies; "The Matrix" (row 0) is most similar to rows 3, 1, 5, 2, 4 in that order
fn create_recommender() -> Recommender {
    let catalog = CatalogStore::from_entries(vec![
        (MovieId(603), "The Matrix"),
        (MovieId(604), "The Matrix Reloaded"),
        (MovieId(13), "Forrest Gump"),
        (MovieId(605), "The Matrix Revolutions"),
        (MovieId(550), "Fight Club"),
        (MovieId(1091), "The Thing"),
    ]);
    let similarity = SimilarityIndex::from_rows(vec![
        vec![1.0, 0.8, 0.3, 0.9, 0.1, 0.4],
        vec![0.8, 1.0, 0.2, 0.7, 0.1, 0.3],
        vec![0.3, 0.2, 1.0, 0.2, 0.5, 0.1],
        vec![0.9, 0.7, 0.2, 1.0, 0.1, 0.3],
        vec![0.1, 0.1, 0.5, 0.1, 1.0, 0.2],
        vec![0.4, 0.3, 0.1, 0.3, 0.2, 1.0],
    ])
    .unwrap();
    Recommender::from_snapshots(catalog, similarity).unwrap()
}

fn create_test_server_with(provider: FakeProvider) -> TestServer {
    let state = AppState::new(create_recommender(), Arc::new(provider)).with_limits(
        RecommendationLimits {
            default_k: 5,
            max_k: 3,
        },
    );
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(FakeProvider::healthy())
}

fn ids(recommendations: &Value) -> Vec<u64> {
    recommendations["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog_size"], 6);
}

#[tokio::test]
async fn test_list_movies_in_catalog_order() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies").await;
    response.assert_status_ok();

    let movies: Vec<Value> = response.json();
    assert_eq!(movies.len(), 6);
    assert_eq!(movies[0]["title"], "The Matrix");
    assert_eq!(movies[0]["movie_id"], 603);
    assert_eq!(movies[5]["row_index"], 5);
}

#[tokio::test]
async fn test_recommendations_ranked_and_enriched() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "The Matrix")
        .add_query_param("k", 2)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["title"], "The Matrix");
    assert_eq!(ids(&body), vec![605, 604]);
    assert_eq!(body["recommendations"][0]["title"], "TMDB 605");
    assert_eq!(body["recommendations"][0]["rating"], 8.2);
}

#[tokio::test]
async fn test_recommendations_k_capped_at_limit() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "The Matrix")
        .await;

    let body: Value = response.json();
    // default_k is 5 but max_k is 3
    assert_eq!(ids(&body), vec![605, 604, 1091]);
}

#[tokio::test]
async fn test_recommendations_unknown_title_is_empty() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "unknown-title-xyz")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recommendations_zero_k_is_empty() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "The Matrix")
        .add_query_param("k", 0)
        .await;

    let body: Value = response.json();
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recommendations_degrade_failed_enrichment() {
    let server = create_test_server_with(FakeProvider {
        failing_ids: HashSet::from([604]),
        lists_available: true,
    });
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Fight Club")
        .add_query_param("k", 3)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 3);

    let placeholders: Vec<&Value> = recommendations
        .iter()
        .filter(|r| r["title"] == "N/A")
        .collect();
    assert_eq!(placeholders.len(), 0);

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "The Matrix")
        .add_query_param("k", 3)
        .await;
    let body: Value = response.json();
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 3);

    let placeholder = &recommendations[1];
    assert_eq!(placeholder["id"], 604);
    assert_eq!(placeholder["title"], "N/A");
    assert_eq!(placeholder["overview"], "No overview available");
    assert_eq!(placeholder["rating"], "N/A");
    assert_eq!(
        placeholder["poster_url"],
        "https://via.placeholder.com/500x750.png?text=No+Image"
    );
    assert_eq!(recommendations[0]["title"], "TMDB 605");
    assert_eq!(recommendations[2]["title"], "TMDB 1091");
}

#[tokio::test]
async fn test_recommendations_missing_title_param() {
    let server = create_test_server();
    let response = server.get("/api/v1/recommendations").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_movie_details_degrade_instead_of_failing() {
    let server = create_test_server_with(FakeProvider {
        failing_ids: HashSet::from([42]),
        lists_available: true,
    });

    let response = server.get("/api/v1/movies/42").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], 42);
    assert_eq!(body["release_date"], "N/A");

    let response = server.get("/api/v1/movies/550").await;
    let body: Value = response.json();
    assert_eq!(body["title"], "TMDB 550");
}

#[tokio::test]
async fn test_trending_and_top_rated() {
    let server = create_test_server();

    let trending: Vec<Value> = server.get("/api/v1/movies/trending").await.json();
    assert_eq!(trending.len(), 3);
    assert_eq!(trending[0]["title"], "Trending 1");

    let top: Vec<Value> = server.get("/api/v1/movies/top-rated").await.json();
    assert_eq!(top[2]["title"], "Top 3");
}

#[tokio::test]
async fn test_live_lists_unavailable_is_bad_gateway() {
    let server = create_test_server_with(FakeProvider {
        failing_ids: HashSet::new(),
        lists_available: false,
    });

    let response = server.get("/api/v1/movies/trending").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_search() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/movies/search")
        .add_query_param("q", "Inception")
        .await;
    response.assert_status_ok();

    let results: Vec<Value> = response.json();
    assert_eq!(results[0]["title"], "Inception 1");
}

#[tokio::test]
async fn test_search_blank_query_is_bad_request() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/movies/search")
        .add_query_param("q", " ")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_id_generated_and_propagated() {
    let server = create_test_server();

    let response = server.get("/health").await;
    let generated = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());

    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static("client-abc-123"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "client-abc-123");
}
