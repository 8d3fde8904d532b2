/// TMDB (The Movie Database) provider
///
/// API Flow:
/// 1. Details: /movie/{id} → poster path, overview, release date, vote average
/// 2. Lists: /trending/movie/week, /movie/top_rated, /search/movie → paged `results`
///
/// The API key is sent as the `api_key` query parameter.
use crate::{
    cache::{Cache, CacheKey},
    cached,
    config::Config,
    error::{AppError, AppResult},
    models::{MovieDetails, MovieId, TmdbMovie, TmdbPage},
    services::providers::MovieProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

const DETAILS_CACHE_TTL: u64 = 604800; // 1 week
const LIST_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    language: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(
        cache: Cache,
        api_key: String,
        api_url: String,
        image_url: String,
        language: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_url,
            language,
            cache,
        })
    }

    pub fn from_config(config: &Config, cache: Cache) -> AppResult<Self> {
        Self::new(
            cache,
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_url.clone(),
            config.tmdb_language.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// GETs `{api_url}/{path}` with the API key and extra query parameters
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetches one page of a list endpoint and maps it to display details
    async fn fetch_list(&self, path: &str, params: &[(&str, &str)]) -> AppResult<Vec<MovieDetails>> {
        let page: TmdbPage = self.get_json(path, params).await?;
        Ok(self.convert_page(page))
    }

    fn convert_page(&self, page: TmdbPage) -> Vec<MovieDetails> {
        page.results
            .into_iter()
            .filter_map(|movie| match movie.id {
                Some(id) => Some(MovieDetails::from_tmdb(movie, MovieId(id), &self.image_url)),
                None => {
                    tracing::debug!(title = ?movie.title, "Skipping TMDB result without id");
                    None
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn fetch_details(&self, id: MovieId) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::Details(id),
            DETAILS_CACHE_TTL,
            async move {
                let movie: TmdbMovie = self
                    .get_json(&format!("movie/{}", id), &[("language", self.language.as_str())])
                    .await?;

                tracing::debug!(movie_id = %id, provider = "tmdb", "Movie details fetched");

                Ok::<_, AppError>(MovieDetails::from_tmdb(movie, id, &self.image_url))
            }
        )
    }

    async fn trending(&self) -> AppResult<Vec<MovieDetails>> {
        cached!(self.cache, CacheKey::Trending, LIST_CACHE_TTL, async move {
            let movies = self.fetch_list("trending/movie/week", &[]).await?;
            tracing::info!(results = movies.len(), provider = "tmdb", "Trending movies fetched");
            Ok::<_, AppError>(movies)
        })
    }

    async fn top_rated(&self) -> AppResult<Vec<MovieDetails>> {
        cached!(self.cache, CacheKey::TopRated, LIST_CACHE_TTL, async move {
            let movies = self
                .fetch_list(
                    "movie/top_rated",
                    &[("language", self.language.as_str()), ("page", "1")],
                )
                .await?;
            tracing::info!(results = movies.len(), provider = "tmdb", "Top rated movies fetched");
            Ok::<_, AppError>(movies)
        })
    }

    async fn search(&self, query: &str) -> AppResult<Vec<MovieDetails>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::Search(query.to_string()),
            LIST_CACHE_TTL,
            async move {
                let movies = self
                    .fetch_list(
                        "search/movie",
                        &[("language", self.language.as_str()), ("query", query)],
                    )
                    .await?;

                tracing::info!(
                    query = %query,
                    results = movies.len(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
