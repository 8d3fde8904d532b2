/// Movie metadata provider abstraction
///
/// The recommendation engine only knows catalog ids and titles. Posters,
/// overviews, release dates and ratings, as well as the live trending /
/// top-rated / search lists, come from an external catalog service behind this
/// trait.
use crate::{
    error::AppResult,
    models::{MovieDetails, MovieId},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for external movie catalog services
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Fetch display details for a single movie
    async fn fetch_details(&self, id: MovieId) -> AppResult<MovieDetails>;

    /// Movies trending this week
    async fn trending(&self) -> AppResult<Vec<MovieDetails>>;

    /// Highest rated movies (first page)
    async fn top_rated(&self) -> AppResult<Vec<MovieDetails>>;

    /// Search movies by title
    ///
    /// An empty query is rejected with `InvalidInput`.
    async fn search(&self, query: &str) -> AppResult<Vec<MovieDetails>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
