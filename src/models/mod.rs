use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod movie;

pub use movie::{Movie, MovieDetails, Rating};

/// Poster shown when TMDB has no image for a movie
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/500x750.png?text=No+Image";
/// Sentinel for missing text fields
pub const NOT_AVAILABLE: &str = "N/A";
/// Sentinel for a missing overview
pub const NO_OVERVIEW: &str = "No overview available";

/// TMDB movie identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Movie record as returned by TMDB details and list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

/// Paged list response from TMDB (trending, top rated, search)
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_id_display() {
        assert_eq!(format!("{}", MovieId(19995)), "19995");
    }

    #[test]
    fn test_movie_id_serializes_as_number() {
        let json = serde_json::to_string(&MovieId(285)).unwrap();
        assert_eq!(json, "285");
    }

    #[test]
    fn test_tmdb_movie_tolerates_missing_fields() {
        let movie: TmdbMovie = serde_json::from_str(r#"{"id": 603}"#).unwrap();
        assert_eq!(movie.id, Some(603));
        assert_eq!(movie.title, None);
        assert_eq!(movie.vote_average, None);
    }

    #[test]
    fn test_tmdb_page_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 550, "title": "Fight Club", "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg", "vote_average": 8.4},
                {"id": 13, "title": "Forrest Gump", "poster_path": null}
            ],
            "total_pages": 500
        }"#;

        let page: TmdbPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].title.as_deref(), Some("Fight Club"));
        assert_eq!(page.results[1].poster_path, None);
    }
}
