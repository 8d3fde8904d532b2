use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{MovieId, TmdbMovie, NOT_AVAILABLE, NO_OVERVIEW, PLACEHOLDER_POSTER};

/// A recommendable movie from the local catalog snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Position in the catalog; also the row/column in the similarity matrix
    pub row_index: usize,
    /// TMDB identifier used for detail lookups
    pub movie_id: MovieId,
    /// Title as it appears in the catalog
    pub title: String,
}

impl Movie {
    pub fn new(row_index: usize, movie_id: MovieId, title: impl Into<String>) -> Self {
        Self {
            row_index,
            movie_id,
            title: title.into(),
        }
    }
}

/// Average vote, rendered as `"N/A"` when TMDB has none
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rating(pub Option<f64>);

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Number(value)) => Rating(Some(value)),
            Some(Raw::Text(_)) | None => Rating(None),
        })
    }
}

/// Display metadata for a movie card
///
/// Every field is always populated. Anything TMDB could not provide is filled
/// with a sentinel so a card can still be rendered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    pub poster_url: String,
    pub overview: String,
    pub release_date: String,
    pub rating: Rating,
}

impl MovieDetails {
    /// Details used when a lookup failed
    pub fn placeholder(id: MovieId) -> Self {
        Self {
            id,
            title: NOT_AVAILABLE.to_string(),
            poster_url: PLACEHOLDER_POSTER.to_string(),
            overview: NO_OVERVIEW.to_string(),
            release_date: NOT_AVAILABLE.to_string(),
            rating: Rating(None),
        }
    }

    /// Builds display details from a TMDB record
    ///
    /// `fallback_id` is used when the record carries no id of its own.
    pub fn from_tmdb(movie: TmdbMovie, fallback_id: MovieId, image_base_url: &str) -> Self {
        Self {
            id: movie.id.map(MovieId).unwrap_or(fallback_id),
            title: movie.title.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            poster_url: poster_url(image_base_url, movie.poster_path.as_deref()),
            overview: movie.overview.unwrap_or_else(|| NO_OVERVIEW.to_string()),
            release_date: movie
                .release_date
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            rating: Rating(movie.vote_average),
        }
    }

    /// True when this value carries the lookup-failure placeholders
    pub fn is_placeholder(&self) -> bool {
        self.title == NOT_AVAILABLE && self.poster_url == PLACEHOLDER_POSTER
    }
}

/// Joins a TMDB poster path onto the image base URL
pub fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> String {
    match poster_path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => format!(
            "{}/{}",
            image_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
        None => PLACEHOLDER_POSTER.to_string(),
    }
}
