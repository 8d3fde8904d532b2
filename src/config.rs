use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL poster paths are appended to
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Language requested from TMDB
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Path to the catalog snapshot (columnar JSON)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the similarity matrix snapshot (.json or .bin)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Catalog column holding TMDB movie ids
    #[serde(default = "default_catalog_id_column")]
    pub catalog_id_column: String,

    /// Catalog column holding movie titles
    #[serde(default = "default_catalog_title_column")]
    pub catalog_title_column: String,

    /// Redis connection URL; caching is disabled when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Per-request timeout for TMDB calls, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Number of recommendations returned when the client does not ask for a count
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Upper bound on the number of recommendations per request
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_catalog_path() -> String {
    "data/movie_dict.json".to_string()
}

fn default_similarity_path() -> String {
    "data/similarity.json".to_string()
}

fn default_catalog_id_column() -> String {
    "movie_id".to_string()
}

fn default_catalog_title_column() -> String {
    "title".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_recommendations() -> usize {
    5
}

fn default_max_recommendations() -> usize {
    50
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("TMDB_API_KEY not set. Please set it in the .env file.");
        }

        Ok(config)
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
