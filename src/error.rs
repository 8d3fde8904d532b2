use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Cache(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Errors raised while loading the startup snapshots
///
/// Every variant is fatal: the server never starts serving with a catalog or
/// similarity matrix that failed to load.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed binary snapshot: {0}")]
    Binary(#[from] bincode::error::DecodeError),

    #[error("Unsupported snapshot format: {0}")]
    UnsupportedFormat(String),

    #[error("Catalog snapshot is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Catalog column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Catalog row label '{0}' is not a non-negative integer")]
    InvalidRowLabel(String),

    #[error("Catalog row {0} appears more than once")]
    DuplicateRowLabel(usize),

    #[error("Invalid value in column '{column}' at row {row}: {value}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Similarity matrix is not square: row {row} has {len} columns, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },

    #[error("Similarity matrix has a non-finite score at [{row}][{col}]")]
    NonFinite { row: usize, col: usize },

    #[error("Catalog has {catalog} items but similarity matrix is {matrix}x{matrix}")]
    DimensionMismatch { catalog: usize, matrix: usize },
}

pub type LoadResult<T> = Result<T, LoadError>;
