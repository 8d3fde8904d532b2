use crate::error::{LoadError, LoadResult};
use std::path::Path;

/// Dense N×N matrix of pairwise similarity scores
///
/// Row and column `i` both refer to the catalog movie at row index `i`.
/// The matrix is read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    dimension: usize,
    // Row-major, dimension * dimension entries
    scores: Vec<f64>,
}

impl SimilarityIndex {
    /// Reads a similarity snapshot from disk
    ///
    /// The encoding is picked from the file extension: `.json` for an array
    /// of arrays, `.bin` for a bincode-encoded `Vec<Vec<f64>>`.
    pub fn load(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let index = match extension.as_str() {
            "json" => Self::from_json_slice(&bytes)?,
            "bin" => Self::from_bincode_slice(&bytes)?,
            other => return Err(LoadError::UnsupportedFormat(other.to_string())),
        };

        tracing::info!(
            path = %path.display(),
            dimension = index.dimension(),
            "Loaded similarity snapshot"
        );

        Ok(index)
    }

    pub fn from_json_slice(bytes: &[u8]) -> LoadResult<Self> {
        let rows: Vec<Vec<f64>> = serde_json::from_slice(bytes)?;
        Self::from_rows(rows)
    }

    pub fn from_bincode_slice(bytes: &[u8]) -> LoadResult<Self> {
        let (rows, _): (Vec<Vec<f64>>, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Self::from_rows(rows)
    }

    /// Validates and flattens a matrix given as rows
    pub fn from_rows(rows: Vec<Vec<f64>>) -> LoadResult<Self> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dimension {
                return Err(LoadError::NotSquare {
                    row,
                    len: values.len(),
                    expected: dimension,
                });
            }
            if let Some(col) = values.iter().position(|score| !score.is_finite()) {
                return Err(LoadError::NonFinite { row, col });
            }
            scores.extend(values);
        }

        Ok(Self { dimension, scores })
    }

    /// Number of rows (and columns)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// `(peer_index, score)` pairs for every column of row `index`, in column order
    ///
    /// # Panics
    /// Panics if `index >= self.dimension()`.
    pub fn row(&self, index: usize) -> impl ExactSizeIterator<Item = (usize, f64)> + '_ {
        assert!(
            index < self.dimension,
            "similarity row {} out of range for dimension {}",
            index,
            self.dimension
        );
        let start = index * self.dimension;
        self.scores[start..start + self.dimension]
            .iter()
            .copied()
            .enumerate()
    }
}
