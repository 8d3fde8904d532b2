use std::cmp::Ordering;
use std::path::Path;

use crate::{
    error::{LoadError, LoadResult},
    models::Movie,
    services::{
        catalog::{CatalogColumns, CatalogStore},
        similarity::SimilarityIndex,
    },
};

/// Default number of recommendations per query
pub const DEFAULT_K: usize = 5;

/// Similarity-based recommendation engine
///
/// Owns the catalog and its aligned similarity matrix. Both are immutable
/// after construction, so one instance can be shared behind an `Arc` by every
/// request handler.
#[derive(Debug)]
pub struct Recommender {
    catalog: CatalogStore,
    similarity: SimilarityIndex,
}

impl Recommender {
    /// Loads both snapshots from disk and checks they line up
    pub fn load(
        catalog_path: impl AsRef<Path>,
        similarity_path: impl AsRef<Path>,
        columns: &CatalogColumns,
    ) -> LoadResult<Self> {
        let catalog = CatalogStore::load(catalog_path, columns)?;
        let similarity = SimilarityIndex::load(similarity_path)?;
        Self::from_snapshots(catalog, similarity)
    }

    /// Pairs a catalog with its similarity matrix
    ///
    /// Fails when the catalog size and matrix dimension disagree.
    pub fn from_snapshots(catalog: CatalogStore, similarity: SimilarityIndex) -> LoadResult<Self> {
        if catalog.len() != similarity.dimension() {
            return Err(LoadError::DimensionMismatch {
                catalog: catalog.len(),
                matrix: similarity.dimension(),
            });
        }

        Ok(Self {
            catalog,
            similarity,
        })
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Top `k` movies most similar to `title`, best first
    ///
    /// An unknown title yields an empty list. The query movie itself is never
    /// part of the result, even when another movie ties its self-similarity.
    pub fn recommend(&self, title: &str, k: usize) -> Vec<Movie> {
        let Some(index) = self.catalog.resolve_index(title) else {
            tracing::debug!(title = %title, "Title not in catalog");
            return Vec::new();
        };

        self.neighbors(index, k)
            .into_iter()
            .map(|(peer, _)| self.catalog.get(peer).clone())
            .collect()
    }

    /// Ranked `(peer_index, score)` pairs for the movie at `index`, excluding itself
    ///
    /// Scores are sorted descending with a stable sort, so equal scores stay
    /// in ascending peer order.
    pub fn neighbors(&self, index: usize, k: usize) -> Vec<(usize, f64)> {
        if k == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(usize, f64)> = self
            .similarity
            .row(index)
            .filter(|(peer, _)| *peer != index)
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked.truncate(k);
        ranked
    }
}
