use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::services::{providers::MovieProvider, DetailEnricher, Recommender, DEFAULT_K};

/// Bounds applied to the `k` query parameter
#[derive(Debug, Clone, Copy)]
pub struct RecommendationLimits {
    pub default_k: usize,
    pub max_k: usize,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            default_k: DEFAULT_K,
            max_k: 50,
        }
    }
}

impl RecommendationLimits {
    /// Requested count, falling back to the default and capped at the maximum
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_k).min(self.max_k)
    }
}

/// Shared application state
///
/// Everything in here is read-only after startup, so handlers share it
/// without locks.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub provider: Arc<dyn MovieProvider>,
    pub enricher: DetailEnricher,
    pub limits: RecommendationLimits,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(recommender: Recommender, provider: Arc<dyn MovieProvider>) -> Self {
        Self {
            recommender: Arc::new(recommender),
            enricher: DetailEnricher::new(Arc::clone(&provider)),
            provider,
            limits: RecommendationLimits::default(),
            loaded_at: Utc::now(),
        }
    }

    pub fn with_limits(mut self, limits: RecommendationLimits) -> Self {
        self.limits = limits;
        self
    }
}
