use std::sync::Arc;

use crate::{
    models::{MovieDetails, MovieId},
    services::providers::MovieProvider,
};

/// Resolves movie ids to display details without ever failing
///
/// Any provider error (HTTP failure, bad status, cache error, timeout) is
/// logged and replaced by [`MovieDetails::placeholder`].
#[derive(Clone)]
pub struct DetailEnricher {
    provider: Arc<dyn MovieProvider>,
}

impl DetailEnricher {
    pub fn new(provider: Arc<dyn MovieProvider>) -> Self {
        Self { provider }
    }

    /// Details for one movie, degraded to placeholders on failure
    pub async fn enrich(&self, id: MovieId) -> MovieDetails {
        Self::enrich_with(self.provider.as_ref(), id).await
    }

    async fn enrich_with(provider: &dyn MovieProvider, id: MovieId) -> MovieDetails {
        match provider.fetch_details(id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(
                    movie_id = %id,
                    provider = provider.name(),
                    error = %e,
                    "Detail lookup failed, using placeholder"
                );
                MovieDetails::placeholder(id)
            }
        }
    }

    /// Details for every id, fetched concurrently, in input order
    ///
    /// The output always has one entry per input id.
    pub async fn enrich_batch(&self, ids: Vec<MovieId>) -> Vec<MovieDetails> {
        let tasks: Vec<_> = ids
            .iter()
            .map(|&id| {
                let provider = Arc::clone(&self.provider);
                tokio::spawn(async move { Self::enrich_with(provider.as_ref(), id).await })
            })
            .collect();

        let mut results = Vec::with_capacity(tasks.len());
        let mut degraded = 0;

        for (id, task) in ids.into_iter().zip(tasks) {
            let details = match task.await {
                Ok(details) => details,
                Err(e) => {
                    tracing::error!(movie_id = %id, error = %e, "Task join error");
                    MovieDetails::placeholder(id)
                }
            };
            if details.is_placeholder() {
                degraded += 1;
            }
            results.push(details);
        }

        if degraded > 0 {
            tracing::warn!(
                total = results.len(),
                degraded = degraded,
                "Partial detail enrichment failure"
            );
        }

        results
    }
}
