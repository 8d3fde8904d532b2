use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_recommender::{
    api::{create_router, AppState, RecommendationLimits},
    cache::{create_redis_client, Cache},
    config::Config,
    services::{providers::TmdbProvider, CatalogColumns, Recommender},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recommender=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Snapshots are loaded before anything else; a bad snapshot aborts startup
    let columns = CatalogColumns {
        id: config.catalog_id_column.clone(),
        title: config.catalog_title_column.clone(),
    };
    let recommender = Recommender::load(&config.catalog_path, &config.similarity_path, &columns)
        .context("Failed to load recommendation snapshots")?;

    tracing::info!(
        movies = recommender.catalog().len(),
        "Recommendation engine ready"
    );

    let (cache, cache_writer) = match &config.redis_url {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?);
            tracing::info!("Redis response cache enabled");
            (cache, Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, response cache disabled");
            (Cache::disabled(), None)
        }
    };

    let provider = TmdbProvider::from_config(&config, cache)?;

    let state = AppState::new(recommender, Arc::new(provider)).with_limits(RecommendationLimits {
        default_k: config.default_recommendations,
        max_k: config.max_recommendations,
    });

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
