use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chalchitra_api::{
    api::AppState,
    config::Config,
    db::{create_redis_client, Cache, CacheWriterHandle},
    routes::create_router,
    services::{
        posters::{PosterProvider, TmdbProvider},
        EngineContext,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chalchitra_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Build the engine up front so a bad dataset fails at startup
    let context = Arc::new(EngineContext::from_csv(
        &config.movies_path,
        &config.ratings_path,
    ));
    let engine = context
        .engine()
        .await
        .context("Failed to build recommendation engine")?;
    tracing::info!(
        movies = engine.corpus().len(),
        vocabulary = engine.model().vocabulary_size(),
        "Dataset loaded"
    );

    let (posters, cache_handle) = create_poster_provider(&config).await?;
    let state = AppState::new(context, posters);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

/// TMDB poster provider, with a Redis cache when one is configured
async fn create_poster_provider(
    config: &Config,
) -> anyhow::Result<(Option<Arc<dyn PosterProvider>>, Option<CacheWriterHandle>)> {
    let Some(api_key) = config.tmdb_api_key.clone() else {
        tracing::info!("TMDB_API_KEY not set; poster lookups disabled");
        return Ok((None, None));
    };

    let (cache, handle) = match &config.redis_url {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?).await;
            (Some(cache), Some(handle))
        }
        None => (None, None),
    };

    let provider: Arc<dyn PosterProvider> = Arc::new(TmdbProvider::new(
        api_key,
        config.tmdb_api_url.clone(),
        config.tmdb_image_base_url.clone(),
        Duration::from_secs(config.poster_timeout_secs),
        cache,
    )?);

    Ok((Some(provider), handle))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
