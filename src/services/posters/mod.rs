//! Poster lookup abstraction
//!
//! Posters are presentation garnish: a failed or slow lookup degrades to "no
//! poster" and never fails the request that asked for it.

use std::sync::Arc;

use crate::error::AppResult;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Source of poster image URLs for movie titles
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Poster URL for a title, or `None` when the provider has no poster
    async fn poster_url(&self, title: &str) -> AppResult<Option<String>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Title used for poster searches: everything before the first `(`, trimmed
pub fn search_query(title: &str) -> &str {
    title.split('(').next().unwrap_or(title).trim()
}

/// Looks up posters for every title in parallel, preserving input order.
///
/// Lookups that fail are logged and reported as `None`.
pub async fn fetch_posters(
    provider: Arc<dyn PosterProvider>,
    titles: Vec<String>,
) -> Vec<Option<String>> {
    let tasks: Vec<_> = titles
        .into_iter()
        .map(|title| {
            let provider = provider.clone();
            tokio::spawn(async move {
                match provider.poster_url(&title).await {
                    Ok(url) => url,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            title = %title,
                            provider = provider.name(),
                            "Poster lookup failed"
                        );
                        None
                    }
                }
            })
        })
        .collect();

    let mut posters = Vec::with_capacity(tasks.len());
    for task in tasks {
        posters.push(task.await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Poster task join error");
            None
        }));
    }
    posters
}
