//! TMDB poster provider
//!
//! Searches `/search/movie` with the year-less title and takes the first
//! result that carries a `poster_path`.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{PosterLookup, TmdbSearchResponse},
    services::posters::{search_query, PosterProvider},
};

const POSTER_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
    cache: Option<Cache>,
}

impl TmdbProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        image_base_url: String,
        timeout: Duration,
        cache: Option<Cache>,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            image_base_url,
            cache,
        })
    }

    /// Cached lookup when a cache is configured, direct otherwise
    async fn lookup(&self, query: &str) -> AppResult<PosterLookup> {
        match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::Poster(query.to_string()),
                POSTER_CACHE_TTL,
                async move { self.fetch(query).await }
            ),
            None => self.fetch(query).await,
        }
    }

    async fn fetch(&self, query: &str) -> AppResult<PosterLookup> {
        let url = format!("{}/search/movie", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("language", "en-US"),
                ("page", "1"),
                ("include_adult", "false"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let search: TmdbSearchResponse = response.json().await?;
        let poster_url = self.first_poster(&search);

        tracing::debug!(
            query = %query,
            results = search.results.len(),
            found = poster_url.is_some(),
            provider = "tmdb",
            "Poster search completed"
        );

        Ok(PosterLookup {
            query: query.to_string(),
            poster_url,
            fetched_at: Utc::now(),
        })
    }

    fn first_poster(&self, search: &TmdbSearchResponse) -> Option<String> {
        search
            .results
            .iter()
            .find_map(|movie| movie.poster_path.as_deref())
            .map(|path| format!("{}{}", self.image_base_url, path))
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbProvider {
    async fn poster_url(&self, title: &str) -> AppResult<Option<String>> {
        let query = search_query(title);
        if query.is_empty() {
            return Ok(None);
        }

        Ok(self.lookup(query).await?.poster_url)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
