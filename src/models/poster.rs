use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a poster lookup; cached whether or not a poster was found
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PosterLookup {
    pub query: String,
    pub poster_url: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from TMDB `GET /search/movie`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}
