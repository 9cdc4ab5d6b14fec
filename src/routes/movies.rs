use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::{CatalogEntry, Movie},
    routes::limit,
    services::MatchMode,
};

#[derive(Debug, Deserialize)]
pub struct FindQuery {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub exact: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_search_n")]
    pub n: i64,
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    pub n: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RatingRangeQuery {
    #[serde(default = "default_min_rating")]
    pub min: f64,
    #[serde(default = "default_max_rating")]
    pub max: f64,
    #[serde(default = "default_min_ratings")]
    pub min_ratings: u64,
    #[serde(default = "default_search_n")]
    pub n: i64,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    #[serde(default = "default_top_n")]
    pub n: i64,
    #[serde(default = "default_min_ratings")]
    pub min_ratings: u64,
}

fn default_search_n() -> i64 {
    10
}

fn default_top_n() -> i64 {
    5
}

fn default_min_rating() -> f64 {
    4.0
}

fn default_max_rating() -> f64 {
    5.0
}

fn default_min_ratings() -> u64 {
    10
}

/// Resolves a title the same way recommendations do
pub async fn find(
    State(state): State<AppState>,
    Query(params): Query<FindQuery>,
) -> AppResult<Json<Movie>> {
    let engine = state.engine().await?;
    let mode = if params.exact {
        MatchMode::Exact
    } else {
        MatchMode::Substring
    };

    engine
        .find_movie(&params.title, mode)
        .map(|(_, movie)| Json(movie.clone()))
        .ok_or_else(|| AppError::NotFound(format!("No movie matches '{}'", params.title)))
}

/// Keyword search over titles and genres
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    let engine = state.engine().await?;
    Ok(Json(engine.catalog().search(&params.q, limit(params.n))))
}

pub async fn by_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
    Query(params): Query<GenreQuery>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    let engine = state.engine().await?;
    let n = limit(params.n.unwrap_or(20));
    Ok(Json(engine.catalog().by_genre(&genre, n)))
}

pub async fn popular_by_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
    Query(params): Query<GenreQuery>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    let engine = state.engine().await?;
    let n = limit(params.n.unwrap_or(5));
    Ok(Json(engine.catalog().popular_by_genre(&genre, n)))
}

/// An inverted range simply matches nothing
pub async fn by_rating_range(
    State(state): State<AppState>,
    Query(params): Query<RatingRangeQuery>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    let engine = state.engine().await?;
    Ok(Json(engine.catalog().by_rating_range(
        params.min,
        params.max,
        params.min_ratings,
        limit(params.n),
    )))
}

pub async fn top_popular(
    State(state): State<AppState>,
    Query(params): Query<TopQuery>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    let engine = state.engine().await?;
    Ok(Json(engine.catalog().top_popular(limit(params.n))))
}

pub async fn top_rated(
    State(state): State<AppState>,
    Query(params): Query<TopQuery>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    let engine = state.engine().await?;
    Ok(Json(
        engine
            .catalog()
            .top_rated(limit(params.n), params.min_ratings),
    ))
}
