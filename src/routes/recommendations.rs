use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::AppState,
    error::AppResult,
    middleware::RequestId,
    models::Recommendation,
    routes::limit,
    services::{posters::fetch_posters, RecommendationFilter},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_n")]
    pub n: i64,
    #[serde(default = "default_min_rating_count")]
    pub min_rating_count: u64,
    #[serde(default = "default_min_avg_rating")]
    pub min_avg_rating: f64,
    /// Attach poster URLs when a poster provider is configured
    #[serde(default)]
    pub posters: bool,
}

fn default_n() -> i64 {
    10
}

fn default_min_rating_count() -> u64 {
    10
}

fn default_min_avg_rating() -> f64 {
    3.0
}

#[derive(Debug, Serialize)]
pub struct RecommendationView {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<RecommendationView>>> {
    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        n = params.n,
        min_rating_count = params.min_rating_count,
        min_avg_rating = params.min_avg_rating,
        "Processing recommendation request"
    );

    let engine = state.engine().await?;
    let filter = RecommendationFilter::new(params.min_rating_count, params.min_avg_rating);
    let recommendations = engine.recommend(&params.title, limit(params.n), filter);

    let posters = match (&state.posters, params.posters) {
        (Some(provider), true) if !recommendations.is_empty() => {
            let titles = recommendations.iter().map(|r| r.title.clone()).collect();
            fetch_posters(provider.clone(), titles).await
        }
        _ => vec![None; recommendations.len()],
    };

    let views: Vec<RecommendationView> = recommendations
        .into_iter()
        .zip(posters)
        .map(|(recommendation, poster_url)| RecommendationView {
            recommendation,
            poster_url,
        })
        .collect();

    tracing::info!(
        request_id = %request_id,
        returned = views.len(),
        "Recommendation request completed"
    );

    Ok(Json(views))
}
