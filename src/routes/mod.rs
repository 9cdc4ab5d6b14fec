use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    api::AppState,
    middleware::{make_span_with_request_id, request_id_middleware},
};

pub mod movies;
pub mod recommendations;
pub mod stats;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats::dataset_stats))
        .route("/recommendations", get(recommendations::recommend))
        .route("/movies/find", get(movies::find))
        .route("/movies/search", get(movies::search))
        .route("/movies/genre/:genre", get(movies::by_genre))
        .route("/movies/genre/:genre/popular", get(movies::popular_by_genre))
        .route("/movies/rating", get(movies::by_rating_range))
        .route("/movies/top/popular", get(movies::top_popular))
        .route("/movies/top/rated", get(movies::top_rated))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Result count from a query parameter; non-positive counts mean "none"
pub(crate) fn limit(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}
