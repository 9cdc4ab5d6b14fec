use axum::{extract::State, Json};

use crate::{api::AppState, error::AppResult, models::DatasetStats};

/// Handler for dataset statistics endpoint
pub async fn dataset_stats(State(state): State<AppState>) -> AppResult<Json<DatasetStats>> {
    let engine = state.engine().await?;
    Ok(Json(engine.stats().clone()))
}
