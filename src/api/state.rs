use std::sync::Arc;

use crate::{
    error::AppResult,
    services::{posters::PosterProvider, EngineContext, RecommendationEngine},
};

/// Shared application state
///
/// Holds only read-only handles; the engine itself is built once inside the
/// context and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<EngineContext>,
    pub posters: Option<Arc<dyn PosterProvider>>,
}

impl AppState {
    pub fn new(context: Arc<EngineContext>, posters: Option<Arc<dyn PosterProvider>>) -> Self {
        Self { context, posters }
    }

    /// The recommendation engine, built on first access
    pub async fn engine(&self) -> AppResult<Arc<RecommendationEngine>> {
        self.context.engine().await
    }
}
