use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{
    error::{AppError, AppResult},
    models::{MovieRecord, Rating},
    services::{loader, recommender::RecommendationEngine},
};

/// Where the movie and rating tables come from
#[derive(Debug, Clone)]
pub enum DataSource {
    Csv {
        movies_path: PathBuf,
        ratings_path: PathBuf,
    },
    InMemory {
        movies: Vec<MovieRecord>,
        ratings: Vec<Rating>,
    },
}

impl DataSource {
    fn load(&self) -> AppResult<(Vec<MovieRecord>, Vec<Rating>)> {
        match self {
            DataSource::Csv {
                movies_path,
                ratings_path,
            } => Ok((
                loader::load_movies(movies_path)?,
                loader::load_ratings(ratings_path)?,
            )),
            DataSource::InMemory { movies, ratings } => Ok((movies.clone(), ratings.clone())),
        }
    }
}

/// Owns the data source and the engine built from it.
///
/// The engine is built at most once, on first access, and every caller gets
/// the same shared read-only instance. A failed build is not memoised, so the
/// next caller retries.
pub struct EngineContext {
    source: Arc<DataSource>,
    engine: OnceCell<Arc<RecommendationEngine>>,
}

impl EngineContext {
    pub fn new(source: DataSource) -> Self {
        Self {
            source: Arc::new(source),
            engine: OnceCell::new(),
        }
    }

    pub fn from_csv(movies_path: impl Into<PathBuf>, ratings_path: impl Into<PathBuf>) -> Self {
        Self::new(DataSource::Csv {
            movies_path: movies_path.into(),
            ratings_path: ratings_path.into(),
        })
    }

    pub fn in_memory(movies: Vec<MovieRecord>, ratings: Vec<Rating>) -> Self {
        Self::new(DataSource::InMemory { movies, ratings })
    }

    /// Returns the engine, loading and building it on first use
    pub async fn engine(&self) -> AppResult<Arc<RecommendationEngine>> {
        self.engine
            .get_or_try_init(|| async {
                let source = Arc::clone(&self.source);

                // CSV reads and matrix construction both block
                let engine = tokio::task::spawn_blocking(move || {
                    let (movies, ratings) = source.load()?;
                    RecommendationEngine::build(&movies, &ratings)
                })
                .await
                .map_err(|e| AppError::Internal(format!("Engine build task failed: {}", e)))??;

                Ok::<_, AppError>(Arc::new(engine))
            })
            .await
            .cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.initialized()
    }
}
