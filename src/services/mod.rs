pub mod catalog;
pub mod context;
pub mod corpus;
pub mod loader;
pub mod posters;
pub mod recommender;
pub mod similarity;
pub mod stats;
pub mod stop_words;
pub mod vectorizer;

pub use catalog::Catalog;
pub use context::{DataSource, EngineContext};
pub use corpus::Corpus;
pub use recommender::{MatchMode, RecommendationEngine, RecommendationFilter};
pub use similarity::SimilarityMatrix;
pub use vectorizer::{SparseVector, TfIdfModel};
