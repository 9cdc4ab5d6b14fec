use serde::Serialize;

/// Descriptive aggregates over the loaded dataset
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetStats {
    pub total_movies: usize,
    pub total_ratings: usize,
    pub unique_users: usize,
    /// Mean of every individual rating score
    pub avg_rating: f64,
    /// Sample standard deviation of rating scores
    pub rating_std: f64,
    pub top_genres: Vec<GenreCount>,
    pub genre_distribution: Vec<GenreCount>,
    /// Score to number of ratings with that score, ascending by score
    pub rating_distribution: Vec<RatingBucket>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatingBucket {
    pub rating: f64,
    pub count: usize,
}
