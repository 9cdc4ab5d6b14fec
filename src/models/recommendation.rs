use serde::Serialize;

use super::Movie;

/// A movie ranked by content similarity to a queried title
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub similarity: f64,
    pub genres: String,
    pub avg_rating: f64,
    pub rating_count: u64,
}

impl Recommendation {
    pub fn from_movie(movie: &Movie, similarity: f64) -> Self {
        Self {
            title: movie.title.clone(),
            similarity,
            genres: movie.genres.clone(),
            avg_rating: movie.avg_rating,
            rating_count: movie.rating_count,
        }
    }
}

/// A movie returned by the catalog filters (no similarity involved)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogEntry {
    pub title: String,
    pub genres: String,
    pub avg_rating: f64,
    pub rating_count: u64,
}

impl From<&Movie> for CatalogEntry {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            genres: movie.genres.clone(),
            avg_rating: movie.avg_rating,
            rating_count: movie.rating_count,
        }
    }
}
