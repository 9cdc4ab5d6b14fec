use serde::{Deserialize, Serialize};

/// Row of the movies table as supplied by the loader
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    pub title: String,
    /// Pipe-delimited genre tags, e.g. `Action|Sci-Fi`
    pub genres: String,
}

/// Row of the ratings table; only consumed in aggregate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    pub rating: f64,
    pub timestamp: i64,
}

/// A movie merged with its rating aggregates and derived text fields
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Movie {
    pub id: i64,
    /// Raw title, possibly carrying a release year such as `Heat (1995)`
    pub title: String,
    pub genres: String,
    /// Title with the parenthesised release year removed
    pub title_clean: String,
    /// `title_clean` followed by the space-separated genres
    pub combined_text: String,
    pub avg_rating: f64,
    pub rating_count: u64,
}

impl Movie {
    /// Genre tags split on the pipe separator
    pub fn genre_tags(&self) -> impl Iterator<Item = &str> {
        self.genres.split('|')
    }
}

impl MovieRecord {
    pub fn new(movie_id: i64, title: &str, genres: &str) -> Self {
        Self {
            movie_id,
            title: title.to_string(),
            genres: genres.to_string(),
        }
    }
}

impl Rating {
    pub fn new(user_id: i64, movie_id: i64, rating: f64) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
            timestamp: 0,
        }
    }
}
