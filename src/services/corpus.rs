use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieRecord, Rating},
};

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d{4}\)").expect("year pattern is valid"));

/// Ordered, immutable collection of merged movies.
///
/// A movie's position in this sequence is its row in the term vectors and in
/// the similarity matrix, so the order is fixed once built.
#[derive(Debug, Clone)]
pub struct Corpus {
    movies: Vec<Movie>,
}

impl Corpus {
    /// Merges movies with per-movie rating aggregates.
    ///
    /// Movies without ratings get `avg_rating = 0` and `rating_count = 0`.
    /// Ratings for ids that are not in the movie table are ignored. A movie
    /// id that appears twice fails the build with `InvalidDataset`.
    pub fn build(records: &[MovieRecord], ratings: &[Rating]) -> AppResult<Self> {
        let mut aggregates: HashMap<i64, (f64, u64)> = HashMap::new();
        for rating in ratings {
            let entry = aggregates.entry(rating.movie_id).or_insert((0.0, 0));
            entry.0 += rating.rating;
            entry.1 += 1;
        }

        let mut movies = Vec::with_capacity(records.len());
        let mut seen = HashSet::with_capacity(records.len());

        for record in records {
            if !seen.insert(record.movie_id) {
                return Err(AppError::InvalidDataset(format!(
                    "Duplicate movie id {}",
                    record.movie_id
                )));
            }

            let (avg_rating, rating_count) = match aggregates.get(&record.movie_id) {
                Some(&(sum, count)) => (sum / count as f64, count),
                None => (0.0, 0),
            };

            let title_clean = clean_title(&record.title);
            let combined_text = format!("{} {}", title_clean, record.genres.replace('|', " "));

            movies.push(Movie {
                id: record.movie_id,
                title: record.title.clone(),
                genres: record.genres.clone(),
                title_clean,
                combined_text,
                avg_rating,
                rating_count,
            });
        }

        let unmatched = aggregates
            .keys()
            .filter(|id| !seen.contains(*id))
            .count();
        if unmatched > 0 {
            tracing::debug!(unmatched, "Dropped rating aggregates with no matching movie");
        }

        Ok(Self { movies })
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Combined title and genre text of every movie, in corpus order
    pub fn documents(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|movie| movie.combined_text.as_str())
    }
}

/// Removes the first `(YYYY)` occurrence and trims the result
pub fn clean_title(title: &str) -> String {
    YEAR_PATTERN.replacen(title, 1, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_title_strips_year() {
        assert_eq!(clean_title("Inception (2010)"), "Inception");
        assert_eq!(clean_title("  Heat (1995)  "), "Heat");
    }

    #[test]
    fn test_clean_title_without_year_is_unchanged() {
        assert_eq!(clean_title("Cosmos"), "Cosmos");
        assert_eq!(clean_title("Se7en (a.k.a. Seven)"), "Se7en (a.k.a. Seven)");
    }

    #[test]
    fn test_clean_title_only_first_year() {
        assert_eq!(clean_title("Remake (1999) (2004)"), "Remake  (2004)");
    }

    #[test]
    fn test_build_aggregates_ratings() {
        let records = vec![
            MovieRecord::new(1, "Inception (2010)", "Action|Sci-Fi"),
            MovieRecord::new(2, "Titanic (1997)", "Drama|Romance"),
        ];
        let ratings = vec![
            Rating::new(1, 1, 4.0),
            Rating::new(2, 1, 5.0),
            Rating::new(3, 1, 3.0),
        ];

        let corpus = Corpus::build(&records, &ratings).unwrap();
        let inception = corpus.get(0).unwrap();

        assert_eq!(inception.rating_count, 3);
        assert!((inception.avg_rating - 4.0).abs() < 1e-12);
        assert_eq!(inception.title_clean, "Inception");
        assert_eq!(inception.combined_text, "Inception Action Sci-Fi");
    }

    #[test]
    fn test_build_unrated_movie_defaults_to_zero() {
        let records = vec![MovieRecord::new(2, "Titanic (1997)", "Drama|Romance")];

        let corpus = Corpus::build(&records, &[]).unwrap();
        let titanic = corpus.get(0).unwrap();

        assert_eq!(titanic.rating_count, 0);
        assert_eq!(titanic.avg_rating, 0.0);
    }

    #[test]
    fn test_build_drops_ratings_for_unknown_movies() {
        let records = vec![MovieRecord::new(1, "Heat (1995)", "Action|Crime|Thriller")];
        let ratings = vec![Rating::new(1, 1, 4.0), Rating::new(1, 99, 1.0)];

        let corpus = Corpus::build(&records, &ratings).unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get(0).unwrap().rating_count, 1);
        assert!(corpus.movies().iter().all(|movie| movie.id != 99));
    }

    #[test]
    fn test_build_preserves_record_order() {
        let records = vec![
            MovieRecord::new(30, "C (2001)", "Drama"),
            MovieRecord::new(10, "A (2002)", "Drama"),
            MovieRecord::new(20, "B (2003)", "Drama"),
        ];

        let corpus = Corpus::build(&records, &[]).unwrap();

        let ids: Vec<i64> = corpus.movies().iter().map(|movie| movie.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
        let documents: Vec<&str> = corpus.documents().collect();
        assert_eq!(documents, vec!["C Drama", "A Drama", "B Drama"]);
    }

    #[test]
    fn test_build_rejects_duplicate_ids() {
        let records = vec![
            MovieRecord::new(1, "King Kong (1933)", "Action|Adventure"),
            MovieRecord::new(1, "King Kong (2005)", "Action|Adventure"),
        ];

        let result = Corpus::build(&records, &[]);
        assert!(matches!(
            result,
            Err(AppError::InvalidDataset(ref msg)) if msg == "Duplicate movie id 1"
        ));
    }

    #[test]
    fn test_build_does_not_mutate_sources() {
        let records = vec![MovieRecord::new(1, "Heat (1995)", "Action|Crime")];
        let ratings = vec![Rating::new(1, 1, 4.0)];
        let before = (records.clone(), ratings.clone());

        Corpus::build(&records, &ratings).unwrap();

        assert_eq!((records, ratings), before);
    }
}
