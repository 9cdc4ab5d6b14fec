use std::cmp::Ordering;

use crate::{
    models::{CatalogEntry, Movie},
    services::corpus::Corpus,
};

/// Read-only filters over the merged corpus; never touch the similarity matrix.
///
/// Every query returns an empty list when nothing matches.
#[derive(Debug, Clone, Copy)]
pub struct Catalog<'a> {
    corpus: &'a Corpus,
}

impl<'a> Catalog<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        Self { corpus }
    }

    /// Case-insensitive genre substring match, most popular first
    pub fn by_genre(&self, genre: &str, n: usize) -> Vec<CatalogEntry> {
        let needle = genre.to_lowercase();
        let matches = self.filter(|movie| movie.genres.to_lowercase().contains(&needle));
        top_n(matches, n, by_popularity)
    }

    /// Case-sensitive genre substring match, most popular first
    pub fn popular_by_genre(&self, genre: &str, n: usize) -> Vec<CatalogEntry> {
        let matches = self.filter(|movie| movie.genres.contains(genre));
        top_n(matches, n, by_popularity)
    }

    /// Movies with `avg_rating` in `[min, max]` and enough ratings, best rated first
    pub fn by_rating_range(
        &self,
        min: f64,
        max: f64,
        min_ratings: u64,
        n: usize,
    ) -> Vec<CatalogEntry> {
        let matches = self.filter(|movie| {
            movie.avg_rating >= min && movie.avg_rating <= max && movie.rating_count >= min_ratings
        });
        top_n(matches, n, by_avg_rating)
    }

    /// Case-insensitive keyword match against the clean title or the genres
    pub fn search(&self, query: &str, n: usize) -> Vec<CatalogEntry> {
        let needle = query.to_lowercase();
        let matches = self.filter(|movie| {
            movie.title_clean.to_lowercase().contains(&needle)
                || movie.genres.to_lowercase().contains(&needle)
        });
        top_n(matches, n, by_popularity)
    }

    /// Most-rated movies
    pub fn top_popular(&self, n: usize) -> Vec<CatalogEntry> {
        let all = self.filter(|_| true);
        top_n(all, n, |a, b| b.rating_count.cmp(&a.rating_count))
    }

    /// Highest average rating among movies with at least `min_ratings` ratings
    pub fn top_rated(&self, n: usize, min_ratings: u64) -> Vec<CatalogEntry> {
        let matches = self.filter(|movie| movie.rating_count >= min_ratings);
        top_n(matches, n, by_avg_rating)
    }

    fn filter<F>(&self, predicate: F) -> Vec<&'a Movie>
    where
        F: Fn(&Movie) -> bool,
    {
        self.corpus
            .movies()
            .iter()
            .filter(|movie| predicate(movie))
            .collect()
    }
}

/// Stable sort then truncate, so ties keep corpus order
fn top_n<F>(mut movies: Vec<&Movie>, n: usize, compare: F) -> Vec<CatalogEntry>
where
    F: Fn(&Movie, &Movie) -> Ordering,
{
    movies.sort_by(|a, b| compare(a, b));
    movies.into_iter().take(n).map(CatalogEntry::from).collect()
}

fn by_popularity(a: &Movie, b: &Movie) -> Ordering {
    b.rating_count
        .cmp(&a.rating_count)
        .then_with(|| b.avg_rating.total_cmp(&a.avg_rating))
}

fn by_avg_rating(a: &Movie, b: &Movie) -> Ordering {
    b.avg_rating.total_cmp(&a.avg_rating)
}
