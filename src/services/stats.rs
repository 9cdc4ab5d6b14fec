use std::collections::{HashMap, HashSet};

use crate::{
    models::{DatasetStats, GenreCount, Rating, RatingBucket},
    services::corpus::Corpus,
};

const TOP_GENRES: usize = 5;

/// Aggregates over the corpus and the raw rating table
pub fn compute(corpus: &Corpus, ratings: &[Rating]) -> DatasetStats {
    let unique_users: HashSet<i64> = ratings.iter().map(|r| r.user_id).collect();
    let genre_distribution = genre_counts(corpus);

    DatasetStats {
        total_movies: corpus.len(),
        total_ratings: ratings.len(),
        unique_users: unique_users.len(),
        avg_rating: mean(ratings),
        rating_std: sample_std(ratings),
        top_genres: genre_distribution.iter().take(TOP_GENRES).cloned().collect(),
        genre_distribution,
        rating_distribution: rating_buckets(ratings),
    }
}

fn mean(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    ratings.iter().map(|r| r.rating).sum::<f64>() / ratings.len() as f64
}

fn sample_std(ratings: &[Rating]) -> f64 {
    if ratings.len() < 2 {
        return 0.0;
    }
    let mean = mean(ratings);
    let variance = ratings
        .iter()
        .map(|r| (r.rating - mean).powi(2))
        .sum::<f64>()
        / (ratings.len() - 1) as f64;
    variance.sqrt()
}

/// Genre frequencies, descending; ties keep order of first appearance
fn genre_counts(corpus: &Corpus) -> Vec<GenreCount> {
    let mut counts: Vec<GenreCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for genre in corpus.movies().iter().flat_map(|movie| movie.genre_tags()) {
        match index.get(genre) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(genre, counts.len());
                counts.push(GenreCount {
                    genre: genre.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn rating_buckets(ratings: &[Rating]) -> Vec<RatingBucket> {
    let mut buckets: HashMap<u64, usize> = HashMap::new();
    for rating in ratings {
        *buckets.entry(rating.rating.to_bits()).or_insert(0) += 1;
    }

    let mut buckets: Vec<RatingBucket> = buckets
        .into_iter()
        .map(|(bits, count)| RatingBucket {
            rating: f64::from_bits(bits),
            count,
        })
        .collect();
    buckets.sort_by(|a, b| a.rating.total_cmp(&b.rating));
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieRecord;

    fn fixture() -> (Corpus, Vec<Rating>) {
        let records = vec![
            MovieRecord::new(1, "Heat (1995)", "Action|Crime|Thriller"),
            MovieRecord::new(2, "Titanic (1997)", "Drama|Romance"),
            MovieRecord::new(3, "Ronin (1998)", "Action|Crime"),
        ];
        let ratings = vec![
            Rating::new(1, 1, 4.0),
            Rating::new(1, 2, 3.0),
            Rating::new(2, 1, 5.0),
            Rating::new(3, 3, 4.0),
        ];
        let corpus = Corpus::build(&records, &ratings).unwrap();
        (corpus, ratings)
    }

    #[test]
    fn test_totals() {
        let (corpus, ratings) = fixture();
        let stats = compute(&corpus, &ratings);

        assert_eq!(stats.total_movies, 3);
        assert_eq!(stats.total_ratings, 4);
        assert_eq!(stats.unique_users, 3);
        assert!((stats.avg_rating - 4.0).abs() < 1e-12);
        assert!((stats.rating_std - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_top_genres_by_frequency() {
        let (corpus, ratings) = fixture();
        let stats = compute(&corpus, &ratings);

        let top: Vec<(&str, usize)> = stats
            .top_genres
            .iter()
            .map(|g| (g.genre.as_str(), g.count))
            .collect();
        assert_eq!(
            top,
            vec![("Action", 2), ("Crime", 2), ("Thriller", 1), ("Drama", 1), ("Romance", 1)]
        );
        assert_eq!(stats.genre_distribution.len(), 5);
    }

    #[test]
    fn test_rating_distribution_ascending() {
        let (corpus, ratings) = fixture();
        let stats = compute(&corpus, &ratings);

        assert_eq!(
            stats.rating_distribution,
            vec![
                RatingBucket { rating: 3.0, count: 1 },
                RatingBucket { rating: 4.0, count: 2 },
                RatingBucket { rating: 5.0, count: 1 },
            ]
        );
    }

    #[test]
    fn test_no_ratings() {
        let (corpus, _) = fixture();
        let stats = compute(&corpus, &[]);

        assert_eq!(stats.avg_rating, 0.0);
        assert_eq!(stats.rating_std, 0.0);
        assert_eq!(stats.unique_users, 0);
        assert!(stats.rating_distribution.is_empty());
    }
}
