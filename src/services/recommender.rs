use std::time::Instant;

use crate::{
    error::{AppError, AppResult},
    models::{DatasetStats, Movie, MovieRecord, Rating, Recommendation},
    services::{
        catalog::Catalog, corpus::Corpus, similarity::SimilarityMatrix, stats,
        vectorizer::TfIdfModel,
    },
};

/// Candidates examined per requested result before filters apply.
///
/// When the filters reject most of this window, fewer than `n` results are
/// returned; the window is not widened.
pub const CANDIDATE_WINDOW_FACTOR: usize = 2;

/// How a free-text title is matched against `title_clean`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Case-insensitive equality
    Exact,
    /// Case-insensitive substring
    #[default]
    Substring,
}

/// Popularity and quality floors applied to recommendation candidates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationFilter {
    pub min_rating_count: u64,
    pub min_avg_rating: f64,
}

impl RecommendationFilter {
    pub fn new(min_rating_count: u64, min_avg_rating: f64) -> Self {
        Self {
            min_rating_count,
            min_avg_rating,
        }
    }

    fn accepts(&self, movie: &Movie) -> bool {
        movie.rating_count >= self.min_rating_count && movie.avg_rating >= self.min_avg_rating
    }
}

impl Default for RecommendationFilter {
    fn default() -> Self {
        Self::new(5, 0.0)
    }
}

/// Content-similarity recommender over an immutable corpus.
///
/// The corpus, the fitted TF-IDF model and the similarity matrix are built
/// together and share the same row ordering. Queries only read them.
#[derive(Debug)]
pub struct RecommendationEngine {
    corpus: Corpus,
    model: TfIdfModel,
    similarity: SimilarityMatrix,
    stats: DatasetStats,
}

impl RecommendationEngine {
    /// Merges the tables, fits the vector model and computes the similarity matrix
    pub fn build(records: &[MovieRecord], ratings: &[Rating]) -> AppResult<Self> {
        let start = Instant::now();

        let corpus = Corpus::build(records, ratings)?;
        if corpus.is_empty() {
            return Err(AppError::EmptyCorpus("movie table is empty".to_string()));
        }

        let model = TfIdfModel::fit(corpus.documents())?;
        let similarity = SimilarityMatrix::build(model.vectors());
        let stats = stats::compute(&corpus, ratings);

        tracing::info!(
            movies = corpus.len(),
            ratings = ratings.len(),
            vocabulary = model.vocabulary_size(),
            build_time_ms = start.elapsed().as_millis(),
            "Recommendation engine built"
        );

        Ok(Self {
            corpus,
            model,
            similarity,
            stats,
        })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn model(&self) -> &TfIdfModel {
        &self.model
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }

    pub fn catalog(&self) -> Catalog<'_> {
        Catalog::new(&self.corpus)
    }

    /// Resolves a free-text title to a corpus position.
    ///
    /// Among several matches the one with the most ratings wins; on equal
    /// counts the earliest in corpus order is kept.
    pub fn find_movie(&self, title: &str, mode: MatchMode) -> Option<(usize, &Movie)> {
        let query = title.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(usize, &Movie)> = None;
        for (index, movie) in self.corpus.movies().iter().enumerate() {
            let candidate = movie.title_clean.to_lowercase();
            let matched = match mode {
                MatchMode::Exact => candidate == query,
                MatchMode::Substring => candidate.contains(&query),
            };
            if !matched {
                continue;
            }
            match best {
                Some((_, current)) if current.rating_count >= movie.rating_count => {}
                _ => best = Some((index, movie)),
            }
        }
        best
    }

    /// Up to `n` movies most similar to `title`, most similar first.
    ///
    /// Returns an empty list for a blank title, `n == 0`, an unknown title, or
    /// when no candidate passes `filter`.
    pub fn recommend(
        &self,
        title: &str,
        n: usize,
        filter: RecommendationFilter,
    ) -> Vec<Recommendation> {
        if n == 0 || title.trim().is_empty() {
            return Vec::new();
        }

        let Some((index, movie)) = self.find_movie(title, MatchMode::Substring) else {
            tracing::debug!(query = %title, "No movie matched recommendation query");
            return Vec::new();
        };

        let Some(row) = self.similarity.row(index) else {
            return Vec::new();
        };

        let mut ranked: Vec<(usize, f64)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(other, _)| other != index)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let window = n.saturating_mul(CANDIDATE_WINDOW_FACTOR);
        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .take(window)
            .filter_map(|(other, score)| {
                self.corpus
                    .get(other)
                    .filter(|candidate| filter.accepts(candidate))
                    .map(|candidate| Recommendation::from_movie(candidate, score))
            })
            .take(n)
            .collect();

        tracing::debug!(
            query = %title,
            resolved = %movie.title,
            returned = recommendations.len(),
            "Recommendations computed"
        );

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings_for(movie_id: i64, count: usize, score: f64) -> Vec<Rating> {
        (0..count)
            .map(|user| Rating::new(user as i64, movie_id, score))
            .collect()
    }

    fn scenario_engine() -> RecommendationEngine {
        let records = vec![
            MovieRecord::new(1, "Inception (2010)", "Action|Sci-Fi"),
            MovieRecord::new(2, "Interstellar (2014)", "Adventure|Sci-Fi"),
            MovieRecord::new(3, "Titanic (1997)", "Drama|Romance"),
        ];
        RecommendationEngine::build(&records, &[]).unwrap()
    }

    fn catalog_engine() -> RecommendationEngine {
        let records = vec![
            MovieRecord::new(1, "King Kong (1933)", "Action|Adventure|Fantasy|Horror"),
            MovieRecord::new(2, "King Kong (2005)", "Action|Adventure|Drama|Fantasy|Thriller"),
            MovieRecord::new(3, "Kong: Skull Island (2017)", "Action|Adventure|Fantasy"),
            MovieRecord::new(4, "Godzilla (2014)", "Action|Adventure|Sci-Fi"),
            MovieRecord::new(5, "Jurassic Park (1993)", "Action|Adventure|Sci-Fi|Thriller"),
            MovieRecord::new(6, "Titanic (1997)", "Drama|Romance"),
            MovieRecord::new(7, "Notebook, The (2004)", "Drama|Romance"),
        ];
        let mut ratings = ratings_for(1, 3, 3.5);
        ratings.extend(ratings_for(2, 8, 3.0));
        ratings.extend(ratings_for(3, 6, 3.2));
        ratings.extend(ratings_for(4, 1, 2.5));
        ratings.extend(ratings_for(5, 20, 4.2));
        ratings.extend(ratings_for(6, 15, 3.8));
        ratings.extend(ratings_for(7, 9, 3.9));
        RecommendationEngine::build(&records, &ratings).unwrap()
    }

    fn no_filter() -> RecommendationFilter {
        RecommendationFilter::new(0, 0.0)
    }

    #[test]
    fn test_shared_genre_ranks_higher() {
        let engine = scenario_engine();
        let results = engine.recommend("Inception", 2, no_filter());

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Interstellar (2014)");
        assert_eq!(results[1].title, "Titanic (1997)");
        assert!(results[0].similarity > results[1].similarity);
    }

    #[test]
    fn test_equal_similarity_keeps_corpus_order() {
        let records = vec![
            MovieRecord::new(1, "Alpha (2001)", "Drama"),
            MovieRecord::new(2, "Bravo (2002)", "Drama"),
            MovieRecord::new(3, "Query (2003)", "Drama"),
            MovieRecord::new(4, "Charlie (2004)", "Drama"),
        ];
        let engine = RecommendationEngine::build(&records, &[]).unwrap();

        let results = engine.recommend("Query", 3, no_filter());

        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha (2001)", "Bravo (2002)", "Charlie (2004)"]);
        // only "drama" is shared: 1 / (1 + 2 * (ln(5/2) + 1)^2)
        let expected = 1.0 / (1.0 + 2.0 * ((2.5f64).ln() + 1.0).powi(2));
        for result in &results {
            assert!((result.similarity - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unknown_title_returns_empty() {
        let engine = scenario_engine();
        assert!(engine
            .recommend("nonexistent movie xyz", 5, no_filter())
            .is_empty());
    }

    #[test]
    fn test_blank_title_and_zero_n_return_empty() {
        let engine = scenario_engine();

        assert!(engine.recommend("", 5, no_filter()).is_empty());
        assert!(engine.recommend("   ", 5, no_filter()).is_empty());
        assert!(engine.recommend("Inception", 0, no_filter()).is_empty());
    }

    #[test]
    fn test_never_returns_queried_movie() {
        let engine = catalog_engine();
        let results = engine.recommend("Godzilla", 10, no_filter());

        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.title != "Godzilla (2014)"));
    }

    #[test]
    fn test_identical_text_does_not_displace_query() {
        let engine = catalog_engine();
        // Titanic and The Notebook share no title terms but the same genres
        let results = engine.recommend("Notebook", 3, no_filter());

        assert_eq!(results[0].title, "Titanic (1997)");
        assert!(results.iter().all(|r| r.title != "Notebook, The (2004)"));
    }

    #[test]
    fn test_results_sorted_and_filtered() {
        let engine = catalog_engine();
        let filter = RecommendationFilter::new(5, 3.1);
        let results = engine.recommend("Jurassic Park", 5, filter);

        for pair in results.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
        for r in &results {
            assert!(r.rating_count >= 5);
            assert!(r.avg_rating >= 3.1);
        }
        assert!(results.iter().all(|r| r.title != "Godzilla (2014)"));
    }

    #[test]
    fn test_candidate_window_can_under_fill() {
        let engine = catalog_engine();
        // both movies in the 2-candidate window rate below 4.0
        let results = engine.recommend("Titanic", 1, RecommendationFilter::new(0, 4.0));
        assert!(results.is_empty());
    }

    #[test]
    fn test_resolution_prefers_most_rated() {
        let engine = catalog_engine();

        let (index, movie) = engine.find_movie("king kong", MatchMode::Exact).unwrap();
        assert_eq!(index, 1);
        assert_eq!(movie.title, "King Kong (2005)");

        let (_, movie) = engine.find_movie("kong", MatchMode::Substring).unwrap();
        assert_eq!(movie.title, "King Kong (2005)");
    }

    #[test]
    fn test_resolution_ties_keep_corpus_order() {
        let records = vec![
            MovieRecord::new(1, "Solaris (1972)", "Drama|Sci-Fi"),
            MovieRecord::new(2, "Solaris (2002)", "Drama|Romance|Sci-Fi"),
        ];
        let engine = RecommendationEngine::build(&records, &[]).unwrap();

        let (index, _) = engine.find_movie("  SOLARIS ", MatchMode::Exact).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn test_exact_mode_rejects_partial_titles() {
        let engine = catalog_engine();
        assert!(engine.find_movie("kong", MatchMode::Exact).is_none());
        assert!(engine.find_movie("", MatchMode::Substring).is_none());
    }

    #[test]
    fn test_build_empty_corpus_fails() {
        let result = RecommendationEngine::build(&[], &[]);
        assert!(matches!(result, Err(AppError::EmptyCorpus(_))));
    }

    #[test]
    fn test_similarity_matches_corpus_size() {
        let engine = catalog_engine();
        assert_eq!(engine.similarity().len(), engine.corpus().len());
        assert_eq!(engine.model().vectors().len(), engine.corpus().len());
        assert_eq!(engine.stats().total_movies, 7);
    }
}
