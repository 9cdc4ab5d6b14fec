use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    services::stop_words::is_stop_word,
};

/// Upper bound on vocabulary size; the most frequent terms are kept
pub const MAX_FEATURES: usize = 5000;

/// Sparse, L2-normalised TF-IDF vector. Entries are sorted by column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_counts(counts: HashMap<usize, u64>, idf: &[f64]) -> Self {
        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(column, count)| (column, count as f64 * idf[column]))
            .collect();
        entries.sort_by_key(|&(column, _)| column);

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut entries {
                *weight /= norm;
            }
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    #[cfg(test)]
    fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, w)| w == 0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product by merging the two sorted entry lists
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ci, wi) = self.entries[i];
            let (cj, wj) = other.entries[j];
            match ci.cmp(&cj) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wi * wj;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Fitted TF-IDF model: vocabulary and one idf-weighted vector per document.
///
/// Unigrams and bigrams are extracted after lowercasing, splitting on
/// non-word characters, dropping single-character tokens and removing
/// English stop words. Weights use smoothed idf, `ln((1 + n) / (1 + df)) + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct TfIdfModel {
    vocabulary: HashMap<String, usize>,
    vectors: Vec<SparseVector>,
}

impl TfIdfModel {
    /// Fits the model over `documents`, keeping at most [`MAX_FEATURES`] terms
    pub fn fit<'a, I>(documents: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::fit_with_limit(documents, MAX_FEATURES)
    }

    pub fn fit_with_limit<'a, I>(documents: I, max_features: usize) -> AppResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let analyzed: Vec<Vec<String>> = documents.into_iter().map(analyze).collect();
        if analyzed.is_empty() {
            return Err(AppError::EmptyCorpus(
                "cannot fit a vectorizer on zero documents".to_string(),
            ));
        }

        let mut term_freq: HashMap<&str, u64> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for terms in &analyzed {
            let mut seen: Vec<&str> = Vec::with_capacity(terms.len());
            for term in terms {
                *term_freq.entry(term.as_str()).or_insert(0) += 1;
                if !seen.contains(&term.as_str()) {
                    seen.push(term.as_str());
                    *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        if term_freq.is_empty() {
            return Err(AppError::EmptyCorpus(
                "vocabulary is empty after stop-word removal".to_string(),
            ));
        }

        let mut ranked: Vec<(&str, u64)> = term_freq.into_iter().collect();
        if ranked.len() > max_features {
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            ranked.truncate(max_features);
        }

        let mut terms: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort_unstable();

        let n_docs = analyzed.len() as f64;
        let idf: Vec<f64> = terms
            .iter()
            .map(|term| ((1.0 + n_docs) / (1.0 + doc_freq[term] as f64)).ln() + 1.0)
            .collect();

        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(column, term)| (term.to_string(), column))
            .collect();

        let vectors = analyzed
            .iter()
            .map(|doc_terms| {
                let mut counts: HashMap<usize, u64> = HashMap::new();
                for term in doc_terms {
                    if let Some(&column) = vocabulary.get(term) {
                        *counts.entry(column).or_insert(0) += 1;
                    }
                }
                SparseVector::from_counts(counts, &idf)
            })
            .collect();

        Ok(Self {
            vocabulary,
            vectors,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    #[cfg(test)]
    fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    pub fn vector(&self, index: usize) -> Option<&SparseVector> {
        self.vectors.get(index)
    }
}

/// Lowercased word tokens of two or more characters
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Tokens with stop words removed, followed by adjacent-pair bigrams
pub fn analyze(text: &str) -> Vec<String> {
    let tokens: Vec<String> = tokenize(text)
        .into_iter()
        .filter(|token| !is_stop_word(token))
        .collect();

    let bigrams: Vec<String> = tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect();

    tokens.into_iter().chain(bigrams).collect()
}
