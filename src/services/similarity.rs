use crate::services::vectorizer::SparseVector;

/// Dense, symmetric cosine-similarity matrix, stored row-major.
///
/// Row `i` corresponds to the `i`-th movie of the corpus the vectors were
/// fitted on. Memory is `O(n²)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Computes every pair once and mirrors it across the diagonal
    pub fn build(vectors: &[SparseVector]) -> Self {
        let size = vectors.len();
        let norms: Vec<f64> = vectors.iter().map(SparseVector::norm).collect();
        let mut values = vec![0.0; size * size];

        for i in 0..size {
            values[i * size + i] = 1.0;
            for j in (i + 1)..size {
                let sim = cosine(&vectors[i], &vectors[j], norms[i], norms[j]);
                values[i * size + j] = sim;
                values[j * size + i] = sim;
            }
        }

        Self { size, values }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.size && j < self.size).then(|| self.values[i * self.size + j])
    }

    /// Similarities of movie `i` to every movie, in corpus order
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.size).then(|| &self.values[i * self.size..(i + 1) * self.size])
    }
}

/// Cosine similarity with pre-computed norms; 0 when either vector is zero
fn cosine(a: &SparseVector, b: &SparseVector, norm_a: f64, norm_b: f64) -> f64 {
    let denom = norm_a * norm_b;
    if denom == 0.0 {
        return 0.0;
    }

    let result = a.dot(b) / denom;
    if !result.is_finite() {
        return 0.0;
    }
    result.clamp(-1.0, 1.0)
}
