//! # Similarity Index
//!
//! All-pairs cosine similarity over the encoded catalog, computed once at
//! startup and read-only afterwards.
//!
//! Category codes and standardized tempo can be negative, so entries range
//! over `[-1, 1]`. A zero vector has similarity `0.0` to everything,
//! itself included.
//!
//! ## Scaling
//!
//! The matrix is dense: `N * N` `f64` values (8 bytes each). A 10 000-row
//! catalog needs about 800 MB. The catalog is static, so nothing is ever
//! updated incrementally.

use crate::encoder::FeatureVector;
use rayon::prelude::*;
use std::time::Instant;

/// Cosine similarity between two vectors, `0.0` if either has zero magnitude.
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = magnitude(a);
    let norm_b = magnitude(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn magnitude(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Dense, symmetric `N x N` similarity matrix.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    n: usize,
    matrix: Vec<f64>,
    row_means: Vec<f64>,
}

impl SimilarityIndex {
    /// Build the matrix from the encoded catalog. Rows are computed in parallel.
    #[must_use]
    pub fn build(vectors: &[FeatureVector]) -> Self {
        let started = Instant::now();
        let n = vectors.len();
        let norms: Vec<f64> = vectors.iter().map(|v| magnitude(v)).collect();

        let mut matrix = vec![0.0; n * n];
        if n > 0 {
            matrix.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
                if norms[i] == 0.0 {
                    return;
                }
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell = if i == j {
                        1.0
                    } else if norms[j] == 0.0 {
                        0.0
                    } else {
                        let dot: f64 = vectors[i].iter().zip(&vectors[j]).map(|(x, y)| x * y).sum();
                        dot / (norms[i] * norms[j])
                    };
                }
            });
        }

        #[allow(clippy::cast_precision_loss)]
        let row_means = if n == 0 {
            Vec::new()
        } else {
            matrix
                .par_chunks(n)
                .map(|row| row.iter().sum::<f64>() / n as f64)
                .collect()
        };

        log::info!(
            "Built {n}x{n} similarity index in {:.2?}",
            started.elapsed()
        );

        Self { n, matrix, row_means }
    }

    /// Number of rows (and columns).
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity between rows `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(j < self.n, "column {j} out of bounds for {} rows", self.n);
        self.matrix[i * self.n + j]
    }

    /// Similarities of row `i` against every row.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.matrix[i * self.n..(i + 1) * self.n]
    }

    /// Mean of [`Self::row`]; how representative song `i` is of the whole catalog.
    #[must_use]
    pub fn row_mean(&self, i: usize) -> f64 {
        self.row_means[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_cosine_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < EPS);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < EPS);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_zero_vector_similarity_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_index_symmetric_with_unit_diagonal() {
        let vectors = vec![
            [1.0, 2.0, 0.0, 1.0, -0.5],
            [0.0, 1.0, 2.0, 0.0, 1.2],
            [2.0, 0.0, 1.0, 1.0, -0.7],
        ];
        let index = SimilarityIndex::build(&vectors);
        assert_eq!(index.len(), 3);
        for i in 0..3 {
            assert_eq!(index.get(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(index.get(i, j), index.get(j, i));
                assert!((index.get(i, j) - cosine_similarity(&vectors[i], &vectors[j])).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_zero_row_is_all_zero() {
        let vectors = vec![[0.0; 5], [1.0, 1.0, 1.0, 1.0, 1.0]];
        let index = SimilarityIndex::build(&vectors);
        assert_eq!(index.row(0), &[0.0, 0.0]);
        assert_eq!(index.get(1, 0), 0.0);
        assert_eq!(index.get(1, 1), 1.0);
    }

    #[test]
    fn test_row_mean_matches_row() {
        let vectors = vec![
            [1.0, 0.0, 0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0, -1.0],
            [0.0, 0.0, 0.0, 0.0, 0.0],
        ];
        let index = SimilarityIndex::build(&vectors);
        for i in 0..4 {
            let mean = index.row(i).iter().sum::<f64>() / 4.0;
            assert!((index.row_mean(i) - mean).abs() < EPS);
        }
    }

    #[test]
    fn test_negative_similarity_kept() {
        let vectors = vec![[1.0, 0.0, 0.0, 0.0, 2.0], [1.0, 0.0, 0.0, 0.0, -2.0]];
        let index = SimilarityIndex::build(&vectors);
        assert!(index.get(0, 1) < 0.0);
    }
}
