//! Pairwise cosine similarity over catalog-aligned vectors.

use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::RatingMatrix;

/// Square, symmetric N×N matrix stored row-major
///
/// The diagonal is always 1.0, including movies whose vector is all zeros.
/// Off-diagonal cells involving a zero vector are 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn from_cells(size: usize, cells: Vec<f64>) -> AppResult<Self> {
        let expected = size.checked_mul(size).ok_or_else(|| {
            AppError::InvalidInput(format!("similarity matrix of size {} is too large", size))
        })?;
        if cells.len() != expected {
            return Err(AppError::ShapeMismatch {
                left: expected,
                right: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Cosine similarity between every pair of vectors
    pub fn cosine(vectors: &[Vec<f64>]) -> Self {
        let size = vectors.len();
        let norms: Vec<f64> = vectors.iter().map(|v| norm(v)).collect();
        let mut cells = vec![0.0; size * size];

        for i in 0..size {
            cells[i * size + i] = 1.0;
            for j in (i + 1)..size {
                let score = if norms[i] == 0.0 || norms[j] == 0.0 {
                    0.0
                } else {
                    (dot(&vectors[i], &vectors[j]) / (norms[i] * norms[j])).clamp(-1.0, 1.0)
                };
                // mirror into the lower triangle
                cells[i * size + j] = score;
                cells[j * size + i] = score;
            }
        }

        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.size + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.cells[i * self.size..(i + 1) * self.size]
    }

    pub(crate) fn cells(&self) -> &[f64] {
        &self.cells
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Content similarity from per-movie term-frequency vectors
pub fn content_similarity(vectors: &[Vec<f64>]) -> AppResult<SimilarityMatrix> {
    if let Some(first) = vectors.first() {
        if let Some(bad) = vectors.iter().find(|v| v.len() != first.len()) {
            return Err(AppError::ShapeMismatch {
                left: first.len(),
                right: bad.len(),
            });
        }
    }
    Ok(SimilarityMatrix::cosine(vectors))
}

/// Preference similarity from the rating columns of each movie
pub fn preference_similarity(ratings: &RatingMatrix) -> SimilarityMatrix {
    let columns: Vec<Vec<f64>> = (0..ratings.movies()).map(|m| ratings.column(m)).collect();
    SimilarityMatrix::cosine(&columns)
}
