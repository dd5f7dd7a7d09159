//! Per-label self-accuracy extracted from a finalized confusion matrix.

use serde::Serialize;

use crate::confusion::ConfusionMatrix;
use crate::error::Result;

/// Raw diagonal counts `matrix[i][i]`.
#[must_use]
pub fn raw_diagonal(matrix: &ConfusionMatrix) -> Vec<u64> {
    matrix.diagonal()
}

/// Diagonal of the matrix normalized by row 0's total.
pub fn normalized_diagonal(matrix: &ConfusionMatrix) -> Result<Vec<f64>> {
    Ok(matrix.normalized()?.diagonal())
}

/// Mean self-accuracy over a bounded number of labels.
///
/// `naive_*` looks at the first `take` labels in label order; `best_*` looks
/// at the `take` most accurate labels overall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagonalSummary {
    pub take: usize,
    pub naive_sorted: Vec<f64>,
    pub naive_mean: f64,
    pub best_sorted: Vec<f64>,
    pub best_mean: f64,
}

impl DiagonalSummary {
    #[must_use]
    pub fn compute(diagonal: &[f64], take: usize) -> Self {
        let take = take.min(diagonal.len());

        let mut naive_sorted = diagonal[..take].to_vec();
        sort_descending(&mut naive_sorted);

        let mut best_sorted = diagonal.to_vec();
        sort_descending(&mut best_sorted);
        best_sorted.truncate(take);

        Self {
            take,
            naive_mean: mean_over(&naive_sorted, take),
            naive_sorted,
            best_mean: mean_over(&best_sorted, take),
            best_sorted,
        }
    }
}

fn sort_descending(values: &mut [f64]) {
    values.sort_by(|a, b| b.total_cmp(a));
}

fn mean_over(values: &[f64], take: usize) -> f64 {
    if take == 0 {
        return 0.0;
    }
    values.iter().sum::<f64>() / take as f64
}
