//! Confusion-matrix aggregation over `(truth, predicted)` trial pairs.
//!
//! The integer [`ConfusionMatrix`] is the source of truth. Normalized views
//! ([`ProbabilityMatrix`]) are derived from it and never written back, so
//! the exact counts stay available for serialization.

use crate::error::{Result, TableError};

/// `size × size` count matrix, row-major, indexed `[truth][predicted]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    size: usize,
    counts: Vec<u64>,
    total: u64,
}

impl ConfusionMatrix {
    /// Create an all-zero matrix over the label space `[0, size)`.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(TableError::shape("label space must not be empty"));
        }
        let cells = size
            .checked_mul(size)
            .ok_or_else(|| TableError::shape(format!("label space {size} is too large")))?;
        Ok(Self {
            size,
            counts: vec![0; cells],
            total: 0,
        })
    }

    /// Aggregate a whole stream of pairs into a fresh matrix.
    pub fn from_pairs<I>(size: usize, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut matrix = Self::new(size)?;
        for (truth, predicted) in pairs {
            matrix.accumulate(truth, predicted)?;
        }
        tracing::debug!(
            target: "tablec.confusion",
            size,
            total = matrix.total,
            "confusion matrix finalized"
        );
        Ok(matrix)
    }

    /// Build a matrix from explicit rows. Every row must have `rows.len()` entries.
    pub fn from_rows(rows: &[Vec<u64>]) -> Result<Self> {
        let mut matrix = Self::new(rows.len())?;
        for (truth, row) in rows.iter().enumerate() {
            if row.len() != matrix.size {
                return Err(TableError::shape(format!(
                    "row {truth} has {} entries, expected {}",
                    row.len(),
                    matrix.size
                )));
            }
            for (predicted, count) in row.iter().enumerate() {
                matrix.counts[truth * matrix.size + predicted] = *count;
                matrix.total += *count;
            }
        }
        Ok(matrix)
    }

    /// Record one trial. Labels outside `[0, size)` are rejected and leave the
    /// matrix untouched.
    pub fn accumulate(&mut self, truth: usize, predicted: usize) -> Result<()> {
        if truth >= self.size || predicted >= self.size {
            return Err(TableError::OutOfRangeLabel {
                truth,
                predicted,
                size: self.size,
            });
        }
        self.counts[truth * self.size + predicted] += 1;
        self.total += 1;
        Ok(())
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of accumulated pairs (sum over all cells).
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Count at `[truth][predicted]`, or `None` outside the label space.
    #[must_use]
    pub fn get(&self, truth: usize, predicted: usize) -> Option<u64> {
        if truth >= self.size || predicted >= self.size {
            return None;
        }
        self.counts.get(truth * self.size + predicted).copied()
    }

    #[must_use]
    pub fn row(&self, truth: usize) -> Option<&[u64]> {
        if truth >= self.size {
            return None;
        }
        self.counts.get(truth * self.size..(truth + 1) * self.size)
    }

    pub fn column(&self, predicted: usize) -> impl Iterator<Item = u64> + '_ {
        self.counts
            .iter()
            .skip(predicted)
            .step_by(self.size)
            .copied()
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        self.counts.chunks(self.size).map(<[u64]>::to_vec).collect()
    }

    /// Raw diagonal counts, one per label.
    #[must_use]
    pub fn diagonal(&self) -> Vec<u64> {
        self.counts.iter().step_by(self.size + 1).copied().collect()
    }

    /// Divide every cell by row 0's total.
    ///
    /// Row 0 is the reference class: it is expected to be observed as truth
    /// in every trial, so its total equals the trial count.
    pub fn normalized(&self) -> Result<ProbabilityMatrix> {
        let reference: u64 = self.counts.iter().take(self.size).sum();
        if reference == 0 {
            return Err(TableError::EmptyReferenceRow);
        }
        let scale = reference as f64;
        Ok(ProbabilityMatrix {
            size: self.size,
            values: self.counts.iter().map(|c| *c as f64 / scale).collect(),
        })
    }
}

/// Read-only normalized view of a [`ConfusionMatrix`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl ProbabilityMatrix {
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn get(&self, truth: usize, predicted: usize) -> Option<f64> {
        if truth >= self.size || predicted >= self.size {
            return None;
        }
        self.values.get(truth * self.size + predicted).copied()
    }

    #[must_use]
    pub fn diagonal(&self) -> Vec<f64> {
        self.values.iter().step_by(self.size + 1).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ConfusionMatrix;
    use crate::error::TableError;

    const PAIRS: [(usize, usize); 5] = [(0, 0), (0, 0), (0, 1), (1, 1), (2, 2)];

    #[test]
    fn accumulates_small_stream() {
        let matrix = ConfusionMatrix::from_pairs(3, PAIRS).unwrap();
        assert_eq!(
            matrix.to_rows(),
            vec![vec![2, 1, 0], vec![0, 1, 0], vec![0, 0, 1]]
        );
        assert_eq!(matrix.total(), 5);
        assert_eq!(matrix.diagonal(), vec![2, 1, 1]);
    }

    #[test]
    fn normalizes_by_reference_row() {
        let matrix = ConfusionMatrix::from_pairs(3, PAIRS).unwrap();
        let diag = matrix.normalized().unwrap().diagonal();
        let expected = [2.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];
        for (got, want) in diag.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{got} != {want}");
        }
        // Source counts are unchanged by normalization.
        assert_eq!(matrix.get(0, 0), Some(2));
    }

    #[test]
    fn lookups_outside_label_space_are_none() {
        let matrix = ConfusionMatrix::from_pairs(3, PAIRS).unwrap();
        assert_eq!(matrix.get(2, 2), Some(1));
        assert_eq!(matrix.get(3, 0), None);
        assert_eq!(matrix.get(0, 3), None);
        assert_eq!(matrix.row(1), Some(&[0, 1, 0][..]));
        assert_eq!(matrix.row(3), None);

        let probabilities = matrix.normalized().unwrap();
        assert!(probabilities.get(0, 1).is_some_and(|p| (p - 1.0 / 3.0).abs() < 1e-12));
        assert_eq!(probabilities.get(1, 3), None);
    }

    #[test]
    fn rejects_out_of_range_labels_without_mutating() {
        let mut matrix = ConfusionMatrix::new(3).unwrap();
        let error = matrix.accumulate(1, 3).unwrap_err();
        assert_eq!(
            error,
            TableError::OutOfRangeLabel {
                truth: 1,
                predicted: 3,
                size: 3
            }
        );
        assert!(matrix.accumulate(3, 0).is_err());
        assert_eq!(matrix.total(), 0);
    }

    #[test]
    fn empty_reference_row_cannot_normalize() {
        let matrix = ConfusionMatrix::from_pairs(2, [(1, 1)]).unwrap();
        assert_eq!(matrix.normalized(), Err(TableError::EmptyReferenceRow));
    }

    #[test]
    fn zero_sized_label_space_rejected() {
        assert!(matches!(
            ConfusionMatrix::new(0),
            Err(TableError::InvalidShape { .. })
        ));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        assert!(ConfusionMatrix::from_rows(&[vec![1, 0], vec![0]]).is_err());
        let matrix = ConfusionMatrix::from_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(matrix.total(), 10);
        assert_eq!(matrix.column(1).collect::<Vec<_>>(), vec![2, 4]);
    }
}
