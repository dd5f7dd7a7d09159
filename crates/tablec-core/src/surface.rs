//! Best-score surfaces of resolved tables and their relative comparison.

use serde::Serialize;

use crate::error::{Result, TableError};
use crate::grid::{GridShape, StrategyTable};

/// Winning score per cell, row-major, after backward fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSurface {
    shape: GridShape,
    scores: Vec<f64>,
}

impl ScoreSurface {
    #[must_use]
    pub fn from_table(table: &StrategyTable) -> Self {
        Self {
            shape: table.shape(),
            scores: table.scores(),
        }
    }

    #[must_use]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }
}

/// Mean of each surface after normalizing every cell by the better of the two.
///
/// 1.0 means the surface matched the element-wise best everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceComparison {
    pub baseline: f64,
    pub candidate: f64,
}

pub fn compare_surfaces(baseline: &ScoreSurface, candidate: &ScoreSurface) -> Result<SurfaceComparison> {
    if baseline.shape != candidate.shape {
        return Err(TableError::shape(
            "compared surfaces must share the same grid shape",
        ));
    }

    let mut baseline_sum = 0.0;
    let mut candidate_sum = 0.0;
    for (a, b) in baseline.scores.iter().zip(&candidate.scores) {
        let best = a.max(*b);
        if best == 0.0 {
            baseline_sum += 1.0;
            candidate_sum += 1.0;
        } else {
            baseline_sum += a / best;
            candidate_sum += b / best;
        }
    }

    let cells = baseline.shape.cell_count() as f64;
    Ok(SurfaceComparison {
        baseline: baseline_sum / cells,
        candidate: candidate_sum / cells,
    })
}
