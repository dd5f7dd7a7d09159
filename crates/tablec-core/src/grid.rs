//! Best-configuration grid over `(m, eps)` and its backward fill.
//!
//! # Lifecycle
//!
//! 1. [`StrategyGridBuilder::update`] keeps, per cell, the first sample with
//!    the strictly highest score. Cells start absent, so a first sample is
//!    accepted whatever its score (including 0 or negative).
//! 2. [`StrategyGridBuilder::backward_fill`] walks `m` from `max_m - 1` down
//!    to `min_m` and copies `(m + 1, eps)` into every cell without a direct
//!    measurement. Inherited cells are recomputed from scratch on every
//!    call, so the pass is idempotent and stays correct after late updates.
//! 3. [`StrategyGridBuilder::finish`] fills and then requires every cell to
//!    be resolved, producing a [`StrategyTable`].
//!
//! # Modeling assumption
//!
//! The fill assumes that a configuration chosen for budget `m + 1` is an
//! acceptable (possibly suboptimal) choice for budget `m`. Nothing here
//! checks that against the scoring function.

use serde::Serialize;

use crate::error::{Axis, Result, TableError};
use crate::stats::{StatisticsSample, Strategy, eps_bucket};

/// Inclusive bounds of the `(m, eps)` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridShape {
    min_m: u32,
    max_m: u32,
    max_eps: u32,
}

/// Upper bound on `rows * cols` accepted by [`GridShape::new`].
pub const MAX_GRID_CELLS: usize = 1 << 24;

impl GridShape {
    /// Validate the bounds. The cell count must fit [`MAX_GRID_CELLS`], so
    /// every later size computation is overflow-free.
    pub fn new(min_m: u32, max_m: u32, max_eps: u32) -> Result<Self> {
        if min_m > max_m {
            return Err(TableError::shape(format!(
                "min_m={min_m} is greater than max_m={max_m}"
            )));
        }
        let rows = usize::try_from(max_m - min_m)
            .ok()
            .and_then(|span| span.checked_add(1));
        let cols = usize::try_from(max_eps)
            .ok()
            .and_then(|eps| eps.checked_add(1));
        let cells = rows
            .zip(cols)
            .and_then(|(rows, cols)| rows.checked_mul(cols))
            .filter(|cells| *cells <= MAX_GRID_CELLS);
        if cells.is_none() {
            return Err(TableError::shape(format!(
                "grid m={min_m}..={max_m}, eps=0..={max_eps} exceeds {MAX_GRID_CELLS} cells"
            )));
        }
        Ok(Self {
            min_m,
            max_m,
            max_eps,
        })
    }

    #[must_use]
    pub fn min_m(&self) -> u32 {
        self.min_m
    }

    #[must_use]
    pub fn max_m(&self) -> u32 {
        self.max_m
    }

    #[must_use]
    pub fn max_eps(&self) -> u32 {
        self.max_eps
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        (self.max_m - self.min_m) as usize + 1
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.max_eps as usize + 1
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Row-major offset of `(m, eps)`.
    pub fn index(&self, m: u32, eps: u32) -> Result<usize> {
        if m < self.min_m || m > self.max_m {
            return Err(TableError::OutOfRangeGridCoordinate {
                axis: Axis::M,
                value: i64::from(m),
                min: i64::from(self.min_m),
                max: i64::from(self.max_m),
            });
        }
        if eps > self.max_eps {
            return Err(TableError::OutOfRangeGridCoordinate {
                axis: Axis::Eps,
                value: i64::from(eps),
                min: 0,
                max: i64::from(self.max_eps),
            });
        }
        Ok((m - self.min_m) as usize * self.cols() + eps as usize)
    }

    fn coords_of(&self, index: usize) -> (u32, u32) {
        let cols = self.cols();
        (self.min_m + (index / cols) as u32, (index % cols) as u32)
    }

    /// All coordinates, `m` ascending then `eps` ascending.
    pub fn coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.cell_count()).map(|index| self.coords_of(index))
    }
}

/// Where a resolved cell's configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellOrigin {
    Measured,
    /// Copied down from the nearest measured row above, `from_m`.
    Inherited { from_m: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub score: f64,
    pub strategy: Strategy,
    pub origin: CellOrigin,
}

/// Counts produced by one fill pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    pub measured: usize,
    pub inherited: usize,
    pub unresolved: usize,
}

#[derive(Debug, Clone)]
pub struct StrategyGridBuilder {
    shape: GridShape,
    cells: Vec<Option<Candidate>>,
}

impl StrategyGridBuilder {
    #[must_use]
    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            cells: vec![None; shape.cell_count()],
        }
    }

    #[must_use]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Offer a sample measured at `error_ratio`. Returns whether it became
    /// the cell's best candidate.
    pub fn update(&mut self, m: u32, error_ratio: f64, score: f64, strategy: Strategy) -> Result<bool> {
        let eps = eps_bucket(error_ratio)?;
        self.update_at(m, eps, score, strategy)
    }

    /// Offer a sample at an integer grid coordinate.
    ///
    /// Ties keep the candidate seen first, so the result depends on input
    /// order and callers needing reproducible output must supply samples in
    /// a stable order.
    pub fn update_at(&mut self, m: u32, eps: u32, score: f64, strategy: Strategy) -> Result<bool> {
        if !score.is_finite() {
            return Err(TableError::InvalidValue {
                field: "expected_score",
                value: score,
            });
        }
        let index = self.shape.index(m, eps)?;
        let replace = match &self.cells[index] {
            Some(current) if current.origin == CellOrigin::Measured => score > current.score,
            _ => true,
        };
        if replace {
            tracing::trace!(
                target: "tablec.grid",
                m,
                eps,
                score,
                bits = strategy.bits,
                redundancy = strategy.redundancy,
                "best candidate replaced"
            );
            self.cells[index] = Some(Candidate {
                score,
                strategy,
                origin: CellOrigin::Measured,
            });
        }
        Ok(replace)
    }

    pub fn ingest(&mut self, sample: &StatisticsSample) -> Result<bool> {
        self.update(
            sample.m,
            sample.error_ratio,
            sample.expected_score,
            sample.strategy(),
        )
    }

    /// Ingest every sample in order, returning how many replaced a best.
    pub fn extend<'a, I>(&mut self, samples: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a StatisticsSample>,
    {
        let mut replaced = 0;
        for sample in samples {
            if self.ingest(sample)? {
                replaced += 1;
            }
        }
        Ok(replaced)
    }

    /// Current state of a cell (measured, inherited, or absent).
    pub fn get(&self, m: u32, eps: u32) -> Result<Option<&Candidate>> {
        let index = self.shape.index(m, eps)?;
        Ok(self.cells[index].as_ref())
    }

    pub fn backward_fill(&mut self) -> FillReport {
        for cell in &mut self.cells {
            if cell.is_some_and(|c| c.origin != CellOrigin::Measured) {
                *cell = None;
            }
        }

        let cols = self.shape.cols();
        let mut report = FillReport {
            measured: self.cells.iter().filter(|c| c.is_some()).count(),
            ..FillReport::default()
        };

        for row in (0..self.shape.rows().saturating_sub(1)).rev() {
            for eps in 0..cols {
                let index = row * cols + eps;
                if self.cells[index].is_some() {
                    continue;
                }
                let Some(source) = self.cells[index + cols] else {
                    continue;
                };
                let from_m = match source.origin {
                    CellOrigin::Measured => self.shape.min_m + row as u32 + 1,
                    CellOrigin::Inherited { from_m } => from_m,
                };
                self.cells[index] = Some(Candidate {
                    origin: CellOrigin::Inherited { from_m },
                    ..source
                });
                report.inherited += 1;
            }
        }

        report.unresolved = self.cells.len() - report.measured - report.inherited;
        tracing::debug!(
            target: "tablec.grid",
            measured = report.measured,
            inherited = report.inherited,
            unresolved = report.unresolved,
            "backward fill complete"
        );
        report
    }

    /// Fill and require every cell to be resolved.
    ///
    /// Fails on the first absent cell in row-major order.
    pub fn finish(mut self) -> Result<StrategyTable> {
        self.backward_fill();
        let shape = self.shape;
        let cells = self
            .cells
            .into_iter()
            .enumerate()
            .map(|(index, cell)| {
                cell.ok_or_else(|| {
                    let (m, eps) = shape.coords_of(index);
                    TableError::UnresolvedGridCell { m, eps }
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(StrategyTable { shape, cells })
    }
}

/// Fully resolved grid: one candidate per coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyTable {
    shape: GridShape,
    cells: Vec<Candidate>,
}

impl StrategyTable {
    #[must_use]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn get(&self, m: u32, eps: u32) -> Result<&Candidate> {
        Ok(&self.cells[self.shape.index(m, eps)?])
    }

    /// Cells in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = ((u32, u32), &Candidate)> + '_ {
        self.shape.coords().zip(self.cells.iter())
    }

    #[must_use]
    pub fn strategies(&self) -> Vec<Strategy> {
        self.cells.iter().map(|cell| cell.strategy).collect()
    }

    #[must_use]
    pub fn scores(&self) -> Vec<f64> {
        self.cells.iter().map(|cell| cell.score).collect()
    }
}
