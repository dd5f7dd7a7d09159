#![forbid(unsafe_code)]

//! Strategy-table compilation for embedded lookup data.
//!
//! Two pipelines share the fixed-width field discipline of [`fixed`]:
//!
//! - trial pairs → [`ConfusionMatrix`] → [`diagonal`] statistics and the
//!   [`sparse`] edge encoding;
//! - statistics samples → [`StrategyGridBuilder`] → backward fill →
//!   [`StrategyTable`] → [`record`] encoding.
//!
//! Everything is single-threaded and deterministic: identical input order
//! yields byte-identical output. Any error aborts the pass; no partial output
//! is returned.

pub mod confusion;
pub mod diagonal;
pub mod error;
pub mod fixed;
pub mod grid;
pub mod labels;
pub mod record;
pub mod sparse;
pub mod stats;
pub mod surface;

pub use confusion::{ConfusionMatrix, ProbabilityMatrix};
pub use diagonal::{DiagonalSummary, normalized_diagonal, raw_diagonal};
pub use error::{Axis, Radix, Result, TableError};
pub use fixed::FixedField;
pub use grid::{Candidate, CellOrigin, FillReport, GridShape, StrategyGridBuilder, StrategyTable};
pub use labels::LabelSpaces;
pub use record::{RecordSchema, decode_records, encode_table};
pub use sparse::{
    check_label_space, decode_sparse, decode_sparse_at, encode_sparse, encode_sparse_into,
};
pub use stats::{StatisticsSample, Strategy, eps_bucket};
pub use surface::{ScoreSurface, SurfaceComparison, compare_surfaces};
