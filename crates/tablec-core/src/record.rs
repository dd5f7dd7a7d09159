//! Dense positional encoding of a resolved [`StrategyTable`].
//!
//! Cells are written in row-major order (`m` ascending, then `eps`
//! ascending) with no separators:
//!
//! ```text
//! Compact        [bits:1][redundancy:2]
//! WithScoreCoef  [bits:1][redundancy:2][score_coef*10:2]
//! ```
//!
//! All fields are zero-padded decimal.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::fixed::FixedField;
use crate::grid::{GridShape, StrategyTable};
use crate::stats::{Strategy, scaled_truncate};

pub const BITS_FIELD: FixedField = FixedField::decimal("bits", 1);
pub const REDUNDANCY_FIELD: FixedField = FixedField::decimal("redundancy", 2);
pub const SCORE_COEF_FIELD: FixedField = FixedField::decimal("score_coef", 2);

/// Multiplier applied to `score_coef` before truncation.
pub const SCORE_COEF_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordSchema {
    Compact,
    WithScoreCoef,
}

impl RecordSchema {
    /// Digits per cell.
    #[must_use]
    pub fn record_width(self) -> usize {
        let base = BITS_FIELD.width + REDUNDANCY_FIELD.width;
        match self {
            Self::Compact => base,
            Self::WithScoreCoef => base + SCORE_COEF_FIELD.width,
        }
    }

    /// `WithScoreCoef` when every cell has a coefficient, `Compact` when none do.
    pub fn infer(table: &StrategyTable) -> Result<Self> {
        let with_coef = table
            .iter()
            .filter(|(_, cell)| cell.strategy.score_coef.is_some())
            .count();
        match with_coef {
            0 => Ok(Self::Compact),
            n if n == table.shape().cell_count() => Ok(Self::WithScoreCoef),
            _ => Err(TableError::MixedSchema),
        }
    }
}

/// Encode every cell of `table`. Nothing is returned unless every field fits.
pub fn encode_table(table: &StrategyTable, schema: RecordSchema) -> Result<String> {
    let mut out = String::with_capacity(table.shape().cell_count() * schema.record_width());
    for ((m, eps), cell) in table.iter() {
        let strategy = &cell.strategy;
        BITS_FIELD.push(&mut out, i64::from(strategy.bits))?;
        REDUNDANCY_FIELD.push(&mut out, i64::from(strategy.redundancy))?;
        if schema == RecordSchema::WithScoreCoef {
            let coef = strategy.score_coef.ok_or(TableError::MissingField {
                field: "score_coef",
                m,
                eps,
            })?;
            let scaled = scaled_truncate("score_coef", coef, SCORE_COEF_SCALE)?;
            SCORE_COEF_FIELD.push(&mut out, i64::from(scaled))?;
        }
    }
    tracing::debug!(
        target: "tablec.encode",
        cells = table.shape().cell_count(),
        len = out.len(),
        ?schema,
        "strategy table encoded"
    );
    Ok(out)
}

/// Parse an encoded table back into row-major strategies.
///
/// Decoded `score_coef` values are the scaled integers divided by ten, so
/// they equal the input coefficient only up to the truncation applied on encode.
pub fn decode_records(text: &str, shape: GridShape, schema: RecordSchema) -> Result<Vec<Strategy>> {
    let expected = shape.cell_count() * schema.record_width();
    if text.len() != expected {
        return Err(TableError::malformed(
            text.len().min(expected),
            format!("expected {expected} digits, found {}", text.len()),
        ));
    }

    let mut offset = 0;
    let mut strategies = Vec::with_capacity(shape.cell_count());
    for _ in 0..shape.cell_count() {
        let bits = BITS_FIELD.read(text, &mut offset)? as u32;
        let redundancy = REDUNDANCY_FIELD.read(text, &mut offset)? as u32;
        let mut strategy = Strategy::new(bits, redundancy);
        if schema == RecordSchema::WithScoreCoef {
            let scaled = SCORE_COEF_FIELD.read(text, &mut offset)?;
            strategy.score_coef = Some(scaled as f64 / SCORE_COEF_SCALE);
        }
        strategies.push(strategy);
    }
    Ok(strategies)
}
