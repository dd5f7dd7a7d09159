//! Column-major sparse edge encoding of a confusion matrix.
//!
//! For each predicted label `c` the stream holds the number of truth rows
//! with a nonzero count in column `c`, then one `(row, count)` pair per such
//! row in ascending row order:
//!
//! ```text
//! [rows:2 hex] ([row:2 hex][count:3 hex])*   repeated for c in 0..m
//! ```

use crate::confusion::ConfusionMatrix;
use crate::error::{Result, TableError};
use crate::fixed::FixedField;

pub const ROW_COUNT_FIELD: FixedField = FixedField::hex("row_count", 2);
pub const ROW_FIELD: FixedField = FixedField::hex("row", 2);
pub const COUNT_FIELD: FixedField = FixedField::hex("count", 3);

/// Largest label space whose row indices fit the row field.
pub const MAX_LABELS: usize = 0xff;

/// Largest per-cell count the count field can carry.
pub const MAX_COUNT: u64 = 0xfff;

/// Reject label spaces whose row indices cannot be encoded.
pub fn check_label_space(size: usize) -> Result<()> {
    if size > MAX_LABELS {
        return Err(TableError::FieldOverflow {
            field: "label_space",
            value: i64::try_from(size).unwrap_or(i64::MAX),
            width: ROW_FIELD.width,
            radix: ROW_FIELD.radix,
        });
    }
    Ok(())
}

/// Append the encoding of `matrix` to `out`.
///
/// On error `out` is left exactly as it was.
pub fn encode_sparse_into(matrix: &ConfusionMatrix, out: &mut String) -> Result<()> {
    let size = matrix.size();
    check_label_space(size)?;

    let mut encoded = String::new();
    for col in 0..size {
        let edges: Vec<(usize, u64)> = matrix
            .column(col)
            .enumerate()
            .filter(|(_, count)| *count > 0)
            .collect();

        ROW_COUNT_FIELD.push(&mut encoded, edges.len() as i64)?;
        for (row, count) in edges {
            ROW_FIELD.push(&mut encoded, row as i64)?;
            COUNT_FIELD.push(&mut encoded, clamp_i64(count))?;
        }
    }

    tracing::debug!(
        target: "tablec.encode",
        size,
        len = encoded.len(),
        "sparse confusion matrix encoded"
    );
    out.push_str(&encoded);
    Ok(())
}

pub fn encode_sparse(matrix: &ConfusionMatrix) -> Result<String> {
    let mut out = String::new();
    encode_sparse_into(matrix, &mut out)?;
    Ok(out)
}

/// Decode one matrix of `size` labels. The whole input must be consumed.
pub fn decode_sparse(text: &str, size: usize) -> Result<ConfusionMatrix> {
    let mut offset = 0;
    let matrix = decode_sparse_at(text, size, &mut offset)?;
    if offset != text.len() {
        return Err(TableError::malformed(offset, "trailing data after matrix"));
    }
    Ok(matrix)
}

/// Decode one matrix starting at `*offset`, leaving the offset after it.
///
/// Only canonical encodings are accepted: rows strictly ascending, counts
/// nonzero, rows inside the label space.
pub fn decode_sparse_at(text: &str, size: usize, offset: &mut usize) -> Result<ConfusionMatrix> {
    let mut rows = vec![vec![0_u64; size]; size];
    for col in 0..size {
        let edges = ROW_COUNT_FIELD.read(text, offset)?;
        let mut previous: Option<usize> = None;
        for _ in 0..edges {
            let at = *offset;
            let row = ROW_FIELD.read(text, offset)? as usize;
            let count = COUNT_FIELD.read(text, offset)?;
            if row >= size {
                return Err(TableError::malformed(
                    at,
                    format!("row {row} outside label space {size}"),
                ));
            }
            if previous.is_some_and(|prev| prev >= row) {
                return Err(TableError::malformed(at, "rows not strictly ascending"));
            }
            if count == 0 {
                return Err(TableError::malformed(at, "zero count edge"));
            }
            rows[row][col] = count;
            previous = Some(row);
        }
    }
    ConfusionMatrix::from_rows(&rows)
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
