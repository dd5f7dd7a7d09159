//! Property-based invariant tests for table compilation.
//!
//! 1. Sum of confusion-matrix cells equals the number of accumulated pairs.
//! 2. Sparse encoding decodes back to the exact integer matrix.
//! 3. Sparse encoding has the layout length implied by its nonzero cells.
//! 4. Grid keeps the strictly highest score; ties keep the first seen.
//! 5. After fill, every column with a populated boundary row is complete.
//! 6. Filled cells equal their `m + 1` neighbor when not measured directly.
//! 7. Running the fill twice equals running it once.
//! 8. Record encoding is deterministic and decodes to the table's strategies.

use proptest::prelude::*;
use tablec_core::Strategy as Choice;
use tablec_core::{
    CellOrigin, ConfusionMatrix, GridShape, RecordSchema, StrategyGridBuilder, decode_records,
    decode_sparse, encode_sparse, encode_table,
};

// ── Strategies ────────────────────────────────────────────────────────────

fn pairs_in(size: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..size, 0..size), 0..200)
}

fn label_space_and_pairs() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..40).prop_flat_map(|size| (Just(size), pairs_in(size)))
}

fn small_matrix() -> impl Strategy<Value = Vec<Vec<u64>>> {
    (1usize..12).prop_flat_map(|size| {
        prop::collection::vec(
            prop::collection::vec(prop_oneof![3 => Just(0u64), 1 => 1u64..=0xfff], size),
            size,
        )
    })
}

#[derive(Debug, Clone)]
struct Sample {
    m: u32,
    eps: u32,
    score: f64,
    bits: u32,
    redundancy: u32,
}

fn sample_stream() -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec(
        (10u32..=14, 0u32..=3, 0u32..5, 4u32..=6, 1u32..=20).prop_map(
            |(m, eps, score, bits, redundancy)| Sample {
                m,
                eps,
                score: f64::from(score),
                bits,
                redundancy,
            },
        ),
        0..60,
    )
}

fn shape() -> GridShape {
    GridShape::new(10, 14, 3).unwrap()
}

fn build(samples: &[Sample]) -> StrategyGridBuilder {
    let mut builder = StrategyGridBuilder::new(shape());
    for s in samples {
        builder
            .update_at(s.m, s.eps, s.score, Choice::new(s.bits, s.redundancy))
            .unwrap();
    }
    builder
}

// ═══════════════════════════════════════════════════════════════════════════
// 1–3. Confusion matrix and sparse encoding
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn matrix_total_equals_pair_count((size, pairs) in label_space_and_pairs()) {
        let matrix = ConfusionMatrix::from_pairs(size, pairs.iter().copied()).unwrap();
        let cell_sum: u64 = (0..size).map(|r| matrix.row(r).unwrap().iter().sum::<u64>()).sum();
        prop_assert_eq!(cell_sum, pairs.len() as u64);
        prop_assert_eq!(matrix.total(), pairs.len() as u64);
    }

    #[test]
    fn sparse_round_trip_is_exact(rows in small_matrix()) {
        let matrix = ConfusionMatrix::from_rows(&rows).unwrap();
        let encoded = encode_sparse(&matrix).unwrap();
        let decoded = decode_sparse(&encoded, matrix.size()).unwrap();
        prop_assert_eq!(decoded.to_rows(), rows);
    }

    #[test]
    fn sparse_length_matches_layout(rows in small_matrix()) {
        let matrix = ConfusionMatrix::from_rows(&rows).unwrap();
        let nonzero = rows.iter().flatten().filter(|c| **c > 0).count();
        let encoded = encode_sparse(&matrix).unwrap();
        prop_assert_eq!(encoded.len(), 2 * matrix.size() + 5 * nonzero);
        prop_assert!(encoded.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 4. Strict-greater selection, first-wins ties
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn grid_keeps_first_sample_with_max_score(samples in sample_stream()) {
        let builder = build(&samples);
        for (m, eps) in shape().coords() {
            let at_cell: Vec<&Sample> =
                samples.iter().filter(|s| s.m == m && s.eps == eps).collect();
            let cell = builder.get(m, eps).unwrap();
            match at_cell.iter().map(|s| s.score).reduce(f64::max) {
                None => prop_assert!(cell.is_none()),
                Some(max) => {
                    let first = at_cell.iter().find(|s| s.score == max).unwrap();
                    let cell = cell.unwrap();
                    prop_assert_eq!(cell.score, max);
                    prop_assert_eq!(cell.strategy, Choice::new(first.bits, first.redundancy));
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 5–7. Backward fill
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fill_completes_columns_with_populated_boundary(samples in sample_stream()) {
        let mut builder = build(&samples);
        builder.backward_fill();
        let shape = shape();
        for eps in 0..=shape.max_eps() {
            if builder.get(shape.max_m(), eps).unwrap().is_none() {
                continue;
            }
            for m in shape.min_m()..=shape.max_m() {
                prop_assert!(builder.get(m, eps).unwrap().is_some(), "m={} eps={}", m, eps);
            }
        }
    }

    #[test]
    fn filled_cells_copy_upper_neighbor(samples in sample_stream()) {
        let mut builder = build(&samples);
        builder.backward_fill();
        let shape = shape();
        for (m, eps) in shape.coords() {
            let Some(cell) = builder.get(m, eps).unwrap() else { continue };
            if let CellOrigin::Inherited { from_m } = cell.origin {
                prop_assert!(m < shape.max_m());
                prop_assert!(from_m > m);
                let upper = builder.get(m + 1, eps).unwrap().unwrap();
                prop_assert_eq!(cell.strategy, upper.strategy);
                prop_assert_eq!(cell.score, upper.score);
            }
        }
    }

    #[test]
    fn fill_is_idempotent(samples in sample_stream()) {
        let mut once = build(&samples);
        let first = once.backward_fill();
        let mut twice = once.clone();
        let second = twice.backward_fill();
        prop_assert_eq!(first, second);
        for (m, eps) in shape().coords() {
            prop_assert_eq!(once.get(m, eps).unwrap(), twice.get(m, eps).unwrap());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 8. Record encoding
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn record_encoding_is_deterministic_and_decodable(
        top in prop::collection::vec((4u32..=9, 0u32..=99), 4),
    ) {
        let shape = shape();
        let mut builder = StrategyGridBuilder::new(shape);
        for (eps, (bits, redundancy)) in top.iter().enumerate() {
            builder
                .update_at(shape.max_m(), eps as u32, 1.0, Choice::new(*bits, *redundancy))
                .unwrap();
        }
        let table = builder.finish().unwrap();

        let first = encode_table(&table, RecordSchema::Compact).unwrap();
        let second = encode_table(&table, RecordSchema::Compact).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), shape.cell_count() * 3);
        prop_assert_eq!(
            decode_records(&first, shape, RecordSchema::Compact).unwrap(),
            table.strategies()
        );
    }
}
