#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tablec_core::{
    CellOrigin, GridShape, RecordSchema, Strategy, StrategyGridBuilder, decode_records,
    encode_table,
};

#[derive(Debug, Arbitrary)]
struct Sample {
    m: u8,
    eps: u8,
    score: f64,
    bits: u8,
    redundancy: u8,
}

#[derive(Debug, Arbitrary)]
struct Input {
    rows: u8,
    max_eps: u8,
    samples: Vec<Sample>,
}

fuzz_target!(|input: Input| {
    let min_m = 10;
    let max_m = min_m + u32::from(input.rows % 8);
    let shape = GridShape::new(min_m, max_m, u32::from(input.max_eps % 8)).expect("valid shape");

    let mut builder = StrategyGridBuilder::new(shape);
    for sample in input.samples.iter().take(256) {
        let strategy = Strategy::new(u32::from(sample.bits % 10), u32::from(sample.redundancy));
        // Out-of-grid and non-finite samples are rejected, never panic.
        let _ = builder.update_at(
            min_m + u32::from(sample.m % 10),
            u32::from(sample.eps % 10),
            sample.score,
            strategy,
        );
    }

    // Fill is idempotent.
    let first = builder.backward_fill();
    let snapshot = builder.clone();
    let second = builder.backward_fill();
    assert_eq!(first, second);

    let Ok(table) = builder.finish() else {
        // Unresolved cells imply an absent top row cell.
        assert!(first.unresolved > 0);
        return;
    };
    for ((m, eps), candidate) in table.iter() {
        let expected = snapshot.get(m, eps).expect("in range").expect("resolved");
        assert_eq!(candidate.strategy, expected.strategy);
        if let CellOrigin::Inherited { from_m } = candidate.origin {
            assert!(from_m > m);
        }
    }

    if let Ok(encoded) = encode_table(&table, RecordSchema::Compact) {
        let decoded = decode_records(&encoded, shape, RecordSchema::Compact).expect("decode");
        assert_eq!(decoded, table.strategies());
    }
});
