#![no_main]

use libfuzzer_sys::fuzz_target;
use tablec_core::{decode_sparse, decode_sparse_at, encode_sparse};

fuzz_target!(|data: &[u8]| {
    // First byte picks the label space (1..=32).
    let Some((&head, rest)) = data.split_first() else {
        return;
    };
    let size = usize::from(head % 32) + 1;
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };

    // Decoding must never panic.
    if let Ok(matrix) = decode_sparse(text, size) {
        // Accepted input is canonical up to hex digit case.
        let reencoded = encode_sparse(&matrix).expect("decoded matrix must re-encode");
        assert_eq!(reencoded, text.to_ascii_lowercase());
        assert_eq!(matrix.size(), size);
    }

    // Streaming decode only ever moves the offset forward.
    let mut offset = 0;
    while offset < text.len() {
        let before = offset;
        if decode_sparse_at(text, size, &mut offset).is_err() {
            break;
        }
        assert!(offset > before, "decode_sparse_at made no progress");
    }
});
