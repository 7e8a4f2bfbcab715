//! Property-based tests for the codec.
//!
//! Round-trip, prefix-freedom, code optimality and truncation detection over
//! generated inputs.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use nipzip::frequency::FrequencyTable;
use nipzip::{compress, compress_bytes, decompress, decompress_bytes, HuffmanCodec, HuffmanError};
use proptest::prelude::*;

// =============================================================================
// GENERATORS
// =============================================================================

fn small_alphabet_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::char::range('a', 'h'), 1..400)
        .prop_map(|chars| chars.into_iter().collect())
}

/// At most three distinct symbols, long enough that a misread tree region
/// can fit inside the body.
fn narrow_alphabet_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::char::range('a', 'c'), 1..3000)
        .prop_map(|chars| chars.into_iter().collect())
}

fn unicode_text() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 1..200).prop_map(|chars| chars.into_iter().collect())
}

/// Skewed counts produce deeper trees than uniform text.
fn skewed_text() -> impl Strategy<Value = String> {
    prop::collection::vec((prop::char::range('A', 'Z'), 1usize..60), 1..20).prop_map(|runs| {
        runs.into_iter()
            .flat_map(|(symbol, count)| std::iter::repeat(symbol).take(count))
            .collect()
    })
}

/// Weighted path length of an optimal prefix code, computed independently.
fn huffman_cost(counts: &[usize]) -> usize {
    if counts.len() == 1 {
        return counts[0];
    }
    let mut heap: BinaryHeap<Reverse<usize>> = counts.iter().copied().map(Reverse).collect();
    let mut cost = 0;
    while heap.len() > 1 {
        let Reverse(a) = heap.pop().unwrap();
        let Reverse(b) = heap.pop().unwrap();
        cost += a + b;
        heap.push(Reverse(a + b));
    }
    cost
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_roundtrip_small_alphabet(text in small_alphabet_text()) {
        let packed = compress(&text).unwrap();
        prop_assert_eq!(decompress(&packed).unwrap(), text);
    }

    #[test]
    fn prop_roundtrip_unicode(text in unicode_text()) {
        let packed = compress(&text).unwrap();
        prop_assert_eq!(decompress(&packed).unwrap(), text);
    }

    #[test]
    fn prop_roundtrip_skewed(text in skewed_text()) {
        let packed = compress(&text).unwrap();
        prop_assert_eq!(decompress(&packed).unwrap(), text);
    }

    #[test]
    fn prop_roundtrip_bytes(data in prop::collection::vec(any::<u8>(), 1..300)) {
        let distinct = {
            let mut seen = data.clone();
            seen.sort_unstable();
            seen.dedup();
            seen.len()
        };
        prop_assume!(distinct <= 255);
        let packed = compress_bytes(&data).unwrap();
        prop_assert_eq!(decompress_bytes(&packed).unwrap(), data);
    }

    #[test]
    fn prop_codes_are_prefix_free(text in skewed_text()) {
        let codec = HuffmanCodec::new(&text).unwrap();
        let codes: Vec<_> = codec.code_table().iter().map(|(_, code)| *code).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                prop_assert!(i == j || !a.is_prefix_of(b), "{} prefixes {}", a, b);
            }
        }
    }

    #[test]
    fn prop_codes_are_optimal(text in skewed_text()) {
        let codec = HuffmanCodec::new(&text).unwrap();
        let frequencies = FrequencyTable::from_text(&text).unwrap();

        let weighted: usize = frequencies
            .records()
            .iter()
            .map(|record| record.count * codec.code_table().get(record.symbol).unwrap().len())
            .sum();
        let counts: Vec<usize> = frequencies.records().iter().map(|r| r.count).collect();

        prop_assert_eq!(weighted, huffman_cost(&counts));
    }

    #[test]
    fn prop_container_is_byte_exact(text in small_alphabet_text()) {
        // tree + filler/sentinel/codes + trailer, all whole bytes
        let codec = HuffmanCodec::new(&text).unwrap();
        let data = codec.encode_symbols(text.chars()).unwrap();
        prop_assert_eq!(data.tree.len() % 8, 0);
        prop_assert_eq!(data.payload.len() % 8, 0);
        prop_assert_eq!(data.serialize().len(), data.len_bytes());
    }

    #[test]
    fn prop_dropped_last_byte_is_truncated_header(text in narrow_alphabet_text()) {
        // the old symbol count (1-3) becomes the mode byte, declaring a zero bit longest code
        let mut packed = compress(&text).unwrap();
        packed.pop();
        let result = decompress(&packed);
        prop_assert!(
            matches!(result, Err(HuffmanError::TruncatedHeader { .. })),
            "decoded {:?}",
            result
        );
    }

    #[test]
    fn prop_dropped_last_byte_never_decodes(text in small_alphabet_text()) {
        let mut packed = compress(&text).unwrap();
        packed.pop();
        let result = decompress(&packed);
        prop_assert!(result.is_err(), "decoded {:?}", result);
    }
}
