//! Tree region encoding.
//!
//! Each symbol gets one fixed-width entry:
//!
//! ```text
//! [code point: 1-3 bytes][skip count: 1 byte][padded code: code_slot_bits]
//! ```
//!
//! The padded code is `skip` zero bits followed by the real code. The number
//! of entries, the longest code and the character mode live in the trailer.

use tracing::trace;

use crate::bit_vec::BitVec;
use crate::code::{Code, CodeTable, MAX_CODE_LENGTH};
use crate::error::{HuffmanError, Result};
use crate::metadata::{CharMode, Trailer};

/// Code to symbol entries, longest code first.
///
/// Longer codes are tried before shorter ones when matching payload bits.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: Vec<(Code, char)>,
}

impl LookupTable {
    pub fn new(mut entries: Vec<(Code, char)>) -> Self {
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        LookupTable { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Code, char)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serialize `table` into a tree region and describe it with a trailer.
pub fn encode_tree(table: &CodeTable, mode: CharMode) -> Result<(BitVec, Trailer)> {
    let symbol_count = u8::try_from(table.len())
        .map_err(|_| HuffmanError::AlphabetOverflow { distinct: table.len() })?;
    if symbol_count == 0 {
        return Err(HuffmanError::EmptyInput);
    }

    let max_code_length = table.max_code_length();
    if max_code_length > MAX_CODE_LENGTH {
        return Err(HuffmanError::CodeLengthOverflow { length: max_code_length });
    }

    let trailer = Trailer {
        symbol_count,
        max_code_length: max_code_length as u8,
        mode,
    };
    let slot_bits = trailer.code_slot_bits();
    let symbol_bits = mode.byte_width() * 8;

    let mut tree = BitVec::with_capacity(trailer.tree_bits());
    for (symbol, code) in table.iter() {
        let code_point = *symbol as u32;
        if code_point > mode.max_code_point() {
            return Err(HuffmanError::InvalidSymbol(code_point));
        }
        let skip = slot_bits - code.len();

        tree.push_bits(code_point as u64, symbol_bits);
        tree.push_bits(skip as u64, 8);
        tree.push_zeros(skip);
        code.write_to(&mut tree);
        trace!(symbol = ?symbol, code = %code, skip, "wrote tree entry");
    }

    Ok((tree, trailer))
}

/// Read `trailer.symbol_count` entries from the start of `tree`.
pub fn decode_tree(tree: &BitVec, trailer: &Trailer) -> Result<LookupTable> {
    if trailer.symbol_count == 0 {
        return Err(HuffmanError::TruncatedHeader {
            needed: trailer.entry_bits(),
            available: tree.len(),
        });
    }

    let slot_bits = trailer.code_slot_bits();
    let symbol_bits = trailer.mode.byte_width() * 8;
    let max_code_length = trailer.max_code_length as usize;
    let truncated = || HuffmanError::TruncatedHeader {
        needed: trailer.tree_bits(),
        available: tree.len(),
    };

    let mut reader = tree.reader();
    let mut entries = Vec::with_capacity(trailer.symbol_count as usize);
    for index in 0..trailer.symbol_count as usize {
        let code_point = reader.read_bits(symbol_bits).ok_or_else(truncated)? as u32;
        let skip = reader.read_bits(8).ok_or_else(truncated)? as usize;
        let padded = reader.read_bits(slot_bits).ok_or_else(truncated)?;

        if skip >= slot_bits {
            return Err(HuffmanError::malformed(format!(
                "entry {index} skips {skip} of {slot_bits} code bits"
            )));
        }
        let len = slot_bits - skip;
        if len > max_code_length {
            return Err(HuffmanError::malformed(format!(
                "entry {index} has a {len} bit code, longest allowed is {max_code_length}"
            )));
        }
        let bits = padded & ((1u64 << len) - 1);
        if padded != bits {
            return Err(HuffmanError::malformed(format!(
                "entry {index} has non-zero padding"
            )));
        }
        let symbol = char::from_u32(code_point).ok_or(HuffmanError::InvalidSymbol(code_point))?;

        entries.push((Code::new(bits, len), symbol));
    }

    let longest = entries.iter().map(|(code, _)| code.len()).max().unwrap_or(0);
    if longest != max_code_length {
        return Err(HuffmanError::malformed(format!(
            "longest code is {longest} bits, trailer declares {max_code_length}"
        )));
    }

    Ok(LookupTable::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hufftree::HuffmanTree;

    fn table_for(text: &str) -> CodeTable {
        HuffmanTree::from_text(text).unwrap().generate_table().unwrap()
    }

    #[test]
    fn test_single_entry_layout() {
        let (tree, trailer) = encode_tree(&table_for("aaaa"), CharMode::Ascii).unwrap();
        assert_eq!(trailer.symbol_count, 1);
        assert_eq!(trailer.max_code_length, 1);
        // 'a', skip 7, then 0000000 followed by the code 1
        assert_eq!(tree.as_bytes(), &[b'a', 7, 0b0000_0001]);
    }

    #[test]
    fn test_wide_symbols_take_two_bytes() {
        let (tree, trailer) = encode_tree(&table_for("\u{12c}\u{12c}x"), CharMode::Wide).unwrap();
        assert_eq!(trailer.entry_bits(), 32);
        assert_eq!(tree.len(), 64);
        assert_eq!(&tree.as_bytes()[..4], &[0x01, 0x2c, 7, 0b0000_0001]);
    }

    #[test]
    fn test_decode_recovers_codes() {
        let table = table_for("abracadabra");
        let (tree, trailer) = encode_tree(&table, CharMode::Ascii).unwrap();
        let lookup = decode_tree(&tree, &trailer).unwrap();
        assert_eq!(lookup.len(), table.len());
        for (code, symbol) in lookup.iter() {
            assert_eq!(table.get(*symbol), Some(code));
        }
    }

    #[test]
    fn test_lookup_sorted_longest_first() {
        let lookup = decode_tree_for("abbcccdddd");
        let lengths: Vec<usize> = lookup.iter().map(|(code, _)| code.len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(lengths, sorted);
    }

    fn decode_tree_for(text: &str) -> LookupTable {
        let (tree, trailer) = encode_tree(&table_for(text), CharMode::Ascii).unwrap();
        decode_tree(&tree, &trailer).unwrap()
    }

    #[test]
    fn test_truncated_tree_region() {
        let (tree, trailer) = encode_tree(&table_for("abc"), CharMode::Ascii).unwrap();
        let short = tree.slice(0, tree.len() - 8);
        assert!(matches!(
            decode_tree(&short, &trailer),
            Err(HuffmanError::TruncatedHeader { .. })
        ));
    }

    #[test]
    fn test_bad_skip_count() {
        let tree = BitVec::from_bytes(&[b'a', 8, 0]);
        let trailer = Trailer {
            symbol_count: 1,
            max_code_length: 1,
            mode: CharMode::Ascii,
        };
        assert!(matches!(
            decode_tree(&tree, &trailer),
            Err(HuffmanError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_nonzero_padding() {
        let tree = BitVec::from_bytes(&[b'a', 7, 0b1000_0001]);
        let trailer = Trailer {
            symbol_count: 1,
            max_code_length: 1,
            mode: CharMode::Ascii,
        };
        assert!(matches!(
            decode_tree(&tree, &trailer),
            Err(HuffmanError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_zero_symbol_count() {
        let trailer = Trailer {
            symbol_count: 0,
            max_code_length: 1,
            mode: CharMode::Ascii,
        };
        assert!(matches!(
            decode_tree(&BitVec::new(), &trailer),
            Err(HuffmanError::TruncatedHeader { needed: 24, available: 0 })
        ));
    }

    #[test]
    fn test_longest_code_must_match_trailer() {
        // two one-bit codes under a trailer that promises a two-bit code
        let tree = BitVec::from_bytes(&[b'a', 7, 1, b'b', 7, 0]);
        let trailer = Trailer {
            symbol_count: 2,
            max_code_length: 2,
            mode: CharMode::Ascii,
        };
        assert!(matches!(
            decode_tree(&tree, &trailer),
            Err(HuffmanError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_surrogate_code_point_rejected() {
        let tree = BitVec::from_bytes(&[0xD8, 0x00, 7, 0b0000_0001]);
        let trailer = Trailer {
            symbol_count: 1,
            max_code_length: 1,
            mode: CharMode::Wide,
        };
        assert!(matches!(
            decode_tree(&tree, &trailer),
            Err(HuffmanError::InvalidSymbol(0xD800))
        ));
    }

    #[test]
    fn test_alphabet_overflow() {
        let mut table = CodeTable::new();
        for i in 0..256u32 {
            table.insert(char::from_u32(0x100 + i).unwrap(), Code::new(i as u64, 9));
        }
        assert!(matches!(
            encode_tree(&table, CharMode::Wide),
            Err(HuffmanError::AlphabetOverflow { distinct: 256 })
        ));
    }
}
