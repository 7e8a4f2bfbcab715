use tracing::debug;

use crate::bit_vec::BitVec;
use crate::error::{HuffmanError, Result};
use crate::metadata::Trailer;

/// The three regions of a container.
///
/// ```text
/// [tree region][filler][sentinel][payload codes][trailer: 16 bits]
/// ```
///
/// `payload` covers filler, sentinel and codes. Both the tree region and
/// the payload are whole bytes, so the serialized container is too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedData {
    pub tree: BitVec,
    pub payload: BitVec,
    pub trailer: Trailer,
}

impl CompressedData {
    pub fn serialize(&self) -> Vec<u8> {
        let mut bits = BitVec::with_capacity(self.tree.len() + self.payload.len() + Trailer::BITS);
        bits.extend_from_bitvec(&self.tree);
        bits.extend_from_bitvec(&self.payload);
        for byte in self.trailer.to_bytes() {
            bits.push_bits(byte as u64, 8);
        }
        debug_assert_eq!(bits.len() % 8, 0);
        bits.into_bytes()
    }

    /// Split a container using the sizes its trailer declares.
    ///
    /// A trailer that declares no symbols, more tree than the body holds, or
    /// a longest code no Huffman tree of that size can have, is reported as
    /// [`HuffmanError::TruncatedHeader`].
    pub fn deserialize(bytes: &[u8]) -> Result<CompressedData> {
        let Some((body, trailer_bytes)) = bytes.split_last_chunk::<2>() else {
            return Err(HuffmanError::TruncatedHeader {
                needed: Trailer::BITS,
                available: bytes.len() * 8,
            });
        };
        let trailer = Trailer::from_bytes(*trailer_bytes)?;

        let body = BitVec::from_bytes(body);
        // a cut-short container reads its last payload byte as the symbol count
        if trailer.symbol_count == 0 {
            return Err(HuffmanError::TruncatedHeader {
                needed: trailer.entry_bits(),
                available: body.len(),
            });
        }
        let tree_bits = trailer.tree_bits();
        if tree_bits > body.len() || !trailer.describes_tree() {
            return Err(HuffmanError::TruncatedHeader {
                needed: tree_bits,
                available: body.len(),
            });
        }
        debug!(
            symbols = trailer.symbol_count,
            max_code_length = trailer.max_code_length,
            mode = %trailer.mode,
            tree_bits,
            "read container trailer"
        );

        Ok(CompressedData {
            tree: body.slice(0, tree_bits),
            payload: body.slice(tree_bits, body.len()),
            trailer,
        })
    }

    pub fn len_bytes(&self) -> usize {
        (self.tree.len() + self.payload.len() + Trailer::BITS).div_ceil(8)
    }
}
