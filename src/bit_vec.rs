use crate::error::{HuffmanError, Result};

/// Growable bit buffer, most significant bit first within each byte.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        BitVec {
            bits: Vec::with_capacity(bit_capacity.div_ceil(8)),
            bit_count: 0,
        }
    }

    /// Every byte contributes eight bits.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        BitVec {
            bits: bytes.to_vec(),
            bit_count: bytes.len() * 8,
        }
    }

    /// Parse a textual `"0101..."` bit string.
    pub fn from_bit_str(text: &str) -> Result<Self> {
        let mut bit_vec = BitVec::with_capacity(text.len());
        for (position, found) in text.chars().enumerate() {
            match found {
                '0' => bit_vec.push_bit(false),
                '1' => bit_vec.push_bit(true),
                _ => return Err(HuffmanError::InvalidBitString { position, found }),
            }
        }
        Ok(bit_vec)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    /// Append the low `width` bits of `value`, most significant first.
    pub fn push_bits(&mut self, value: u64, width: usize) {
        debug_assert!(width <= 64);
        debug_assert!(width == 64 || value >> width == 0, "{value} does not fit {width} bits");
        for bit_pos in (0..width).rev() {
            self.push_bit((value >> bit_pos) & 1 == 1);
        }
    }

    pub fn push_zeros(&mut self, count: usize) {
        for _ in 0..count {
            self.push_bit(false);
        }
    }

    pub fn extend_from_bitvec(&mut self, other: &BitVec) {
        if self.bit_count % 8 == 0 {
            // byte aligned, copy whole bytes
            self.bits.truncate(self.bit_count / 8);
            self.bits.extend_from_slice(&other.bits);
            self.bit_count += other.bit_count;
        } else {
            for index in 0..other.bit_count {
                self.push_bit(other.bit_at(index));
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        (index < self.bit_count).then(|| self.bit_at(index))
    }

    fn bit_at(&self, index: usize) -> bool {
        (self.bits[index / 8] >> (7 - index % 8)) & 1 == 1
    }

    /// Read `width` bits starting at `start` as an unsigned integer.
    pub fn read_bits(&self, start: usize, width: usize) -> Option<u64> {
        if width > 64 || start.checked_add(width)? > self.bit_count {
            return None;
        }
        let mut value = 0u64;
        for index in start..start + width {
            value = (value << 1) | self.bit_at(index) as u64;
        }
        Some(value)
    }

    /// Copy out the bits in `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> BitVec {
        let end = end.min(self.bit_count);
        let mut out = BitVec::with_capacity(end.saturating_sub(start));
        for index in start..end {
            out.push_bit(self.bit_at(index));
        }
        out
    }

    pub fn to_bit_string(&self) -> String {
        (0..self.bit_count)
            .map(|index| if self.bit_at(index) { '1' } else { '0' })
            .collect()
    }

    pub fn reader(&self) -> BitReader<'_> {
        BitReader {
            bits: self,
            position: 0,
        }
    }
}

/// Forward-only cursor over a [`BitVec`].
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bits: &'a BitVec,
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bits.len() - self.position
    }

    pub fn read_bit(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.position)?;
        self.position += 1;
        Some(bit)
    }

    pub fn read_bits(&mut self, width: usize) -> Option<u64> {
        let value = self.bits.read_bits(self.position, width)?;
        self.position += width;
        Some(value)
    }

    /// Look at the next `width` bits without consuming them.
    pub fn peek_bits(&self, width: usize) -> Option<u64> {
        self.bits.read_bits(self.position, width)
    }

    pub fn skip(&mut self, count: usize) {
        self.position = (self.position + count).min(self.bits.len());
    }
}
