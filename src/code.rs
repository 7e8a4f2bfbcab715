//! Prefix codes and the symbol to code mapping.

use std::collections::HashMap;
use std::fmt;

use crate::bit_vec::BitVec;

/// Longest code the trailer's 6-bit field can describe.
pub const MAX_CODE_LENGTH: usize = 63;

/// A prefix code of up to [`MAX_CODE_LENGTH`] bits, stored MSB-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    pub const EMPTY: Code = Code { bits: 0, len: 0 };

    /// Build a code from the low `len` bits of `bits`.
    pub fn new(bits: u64, len: usize) -> Self {
        debug_assert!(len <= MAX_CODE_LENGTH);
        debug_assert!(bits >> len == 0);
        Code { bits, len: len as u8 }
    }

    /// The code one step further down the tree.
    pub fn child(self, right: bool) -> Self {
        Code {
            bits: (self.bits << 1) | right as u64,
            len: self.len + 1,
        }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }

    pub fn write_to(&self, out: &mut BitVec) {
        out.push_bits(self.bits, self.len());
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for shift in (0..self.len()).rev() {
            let bit = if (self.bits >> shift) & 1 == 1 { '1' } else { '0' };
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

/// Symbol to code mapping in tree walk order.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    entries: Vec<(char, Code)>,
    index: HashMap<char, usize>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, symbol: char, code: Code) {
        match self.index.get(&symbol) {
            Some(&slot) => self.entries[slot].1 = code,
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push((symbol, code));
            }
        }
    }

    pub fn get(&self, symbol: char) -> Option<&Code> {
        self.index.get(&symbol).map(|&slot| &self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(char, Code)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_code_length(&self) -> usize {
        self.entries.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    }

    /// True when no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        self.entries.iter().enumerate().all(|(i, (_, a))| {
            self.entries
                .iter()
                .enumerate()
                .all(|(j, (_, b))| i == j || !a.is_prefix_of(b))
        })
    }
}
