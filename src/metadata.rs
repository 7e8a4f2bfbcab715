//! Character width mode and the two-byte container trailer.

use std::fmt;

use crate::error::{HuffmanError, Result};

/// How many bytes each symbol's code point takes in the tree region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CharMode {
    /// Code points up to 127, one byte
    Ascii = 0,
    /// Code points up to 255, one byte
    Extended = 1,
    /// Code points up to 65535, two bytes
    Wide = 2,
    /// Code points up to 16777215, three bytes
    Full = 3,
}

impl CharMode {
    const ALL: [CharMode; 4] = [CharMode::Ascii, CharMode::Extended, CharMode::Wide, CharMode::Full];

    /// Smallest mode able to store every symbol.
    pub fn detect<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        symbols
            .into_iter()
            .map(CharMode::for_symbol)
            .max()
            .unwrap_or(CharMode::Ascii)
    }

    pub fn for_symbol(symbol: char) -> Self {
        let code_point = symbol as u32;
        Self::ALL
            .into_iter()
            .find(|mode| code_point <= mode.max_code_point())
            .unwrap_or(CharMode::Full)
    }

    pub fn from_bits(bits: u8) -> Result<Self> {
        Self::ALL
            .get(bits as usize)
            .copied()
            .ok_or(HuffmanError::UnknownMode(bits))
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn byte_width(self) -> usize {
        match self {
            CharMode::Ascii | CharMode::Extended => 1,
            CharMode::Wide => 2,
            CharMode::Full => 3,
        }
    }

    pub fn max_code_point(self) -> u32 {
        match self {
            CharMode::Ascii => 127,
            CharMode::Extended => 255,
            CharMode::Wide => 65_535,
            CharMode::Full => 16_777_215,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CharMode::Ascii => "ASCII",
            CharMode::Extended => "UTF-8",
            CharMode::Wide => "UTF-16",
            CharMode::Full => "UTF-32",
        }
    }
}

impl fmt::Display for CharMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Last two bytes of every container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    pub symbol_count: u8,
    /// Only the low six bits are stored.
    pub max_code_length: u8,
    pub mode: CharMode,
}

impl Trailer {
    pub const BITS: usize = 16;

    /// Width of the padded code field of every tree entry.
    pub fn code_slot_bits(&self) -> usize {
        8 * (self.max_code_length as usize / 8 + 1)
    }

    /// Width of one tree entry: symbol bytes, skip count, padded code.
    pub fn entry_bits(&self) -> usize {
        self.mode.byte_width() * 8 + 8 + self.code_slot_bits()
    }

    pub fn tree_bits(&self) -> usize {
        self.symbol_count as usize * self.entry_bits()
    }

    /// Whether some Huffman tree has `symbol_count` leaves and a longest code
    /// of exactly `max_code_length` bits.
    ///
    /// A lone symbol always gets the one bit code `1`. Otherwise `n` leaves
    /// need at least `ceil(log2 n)` bits and reach at most `n - 1`.
    pub fn describes_tree(&self) -> bool {
        let count = self.symbol_count as usize;
        let longest = self.max_code_length as usize;
        match count {
            0 => false,
            1 => longest == 1,
            // count < 256, so eight bits of depth always suffice
            _ => longest < count && count <= 1 << longest.min(8),
        }
    }

    pub fn to_bytes(&self) -> [u8; 2] {
        debug_assert!(self.max_code_length < 64);
        [
            self.symbol_count,
            (self.max_code_length << 2) | self.mode.bits(),
        ]
    }

    pub fn from_bytes(bytes: [u8; 2]) -> Result<Self> {
        Ok(Trailer {
            symbol_count: bytes[0],
            max_code_length: bytes[1] >> 2,
            mode: CharMode::from_bits(bytes[1] & 0b11)?,
        })
    }
}
