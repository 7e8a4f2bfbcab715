//! Error handling for the nipzip codec.
//!
//! Every failure the codec can detect is a variant of [`HuffmanError`]. None
//! of them are recoverable by retrying: the input or the container is simply
//! unusable for the requested operation.

use thiserror::Error;

/// Errors raised while building a code or reading/writing a container.
#[derive(Error, Debug)]
pub enum HuffmanError {
    /// There were no symbols to compress.
    #[error("input is empty, nothing to compress")]
    EmptyInput,

    /// The alphabet does not fit the 8-bit symbol count field.
    #[error("alphabet too large: {distinct} distinct symbols (maximum 255)")]
    AlphabetOverflow {
        /// Number of distinct symbols found in the input
        distinct: usize,
    },

    /// A code does not fit the 6-bit maximum code length field.
    #[error("code length {length} exceeds the 63 bit limit")]
    CodeLengthOverflow {
        /// Length of the offending code
        length: usize,
    },

    /// The tree builder was handed no frequency records.
    #[error("cannot build a tree without symbols")]
    DegenerateTree,

    /// The container ends before the header says it should.
    #[error("truncated header: needed {needed} bits, {available} available")]
    TruncatedHeader {
        /// Bits the header requires
        needed: usize,
        /// Bits actually present
        available: usize,
    },

    /// The payload region has no sentinel bit.
    #[error("truncated payload: no sentinel bit found")]
    TruncatedPayload,

    /// The trailer names a character width mode outside 0-3.
    #[error("unknown character mode {0}")]
    UnknownMode(u8),

    /// The tree region decoded to something the encoder never writes.
    #[error("malformed header: {message}")]
    MalformedHeader {
        /// What was wrong with the header
        message: String,
    },

    /// No lookup entry matched the remaining payload bits.
    #[error("no code matches the payload at bit offset {offset}")]
    UnmatchedCode {
        /// Offset into the payload codes, after the sentinel
        offset: usize,
    },

    /// A symbol being encoded has no code in the table.
    #[error("symbol {0:?} has no code in the table")]
    UnmatchedSymbol(char),

    /// A decoded code point is not usable as an output symbol.
    #[error("invalid symbol code point {0:#x}")]
    InvalidSymbol(u32),

    /// A textual bit string contained something other than `0` or `1`.
    #[error("invalid bit string: {found:?} at position {position}")]
    InvalidBitString {
        /// Character index of the offending character
        position: usize,
        /// The offending character
        found: char,
    },

    /// Text input was not valid UTF-8.
    #[error("input is not valid UTF-8 text")]
    InvalidText,

    /// I/O failure in the reader/writer helpers.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    /// Create a malformed header error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedHeader { message: message.into() }
    }

    /// Short label used as a log field
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyInput | Self::AlphabetOverflow { .. } | Self::InvalidText => "input",
            Self::CodeLengthOverflow { .. } | Self::DegenerateTree => "tree",
            Self::TruncatedHeader { .. }
            | Self::UnknownMode(_)
            | Self::MalformedHeader { .. }
            | Self::InvalidSymbol(_) => "header",
            Self::TruncatedPayload | Self::UnmatchedCode { .. } | Self::UnmatchedSymbol(_) => {
                "payload"
            }
            Self::InvalidBitString { .. } => "bits",
            Self::Io(_) => "io",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, HuffmanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HuffmanError::AlphabetOverflow { distinct: 256 };
        assert_eq!(
            err.to_string(),
            "alphabet too large: 256 distinct symbols (maximum 255)"
        );

        let err = HuffmanError::TruncatedHeader { needed: 24, available: 8 };
        assert!(err.to_string().contains("needed 24 bits"));
    }

    #[test]
    fn test_error_category() {
        assert_eq!(HuffmanError::EmptyInput.category(), "input");
        assert_eq!(HuffmanError::UnknownMode(7).category(), "header");
        assert_eq!(HuffmanError::UnmatchedCode { offset: 3 }.category(), "payload");

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(HuffmanError::from(io).category(), "io");
    }
}
