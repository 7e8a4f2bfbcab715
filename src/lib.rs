//! # nipzip
//!
//! Lossless text compression with a Huffman prefix code and a compact,
//! self-describing container.
//!
//! ## Quick Start
//!
//! ```rust
//! use nipzip::{compress, decompress};
//!
//! let packed = compress("the quick brown fox jumped over the lazy dog")?;
//! let text = decompress(&packed)?;
//! assert_eq!(text, "the quick brown fox jumped over the lazy dog");
//! # Ok::<(), nipzip::HuffmanError>(())
//! ```
//!
//! ## Container layout
//!
//! ```text
//! [tree region][filler 0-7 bits][sentinel 1][codes][symbol_count:8 | max_code_length:6 | mode:2]
//! ```
//!
//! The trailer sits at the end so a reader can size the tree region before
//! touching it.

pub mod bit_vec;
pub mod code;
pub mod compressed_data;
pub mod error;
pub mod frequency;
pub mod header;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;
pub mod payload;

// Internal modules - not part of public API
mod sorted_queue;

// Re-export main types for convenience
pub use code::{Code, CodeTable};
pub use error::{HuffmanError, Result};
pub use huffman_codec::{compress, compress_bytes, decompress, decompress_bytes, HuffmanCodec};
pub use hufftree::HuffmanTree;
pub use metadata::{CharMode, Trailer};
