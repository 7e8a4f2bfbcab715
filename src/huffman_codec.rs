use std::io::{Read, Write};

use tracing::debug;

use crate::code::CodeTable;
use crate::compressed_data::CompressedData;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::header::{self, LookupTable};
use crate::hufftree::HuffmanTree;
use crate::metadata::CharMode;
use crate::payload;

/// Largest alphabet the 8-bit symbol count can describe.
pub const MAX_SYMBOLS: usize = u8::MAX as usize;

/// Everything compression derives from one input.
///
/// The tree, code table and mode are kept so callers can display them.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    frequencies: FrequencyTable,
    tree: HuffmanTree,
    code_table: CodeTable,
    mode: CharMode,
}

impl HuffmanCodec {
    pub fn new(text: &str) -> Result<Self> {
        Self::from_symbols(text.chars())
    }

    pub fn from_symbols<I>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = char> + Clone,
    {
        let frequencies = FrequencyTable::from_symbols(symbols.clone())?;
        if frequencies.len() > MAX_SYMBOLS {
            return Err(HuffmanError::AlphabetOverflow {
                distinct: frequencies.len(),
            });
        }

        let tree = HuffmanTree::from_frequencies(&frequencies)?;
        let code_table = tree.generate_table()?;
        let mode = CharMode::detect(symbols);
        debug!(
            symbols = frequencies.total(),
            distinct = frequencies.len(),
            max_code_length = code_table.max_code_length(),
            %mode,
            "built huffman code"
        );

        Ok(HuffmanCodec {
            frequencies,
            tree,
            code_table,
            mode,
        })
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.code_table
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn mode(&self) -> CharMode {
        self.mode
    }

    /// Encode `symbols`, which must only use symbols this codec was built from.
    pub fn encode_symbols<I>(&self, symbols: I) -> Result<CompressedData>
    where
        I: IntoIterator<Item = char>,
    {
        let (tree, trailer) = header::encode_tree(&self.code_table, self.mode)?;
        let payload = payload::encode_payload(symbols, &self.code_table)?;
        debug!(tree_bits = tree.len(), payload_bits = payload.len(), "encoded container");
        Ok(CompressedData {
            tree,
            payload,
            trailer,
        })
    }

    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        Ok(self.encode_symbols(text.chars())?.serialize())
    }

    /// Recover the symbol sequence and the lookup table it was decoded with.
    pub fn decode_symbols(bytes: &[u8]) -> Result<(Vec<char>, LookupTable)> {
        let compressed = CompressedData::deserialize(bytes)?;
        let lookup = header::decode_tree(&compressed.tree, &compressed.trailer)?;
        let symbols = payload::decode_payload(&compressed.payload, &lookup)?;
        debug!(symbols = symbols.len(), codes = lookup.len(), "decoded container");
        Ok((symbols, lookup))
    }

    pub fn decode(bytes: &[u8]) -> Result<String> {
        let (symbols, _) = Self::decode_symbols(bytes)?;
        Ok(symbols.into_iter().collect())
    }

    /// Compress everything `input` yields as UTF-8 text into `output`.
    pub fn encode_from_file<R: Read, W: Write>(mut input: R, mut output: W) -> Result<usize> {
        let mut raw = Vec::new();
        input.read_to_end(&mut raw)?;
        let text = String::from_utf8(raw).map_err(|_| HuffmanError::InvalidText)?;

        let bytes = compress(&text)?;
        output.write_all(&bytes)?;
        output.flush()?;
        Ok(bytes.len())
    }

    /// Decompress a whole container from `input` and write the text to `output`.
    pub fn decode_from_file<R: Read, W: Write>(mut input: R, mut output: W) -> Result<usize> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;

        let text = decompress(&bytes)?;
        output.write_all(text.as_bytes())?;
        output.flush()?;
        Ok(text.len())
    }
}

/// Compress `text` into a container.
pub fn compress(text: &str) -> Result<Vec<u8>> {
    HuffmanCodec::new(text)?.encode(text)
}

/// Decompress a container produced by [`compress`].
pub fn decompress(bytes: &[u8]) -> Result<String> {
    HuffmanCodec::decode(bytes)
}

/// Compress raw bytes, one symbol per byte.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let symbols = data.iter().map(|&byte| char::from(byte));
    let codec = HuffmanCodec::from_symbols(symbols.clone())?;
    Ok(codec.encode_symbols(symbols)?.serialize())
}

/// Decompress a container produced by [`compress_bytes`].
pub fn decompress_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let (symbols, _) = HuffmanCodec::decode_symbols(bytes)?;
    symbols
        .into_iter()
        .map(|symbol| u8::try_from(symbol).map_err(|_| HuffmanError::InvalidSymbol(symbol as u32)))
        .collect()
}
