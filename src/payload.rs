//! Payload encoding: filler, sentinel, then the concatenated codes.

use crate::bit_vec::BitVec;
use crate::code::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::header::LookupTable;

/// Zero bits needed in front of the sentinel to byte-align the payload.
pub fn filler_bits(code_bits: usize) -> usize {
    (8 - (1 + code_bits) % 8) % 8
}

pub fn encode_payload<I>(symbols: I, table: &CodeTable) -> Result<BitVec>
where
    I: IntoIterator<Item = char>,
{
    let codes = symbols
        .into_iter()
        .map(|symbol| table.get(symbol).copied().ok_or(HuffmanError::UnmatchedSymbol(symbol)))
        .collect::<Result<Vec<_>>>()?;
    let code_bits: usize = codes.iter().map(|code| code.len()).sum();

    let filler = filler_bits(code_bits);
    let mut payload = BitVec::with_capacity(filler + 1 + code_bits);
    payload.push_zeros(filler);
    payload.push_bit(true);
    for code in &codes {
        code.write_to(&mut payload);
    }

    Ok(payload)
}

/// Strip filler and sentinel, then greedily match codes longest first.
pub fn decode_payload(payload: &BitVec, lookup: &LookupTable) -> Result<Vec<char>> {
    let mut reader = payload.reader();
    loop {
        match reader.read_bit() {
            Some(true) => break,
            Some(false) => continue,
            None => return Err(HuffmanError::TruncatedPayload),
        }
    }

    let start = reader.position();
    let mut symbols = Vec::new();
    while reader.remaining() > 0 {
        let matched = lookup
            .iter()
            .find(|(code, _)| reader.peek_bits(code.len()) == Some(code.bits()));
        match matched {
            Some((code, symbol)) => {
                symbols.push(*symbol);
                reader.skip(code.len());
            }
            None => {
                return Err(HuffmanError::UnmatchedCode {
                    offset: reader.position() - start,
                })
            }
        }
    }

    Ok(symbols)
}
