//! Symbol frequency analysis.

use std::collections::HashMap;

use crate::error::{HuffmanError, Result};

/// A symbol and the number of times it occurs in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyRecord {
    pub symbol: char,
    pub count: usize,
}

/// Occurrence counts ordered by descending count.
///
/// Ties keep the order in which symbols first appeared in the input, which is
/// exactly what repeatedly extracting the earliest maximum would produce.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    records: Vec<FrequencyRecord>,
    total: usize,
}

impl FrequencyTable {
    pub fn from_symbols<I>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = char>,
    {
        let mut index: HashMap<char, usize> = HashMap::new();
        let mut records: Vec<FrequencyRecord> = Vec::new();
        let mut total = 0;

        for symbol in symbols {
            let slot = *index.entry(symbol).or_insert_with(|| {
                records.push(FrequencyRecord { symbol, count: 0 });
                records.len() - 1
            });
            records[slot].count += 1;
            total += 1;
        }

        if records.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }

        // stable: equal counts stay in first-appearance order
        records.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(FrequencyTable { records, total })
    }

    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_symbols(text.chars())
    }

    pub fn records(&self) -> &[FrequencyRecord] {
        &self.records
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of symbols in the input.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count_of(&self, symbol: char) -> Option<usize> {
        self.records
            .iter()
            .find(|record| record.symbol == symbol)
            .map(|record| record.count)
    }
}
