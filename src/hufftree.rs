use std::fmt;

use tracing::trace;

use crate::code::{Code, CodeTable, MAX_CODE_LENGTH};
use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyRecord, FrequencyTable};
use crate::sorted_queue::{SortedQueue, Weighted};

#[derive(Debug, Clone)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    pub fn from_text(text: &str) -> Result<Self> {
        let frequencies = FrequencyTable::from_text(text)?;
        HuffmanTree::from_frequencies(&frequencies)
    }

    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        HuffmanTree::from_records(frequencies.records())
    }

    /// Merge the two lightest entries until at most two remain, then hang
    /// those under a synthetic root: the heavier on the right, the other (if
    /// any) on the left.
    pub fn from_records(records: &[FrequencyRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(HuffmanError::DegenerateTree);
        }

        let leaves = records
            .iter()
            .map(|record| HuffNode::new(record.symbol, record.count))
            .collect();
        let mut queue = SortedQueue::from_descending(leaves);

        while queue.len() >= 3 {
            let (Some(lighter), Some(heavier)) = (queue.pop_lightest(), queue.pop_lightest()) else {
                return Err(HuffmanError::DegenerateTree);
            };
            let merged = HuffNode::merge(lighter, heavier);
            trace!(weight = merged.weight(), "merged pair");
            queue.insert(merged);
        }
        debug_assert!(queue.is_sorted());

        let weight = records.iter().map(|record| record.count).sum();
        let mut remaining = queue.into_vec().into_iter();
        let right = remaining.next().ok_or(HuffmanError::DegenerateTree)?;
        let left = remaining.next();

        Ok(HuffmanTree {
            root: HuffNode::Internal {
                weight,
                left: left.map(Box::new),
                right: Box::new(right),
            },
        })
    }

    /// Assign every leaf its path from the root, right subtree first.
    pub fn generate_table(&self) -> Result<CodeTable> {
        let mut table = CodeTable::new();
        self.root.generate_table(&mut table, Code::EMPTY)?;
        Ok(table)
    }

    pub fn weight(&self) -> usize {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: &HuffNode,
        depth: usize,
        label: &str,
    ) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match node {
            HuffNode::Leaf { symbol, weight } => {
                writeln!(f, "{indent}{label}-> Leaf: {symbol:?} (U+{:04X}) [weight: {weight}]", *symbol as u32)
            }
            HuffNode::Internal { weight, left, right } => {
                writeln!(f, "{indent}{label}-> Internal [weight: {weight}]")?;
                self.fmt_node(f, right, depth + 1, "R")?;
                if let Some(left) = left {
                    self.fmt_node(f, left, depth + 1, "L")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Huffman Tree Structure:")?;
        self.fmt_node(f, &self.root, 0, "root")
    }
}

#[derive(Debug, Clone)]
pub enum HuffNode {
    Leaf {
        weight: usize,
        symbol: char,
    },
    Internal {
        weight: usize,
        left: Option<Box<HuffNode>>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(symbol: char, weight: usize) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> usize {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn merge(lighter: Self, heavier: Self) -> Self {
        let weight = lighter.weight() + heavier.weight();
        HuffNode::Internal {
            weight,
            left: Some(Box::new(lighter)),
            right: Box::new(heavier),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => {
                right.leaf_count() + left.as_ref().map_or(0, |left| left.leaf_count())
            }
        }
    }

    pub fn generate_table(&self, code_table: &mut CodeTable, code: Code) -> Result<()> {
        match self {
            HuffNode::Leaf { symbol, .. } => {
                code_table.insert(*symbol, code);
                Ok(())
            }
            HuffNode::Internal { left, right, .. } => {
                if code.len() >= MAX_CODE_LENGTH {
                    return Err(HuffmanError::CodeLengthOverflow { length: code.len() + 1 });
                }
                right.generate_table(code_table, code.child(true))?;
                if let Some(left) = left {
                    left.generate_table(code_table, code.child(false))?;
                }
                Ok(())
            }
        }
    }
}

impl Weighted for HuffNode {
    fn weight(&self) -> usize {
        HuffNode::weight(self)
    }
}
