// Prefix codes derived from a Huffman tree.
//
// A Code is the root-to-leaf path of a symbol: false/0 = left, true/1 =
// right. Codes are derived with an explicit path stack, so only the path of
// the node currently being visited is held at any time.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::build::build_tree;
use super::freq::{ALPHABET_SIZE, FrequencyTable};
use super::tree::{HuffmanTree, Node, NodeId, TreeError};

// ---------------------------------------------------------------------------
// Code
// ---------------------------------------------------------------------------

/// A root-to-leaf bit path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Whether `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Error parsing a textual code such as `"0110"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCodeError {
    #[error("empty code")]
    Empty,
    #[error("invalid bit character {0:?}")]
    InvalidBit(char),
}

impl FromStr for Code {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseCodeError::Empty);
        }
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(ParseCodeError::InvalidBit(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bits })
    }
}

// ---------------------------------------------------------------------------
// CodeTable
// ---------------------------------------------------------------------------

/// Symbol to code mapping, indexed directly by byte value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            codes: vec![None; ALPHABET_SIZE],
        }
    }

    /// Derive one code per leaf of `tree`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = Self::new();
        let mut path: Vec<bool> = Vec::new();
        // (node, depth of its parent, step taken from the parent)
        let mut stack: Vec<(NodeId, usize, Option<bool>)> = vec![(tree.root(), 0, None)];

        while let Some((id, parent_depth, step)) = stack.pop() {
            path.truncate(parent_depth);
            if let Some(bit) = step {
                path.push(bit);
            }
            match *tree.node(id) {
                Node::Leaf { symbol } => {
                    table.insert(symbol, Code::from_bits(path.clone()));
                }
                Node::Internal { left, right, .. } => {
                    let depth = path.len();
                    stack.push((right, depth, Some(true)));
                    stack.push((left, depth, Some(false)));
                }
            }
        }
        table
    }

    /// Set the code for `symbol`, returning the previous one.
    pub fn insert(&mut self, symbol: u8, code: Code) -> Option<Code> {
        self.codes[symbol as usize].replace(code)
    }

    #[inline]
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.as_ref().map(|c| (s as u8, c)))
    }

    /// Whether no code is a prefix of another symbol's code.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.iter().map(|(_, c)| c).collect();
        // After sorting, a prefix sorts immediately before some code it
        // prefixes, so checking neighbours is enough.
        codes.sort_by(|a, b| a.bits.cmp(&b.bits));
        codes.windows(2).all(|w| !w[0].is_prefix_of(w[1]))
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(u8, Code)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (u8, Code)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (symbol, code) in iter {
            table.insert(symbol, code);
        }
        table
    }
}

/// Derive the code table for `freq` without keeping the tree.
pub fn codes_for(freq: &FrequencyTable) -> Result<CodeTable, TreeError> {
    let tree = build_tree(freq)?;
    Ok(CodeTable::from_tree(&tree))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
