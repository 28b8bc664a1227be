// Huffman tree construction by repeated minimal-pair merging.
//
// The working list is kept sorted by weight. Ties are resolved by position:
// the initial leaves are stably sorted (first-occurrence order breaks ties),
// and a merged subtree is inserted after every entry whose weight is <= its
// own. Popping from the front therefore always takes the earliest-inserted
// of the lightest entries, which makes the resulting tree fully
// deterministic for a given FrequencyTable.

use std::collections::VecDeque;

use log::trace;

use super::freq::FrequencyTable;
use super::tree::{HuffmanTree, NodeId, TreeBuilder, TreeError};

/// Symbol paired with a lone symbol so the tree still has two leaves.
#[inline]
pub fn dummy_sibling(symbol: u8) -> u8 {
    // 255 is odd, so the complement never equals the symbol itself.
    !symbol
}

/// Build the Huffman tree for `freq`.
///
/// A table with one symbol `s` yields a root whose left leaf is `s` and
/// whose right leaf is `dummy_sibling(s)`.
pub fn build_tree(freq: &FrequencyTable) -> Result<HuffmanTree, TreeError> {
    if freq.is_empty() {
        return Err(TreeError::EmptyFrequencyTable);
    }

    let mut builder = TreeBuilder::with_capacity(freq.len() * 2);

    if freq.len() == 1 {
        if let Some((symbol, _)) = freq.iter().next() {
            let only = builder.leaf(symbol);
            let dummy = builder.leaf(dummy_sibling(symbol));
            let root = builder.internal(only, dummy);
            return builder.finish(root);
        }
    }

    let mut leaves: Vec<(NodeId, u64)> = freq
        .iter()
        .map(|(symbol, count)| (builder.leaf(symbol), count))
        .collect();

    // Stable: equal weights keep first-occurrence order.
    leaves.sort_by_key(|&(_, weight)| weight);
    let mut work: VecDeque<(NodeId, u64)> = leaves.into();

    while work.len() > 1 {
        let (Some((first, w1)), Some((second, w2))) = (work.pop_front(), work.pop_front()) else {
            break;
        };
        let merged = builder.internal(first, second);
        let weight = w1 + w2;
        let at = work.partition_point(|&(_, w)| w <= weight);
        trace!(
            "merge {:?}({w1}) + {:?}({w2}) -> {:?}({weight}) at {at}",
            first, second, merged
        );
        work.insert(at, (merged, weight));
    }

    match work.pop_front() {
        Some((root, _)) => builder.finish(root),
        None => Err(TreeError::EmptyFrequencyTable),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
