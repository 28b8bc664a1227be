// Shape-preserving symbol reassignment.
//
// Keeps the tree's topology fixed and only moves symbols between leaves so
// that the most frequent symbols sit on the shallowest leaves.

use log::debug;

use super::freq::FrequencyTable;
use super::tree::HuffmanTree;

/// Reassign leaf symbols of `tree` to minimize its weighted code length
/// under `freq`.
///
/// Leaves are ranked by depth, ties in left-to-right order; symbols are
/// ranked by descending frequency, ties in their current left-to-right
/// order. The i-th symbol goes to the i-th leaf. Symbols missing from
/// `freq` count as zero. Node numbers and depths are unchanged.
pub fn improve_tree(tree: &mut HuffmanTree, freq: &FrequencyTable) {
    let mut leaves = tree.leaves();

    let mut symbols: Vec<u8> = leaves
        .iter()
        .filter_map(|&(id, _)| tree.node(id).symbol())
        .collect();
    symbols.sort_by(|a, b| freq.get(*b).cmp(&freq.get(*a)));

    leaves.sort_by_key(|&(_, depth)| depth);

    let before = tree.avg_length(freq);
    for (&(id, _), &symbol) in leaves.iter().zip(&symbols) {
        tree.set_leaf_symbol(id, symbol);
    }
    debug!(
        "improve_tree: {} leaves, avg length {before:.4} -> {:.4}",
        leaves.len(),
        tree.avg_length(freq)
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::tree::{NodeId, TreeBuilder};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn pair(b: &mut TreeBuilder, l: u8, r: u8) -> NodeId {
        let l = b.leaf(l);
        let r = b.leaf(r);
        b.internal(l, r)
    }

    #[test]
    fn improves_five_leaf_tree() {
        // ((99, 100), (101, (97, 98)))
        let mut b = TreeBuilder::new();
        let left = pair(&mut b, 99, 100);
        let deep = pair(&mut b, 97, 98);
        let e = b.leaf(101);
        let right = b.internal(e, deep);
        let root = b.internal(left, right);
        let mut tree = b.finish(root).unwrap();

        let freq = FrequencyTable::from_pairs([(97, 26), (98, 23), (99, 20), (100, 16), (101, 15)]);
        assert!(approx(tree.avg_length(&freq), 2.49));
        improve_tree(&mut tree, &freq);
        assert!(approx(tree.avg_length(&freq), 2.31));
        assert_eq!(
            tree.leaf_depths(),
            vec![(97, 2), (98, 2), (99, 2), (100, 3), (101, 3)]
        );
    }

    #[test]
    fn deep_leftmost_leaf_receives_rare_symbol() {
        // (((a, b), c), d): the leftmost leaves are the deepest.
        let mut b = TreeBuilder::new();
        let ab = pair(&mut b, b'a', b'b');
        let c = b.leaf(b'c');
        let abc = b.internal(ab, c);
        let d = b.leaf(b'd');
        let root = b.internal(abc, d);
        let mut tree = b.finish(root).unwrap();

        let freq = FrequencyTable::from_pairs([(b'a', 40), (b'b', 30), (b'c', 20), (b'd', 10)]);
        let before = tree.avg_length(&freq);
        improve_tree(&mut tree, &freq);
        assert!(tree.avg_length(&freq) <= before);
        assert_eq!(
            tree.leaf_depths(),
            vec![(b'c', 3), (b'd', 3), (b'b', 2), (b'a', 1)]
        );
    }

    #[test]
    fn shape_and_numbers_are_preserved() {
        let mut b = TreeBuilder::new();
        let left = pair(&mut b, 1, 2);
        let right = pair(&mut b, 3, 4);
        let root = b.internal(left, right);
        let mut tree = b.finish(root).unwrap();
        tree.number_nodes();
        let numbers: Vec<_> = tree.nodes().iter().map(|n| n.number()).collect();
        let depths: Vec<_> = tree.leaf_depths().iter().map(|&(_, d)| d).collect();

        let freq = FrequencyTable::from_pairs([(4, 9), (3, 5), (2, 2), (1, 1)]);
        improve_tree(&mut tree, &freq);

        assert!(tree.is_numbered());
        assert_eq!(
            tree.nodes().iter().map(|n| n.number()).collect::<Vec<_>>(),
            numbers
        );
        assert_eq!(
            tree.leaf_depths().iter().map(|&(_, d)| d).collect::<Vec<_>>(),
            depths
        );
        // All depths equal: symbols end up in descending-frequency order.
        assert_eq!(
            tree.leaf_depths().iter().map(|&(s, _)| s).collect::<Vec<_>>(),
            vec![4, 3, 2, 1]
        );
    }
}
