// Arena-backed Huffman tree.
//
// Nodes live in a flat Vec and refer to their children by NodeId handles.
// A HuffmanTree can only be obtained through TreeBuilder::finish, which
// checks the structural invariants once:
//   - every handle points into the arena
//   - every node except the root has exactly one parent
//   - every node is reachable from the root (no orphans, no cycles)
//   - the root is an internal node
//   - no symbol appears on two leaves
//
// Internal nodes carry an optional postorder number used by the record
// serializer; leaves are never numbered.

use thiserror::Error;

use super::freq::{ALPHABET_SIZE, FrequencyTable};

// ---------------------------------------------------------------------------
// Handles and nodes
// ---------------------------------------------------------------------------

/// Index of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A tree node: a leaf holding one symbol, or an internal node with exactly
/// two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
    },
    Internal {
        left: NodeId,
        right: NodeId,
        /// Postorder number, assigned by `HuffmanTree::number_nodes`.
        number: Option<u8>,
    },
}

impl Node {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    #[inline]
    pub fn symbol(&self) -> Option<u8> {
        match *self {
            Node::Leaf { symbol } => Some(symbol),
            Node::Internal { .. } => None,
        }
    }

    #[inline]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match *self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some((left, right)),
        }
    }

    #[inline]
    pub fn number(&self) -> Option<u8> {
        match *self {
            Node::Leaf { .. } => None,
            Node::Internal { number, .. } => number,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Structural problems with a tree, or with the input used to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("empty frequency table: cannot build a tree")]
    EmptyFrequencyTable,
    #[error("node {node} refers to missing node {child}")]
    DanglingNode { node: usize, child: usize },
    #[error("root handle {0} is outside the arena")]
    DanglingRoot(usize),
    #[error("node {0} has more than one parent")]
    MultipleParents(usize),
    #[error("node {0} is not reachable from the root")]
    Unreachable(usize),
    #[error("root node {0} is the child of another node")]
    Cycle(usize),
    #[error("symbol {0} appears on more than one leaf")]
    DuplicateSymbol(u8),
    #[error("root is a leaf; a tree needs at least two leaves")]
    LeafRoot,
    #[error("internal node {0} has no postorder number")]
    Unnumbered(usize),
}

// ---------------------------------------------------------------------------
// TreeBuilder
// ---------------------------------------------------------------------------

/// Incrementally allocates nodes, then validates them into a `HuffmanTree`.
///
/// ```
/// use oxihuff::huffman::tree::TreeBuilder;
///
/// let mut b = TreeBuilder::new();
/// let left = b.leaf(3);
/// let right = b.leaf(2);
/// let root = b.internal(left, right);
/// let tree = b.finish(root).unwrap();
/// assert_eq!(tree.leaf_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Allocate a leaf.
    pub fn leaf(&mut self, symbol: u8) -> NodeId {
        self.push(Node::Leaf { symbol })
    }

    /// Allocate an unnumbered internal node.
    pub fn internal(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.push(Node::Internal {
            left,
            right,
            number: None,
        })
    }

    /// Allocate an arbitrary node.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Validate the arena and produce a tree rooted at `root`.
    pub fn finish(self, root: NodeId) -> Result<HuffmanTree, TreeError> {
        let nodes = self.nodes;
        let len = nodes.len();
        if root.0 >= len {
            return Err(TreeError::DanglingRoot(root.0));
        }

        let mut has_parent = vec![false; len];
        for (i, node) in nodes.iter().enumerate() {
            if let Some((left, right)) = node.children() {
                for child in [left, right] {
                    if child.0 >= len {
                        return Err(TreeError::DanglingNode {
                            node: i,
                            child: child.0,
                        });
                    }
                    if has_parent[child.0] {
                        return Err(TreeError::MultipleParents(child.0));
                    }
                    has_parent[child.0] = true;
                }
            }
        }
        if has_parent[root.0] {
            return Err(TreeError::Cycle(root.0));
        }
        if nodes[root.0].is_leaf() {
            return Err(TreeError::LeafRoot);
        }

        // With one parent per node and a parentless root, everything reached
        // from the root forms a tree, so this walk terminates.
        let mut reached = vec![false; len];
        let mut seen_symbols = [false; ALPHABET_SIZE];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            reached[id.0] = true;
            match nodes[id.0] {
                Node::Leaf { symbol } => {
                    if seen_symbols[symbol as usize] {
                        return Err(TreeError::DuplicateSymbol(symbol));
                    }
                    seen_symbols[symbol as usize] = true;
                }
                Node::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        if let Some(orphan) = reached.iter().position(|&r| !r) {
            return Err(TreeError::Unreachable(orphan));
        }

        Ok(HuffmanTree { nodes, root })
    }
}

// ---------------------------------------------------------------------------
// HuffmanTree
// ---------------------------------------------------------------------------

/// A validated full binary tree over byte symbols.
///
/// Equality compares shape and leaf symbols only; arena layout and node
/// numbers are ignored.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node behind `id`, or `None` if `id` does not belong to this tree.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Handles produced while walking this tree are always in bounds.
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// All arena nodes, in allocation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn internal_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_leaf()).count()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Internal nodes in postorder: left subtree, right subtree, node.
    pub fn postorder_internal(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len() / 2);
        let mut stack = vec![(self.root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if let Node::Internal { left, right, .. } = self.nodes[id.0] {
                if expanded {
                    out.push(id);
                } else {
                    stack.push((id, true));
                    stack.push((right, false));
                    stack.push((left, false));
                }
            }
        }
        out
    }

    /// Assign postorder numbers `0..k` to the `k` internal nodes.
    ///
    /// Returns `k`. Renumbering an already numbered tree gives the same
    /// numbers.
    pub fn number_nodes(&mut self) -> usize {
        let order = self.postorder_internal();
        for (n, id) in order.iter().enumerate() {
            if let Node::Internal { number, .. } = &mut self.nodes[id.0] {
                // At most 256 distinct leaves, so at most 255 internal nodes.
                *number = Some(n as u8);
            }
        }
        order.len()
    }

    /// Whether every internal node carries a number.
    pub fn is_numbered(&self) -> bool {
        self.nodes
            .iter()
            .all(|n| n.is_leaf() || n.number().is_some())
    }

    /// Leaves in left-to-right order, paired with their depth.
    pub fn leaves(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len() / 2 + 1);
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id.0] {
                Node::Leaf { .. } => out.push((id, depth)),
                Node::Internal { left, right, .. } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }
        out
    }

    /// `(symbol, depth)` for every leaf, left to right.
    pub fn leaf_depths(&self) -> Vec<(u8, usize)> {
        self.leaves()
            .into_iter()
            .filter_map(|(id, depth)| self.nodes[id.0].symbol().map(|s| (s, depth)))
            .collect()
    }

    /// Average bits per symbol when coding text with frequencies `freq`.
    ///
    /// Symbols on leaves but absent from `freq` contribute nothing. Returns
    /// 0.0 for a table with no occurrences.
    pub fn avg_length(&self, freq: &FrequencyTable) -> f64 {
        let total = freq.total();
        if total == 0 {
            return 0.0;
        }
        let weighted: u64 = self
            .leaf_depths()
            .into_iter()
            .map(|(symbol, depth)| freq.get(symbol) * depth as u64)
            .sum();
        weighted as f64 / total as f64
    }

    /// Overwrite the symbol of a leaf. Shape and numbering are untouched.
    pub(crate) fn set_leaf_symbol(&mut self, id: NodeId, new_symbol: u8) {
        if let Node::Leaf { symbol } = &mut self.nodes[id.0] {
            *symbol = new_symbol;
        }
    }
}

impl PartialEq for HuffmanTree {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self.root, other.root)];
        while let Some((a, b)) = stack.pop() {
            match (self.nodes[a.0], other.nodes[b.0]) {
                (Node::Leaf { symbol: x }, Node::Leaf { symbol: y }) => {
                    if x != y {
                        return false;
                    }
                }
                (
                    Node::Internal {
                        left: al,
                        right: ar,
                        ..
                    },
                    Node::Internal {
                        left: bl,
                        right: br,
                        ..
                    },
                ) => {
                    stack.push((ar, br));
                    stack.push((al, bl));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for HuffmanTree {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
