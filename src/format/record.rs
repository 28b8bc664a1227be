// Fixed-width node records for serialized Huffman trees.
//
// Every internal node becomes one 4-byte record, emitted in postorder:
//
//   [left_kind, left_value, right_kind, right_value]
//
// kind 0 = leaf (value is the symbol), kind 1 = internal (value is the
// child's postorder number). Leaves never get a record of their own.
//
// Two ways to turn records back into a tree:
//
//   General:   internal values are absolute record indices; any record may
//              reference any other, forward references included.
//   Postorder: internal values are ignored. The right child is the subtree
//              ending just before the record; the left child is the
//              subtree ending just before the right child's first record
//              (or just before the record itself when the right child is
//              a leaf).
//
// Both return a validated HuffmanTree. Every record must belong to the
// root's subtree and every internal value must name an existing record,
// whichever mode is used.

use thiserror::Error;

use crate::huffman::tree::{HuffmanTree, Node, NodeId, TreeBuilder, TreeError};

/// Bytes per serialized record.
pub const RECORD_LEN: usize = 4;

pub const KIND_LEAF: u8 = 0;
pub const KIND_INTERNAL: u8 = 1;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record {index}: invalid child kind {kind:#04x}")]
    InvalidKind { index: usize, kind: u8 },
    #[error("record section length {0} is not a multiple of 4")]
    BadLength(usize),
    #[error("root index {root} out of range for {count} records")]
    RootOutOfRange { root: usize, count: usize },
    #[error("record {record} references record {reference}, but only {count} exist")]
    ReferenceOutOfRange {
        record: usize,
        reference: usize,
        count: usize,
    },
    #[error("record {0} is referenced more than once")]
    RecordReused(usize),
    #[error("record {0} expects a preceding subtree that does not exist")]
    MissingSubtree(usize),
    #[error("record {0} is not part of the tree")]
    UnreachableRecord(usize),
    #[error("rebuilt tree is invalid: {0}")]
    Tree(#[from] TreeError),
}

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// One child slot of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRef {
    Leaf(u8),
    Internal(u8),
}

impl ChildRef {
    #[inline]
    pub fn kind(self) -> u8 {
        match self {
            ChildRef::Leaf(_) => KIND_LEAF,
            ChildRef::Internal(_) => KIND_INTERNAL,
        }
    }

    #[inline]
    pub fn value(self) -> u8 {
        match self {
            ChildRef::Leaf(v) | ChildRef::Internal(v) => v,
        }
    }

    #[inline]
    pub fn is_internal(self) -> bool {
        matches!(self, ChildRef::Internal(_))
    }

    fn decode(index: usize, kind: u8, value: u8) -> Result<Self, RecordError> {
        match kind {
            KIND_LEAF => Ok(ChildRef::Leaf(value)),
            KIND_INTERNAL => Ok(ChildRef::Internal(value)),
            _ => Err(RecordError::InvalidKind { index, kind }),
        }
    }
}

/// Serialized form of one internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRecord {
    pub left: ChildRef,
    pub right: ChildRef,
}

impl NodeRecord {
    pub fn new(left: ChildRef, right: ChildRef) -> Self {
        Self { left, right }
    }

    pub fn to_bytes(self) -> [u8; RECORD_LEN] {
        [
            self.left.kind(),
            self.left.value(),
            self.right.kind(),
            self.right.value(),
        ]
    }

    /// Decode the record at position `index` (used for error reporting).
    pub fn from_bytes(index: usize, bytes: [u8; RECORD_LEN]) -> Result<Self, RecordError> {
        Ok(Self {
            left: ChildRef::decode(index, bytes[0], bytes[1])?,
            right: ChildRef::decode(index, bytes[2], bytes[3])?,
        })
    }
}

/// How internal-child references are resolved when rebuilding a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Addressing {
    /// Reference values are absolute record indices.
    #[default]
    General,
    /// References are implied by postorder adjacency.
    Postorder,
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Records for every internal node of a numbered tree, in postorder.
pub fn tree_to_records(tree: &HuffmanTree) -> Result<Vec<NodeRecord>, TreeError> {
    let child_ref = |id: NodeId| -> Result<ChildRef, TreeError> {
        match *tree.node(id) {
            Node::Leaf { symbol } => Ok(ChildRef::Leaf(symbol)),
            Node::Internal { number, .. } => number
                .map(ChildRef::Internal)
                .ok_or(TreeError::Unnumbered(id.index())),
        }
    };

    tree.postorder_internal()
        .into_iter()
        .map(|id| {
            let (left, right) = tree
                .node(id)
                .children()
                .ok_or(TreeError::Unnumbered(id.index()))?;
            Ok(NodeRecord::new(child_ref(left)?, child_ref(right)?))
        })
        .collect()
}

/// Append the byte form of `records` to `out`.
pub fn write_records(records: &[NodeRecord], out: &mut Vec<u8>) {
    out.reserve(records.len() * RECORD_LEN);
    for record in records {
        out.extend_from_slice(&record.to_bytes());
    }
}

pub fn records_to_bytes(records: &[NodeRecord]) -> Vec<u8> {
    let mut out = Vec::with_capacity(records.len() * RECORD_LEN);
    write_records(records, &mut out);
    out
}

pub fn records_from_bytes(bytes: &[u8]) -> Result<Vec<NodeRecord>, RecordError> {
    if bytes.len() % RECORD_LEN != 0 {
        return Err(RecordError::BadLength(bytes.len()));
    }
    bytes
        .chunks_exact(RECORD_LEN)
        .enumerate()
        .map(|(i, chunk)| NodeRecord::from_bytes(i, [chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

// ---------------------------------------------------------------------------
// Deserialization
// ---------------------------------------------------------------------------

/// Rebuild the tree rooted at `records[root_index]`.
pub fn rebuild_tree(
    records: &[NodeRecord],
    root_index: usize,
    addressing: Addressing,
) -> Result<HuffmanTree, RecordError> {
    if root_index >= records.len() {
        return Err(RecordError::RootOutOfRange {
            root: root_index,
            count: records.len(),
        });
    }
    check_references(records)?;
    match addressing {
        Addressing::General => rebuild_general(records, root_index),
        Addressing::Postorder => rebuild_postorder(records, root_index),
    }
}

fn check_references(records: &[NodeRecord]) -> Result<(), RecordError> {
    let count = records.len();
    for (index, record) in records.iter().enumerate() {
        for child in [record.left, record.right] {
            if let ChildRef::Internal(reference) = child
                && reference as usize >= count
            {
                return Err(RecordError::ReferenceOutOfRange {
                    record: index,
                    reference: reference as usize,
                    count,
                });
            }
        }
    }
    Ok(())
}

fn rebuild_general(records: &[NodeRecord], root_index: usize) -> Result<HuffmanTree, RecordError> {
    let count = records.len();

    // Collect the records reachable from the root in postorder, so children
    // are always built before their parents.
    let mut order = Vec::with_capacity(count);
    let mut visited = vec![false; count];
    let mut stack = vec![(root_index, false)];
    while let Some((index, expanded)) = stack.pop() {
        if expanded {
            order.push(index);
            continue;
        }
        if visited[index] {
            return Err(RecordError::RecordReused(index));
        }
        visited[index] = true;
        stack.push((index, true));

        let record = records[index];
        for child in [record.right, record.left] {
            if let ChildRef::Internal(reference) = child {
                stack.push((reference as usize, false));
            }
        }
    }
    if let Some(unused) = visited.iter().position(|&seen| !seen) {
        return Err(RecordError::UnreachableRecord(unused));
    }

    let mut builder = TreeBuilder::with_capacity(order.len() * 3);
    let mut built: Vec<Option<NodeId>> = vec![None; count];
    for &index in &order {
        let record = records[index];
        let mut resolve = |child: ChildRef| match child {
            ChildRef::Leaf(symbol) => Ok(builder.leaf(symbol)),
            ChildRef::Internal(reference) => built[reference as usize]
                .take()
                .ok_or(RecordError::RecordReused(reference as usize)),
        };
        let left = resolve(record.left)?;
        let right = resolve(record.right)?;
        built[index] = Some(builder.internal(left, right));
    }

    let root = built[root_index].ok_or(RecordError::MissingSubtree(root_index))?;
    Ok(builder.finish(root)?)
}

fn rebuild_postorder(
    records: &[NodeRecord],
    root_index: usize,
) -> Result<HuffmanTree, RecordError> {
    if root_index + 1 < records.len() {
        return Err(RecordError::UnreachableRecord(root_index + 1));
    }

    let mut builder = TreeBuilder::with_capacity(records.len() * 3);
    let mut subtrees: Vec<NodeId> = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let right = match record.right {
            ChildRef::Leaf(symbol) => builder.leaf(symbol),
            ChildRef::Internal(_) => subtrees.pop().ok_or(RecordError::MissingSubtree(index))?,
        };
        let left = match record.left {
            ChildRef::Leaf(symbol) => builder.leaf(symbol),
            ChildRef::Internal(_) => subtrees.pop().ok_or(RecordError::MissingSubtree(index))?,
        };
        subtrees.push(builder.internal(left, right));
    }

    let root = subtrees.pop().ok_or(RecordError::MissingSubtree(root_index))?;
    // Anything still stacked is a finished subtree the root never claimed;
    // the lowest one starts at record 0.
    if !subtrees.is_empty() {
        return Err(RecordError::UnreachableRecord(0));
    }
    Ok(builder.finish(root)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
