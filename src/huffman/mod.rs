// Huffman model: frequencies, tree, codes.
//
// - `freq`   : FrequencyTable: byte counts with first-occurrence order
// - `tree`   : HuffmanTree arena, TreeBuilder validation, postorder numbering
// - `build`  : Deterministic tree construction by minimal-pair merging
// - `codes`  : Code / CodeTable derivation from a tree
// - `improve`: Shape-preserving symbol reassignment

pub mod build;
pub mod codes;
pub mod freq;
pub mod improve;
pub mod tree;

pub use build::build_tree;
pub use codes::{Code, CodeTable, codes_for};
pub use freq::FrequencyTable;
pub use improve::improve_tree;
pub use tree::{HuffmanTree, Node, NodeId, TreeBuilder, TreeError};
