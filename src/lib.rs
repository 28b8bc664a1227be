//! Oxihuff: byte-oriented Huffman compression in Rust.
//!
//! The crate provides:
//! - Frequency counting, tree construction and code derivation (`huffman`)
//! - The artifact wire format: node records, header and bit packing (`format`)
//! - Whole-block compression APIs (`compress`)
//!
//! # Quick Start
//!
//! ```
//! let data = b"helloworld";
//! let artifact = oxihuff::compress(data).unwrap();
//! let restored = oxihuff::decompress(&artifact).unwrap();
//! assert_eq!(restored, data);
//! ```
//!
//! Codes for a frequency table can be derived without compressing anything:
//!
//! ```
//! use oxihuff::{FrequencyTable, codes_for};
//!
//! let codes = codes_for(&FrequencyTable::from_bytes(b"helloworld")).unwrap();
//! assert_eq!(codes.get(b'l').unwrap().to_string(), "10");
//! ```

pub mod compress;
pub mod format;
pub mod huffman;

pub use compress::{
    CompressOptions, DecodeError, DecompressOptions, EncodeError, compress, compress_to,
    compress_with_options, decompress, decompress_from, decompress_with_options,
};
pub use format::Addressing;
pub use huffman::{CodeTable, FrequencyTable, HuffmanTree, codes_for, improve_tree};
