// Block compression API.
//
// - `encoder`: HuffEncoder and the compress entry points
// - `decoder`: artifact parsing and the decompress entry points

pub mod decoder;
pub mod encoder;

pub use decoder::{
    Artifact, DecodeError, DecompressOptions, decompress, decompress_from, decompress_with_options,
};
pub use encoder::{
    CompressOptions, CompressStats, EncodeError, HuffEncoder, compress, compress_to,
    compress_with_options,
};
