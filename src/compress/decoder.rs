// Block decompressor.
//
// Reads the header, rebuilds the tree from its node records, then walks the
// packed payload bit by bit. Only the tree is used to recover symbols; no
// code table is rebuilt.

use std::io::{self, Read};

use log::debug;
use thiserror::Error;

use crate::format::bits::{self, UnpackError};
use crate::format::header::{ArtifactHeader, HeaderError};
use crate::format::record::{self, Addressing, RecordError};
use crate::huffman::HuffmanTree;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for the block decompressor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecompressOptions {
    /// How node-record references are resolved.
    pub addressing: Addressing,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed header: {0}")]
    Header(#[from] HeaderError),
    #[error("malformed tree: {0}")]
    Tree(#[from] RecordError),
    #[error("truncated payload: {0}")]
    Truncated(#[from] UnpackError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DecodeError {
    /// Whether the artifact itself is structurally corrupt (as opposed to
    /// cut short or unreadable).
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Header(_) | Self::Tree(_))
    }
}

// ---------------------------------------------------------------------------
// Parsed artifact
// ---------------------------------------------------------------------------

/// An artifact split into its rebuilt tree and coded payload.
#[derive(Debug, Clone)]
pub struct Artifact<'a> {
    pub header: ArtifactHeader,
    pub tree: HuffmanTree,
    pub payload: &'a [u8],
}

impl<'a> Artifact<'a> {
    /// Parse `data` and rebuild its tree.
    pub fn parse(data: &'a [u8], addressing: Addressing) -> Result<Self, DecodeError> {
        let (header, payload) = ArtifactHeader::decode(data)?;
        let tree = record::rebuild_tree(header.records(), header.root_index(), addressing)?;
        Ok(Self {
            header,
            tree,
            payload,
        })
    }

    /// Decode the payload back into the original block.
    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        let len = self.header.original_len() as usize;
        Ok(bits::unpack(self.payload, &self.tree, len)?)
    }
}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Decompress an artifact with default options.
pub fn decompress(artifact: &[u8]) -> Result<Vec<u8>, DecodeError> {
    decompress_with_options(artifact, &DecompressOptions::default())
}

pub fn decompress_with_options(
    artifact: &[u8],
    opts: &DecompressOptions,
) -> Result<Vec<u8>, DecodeError> {
    let parsed = Artifact::parse(artifact, opts.addressing)?;
    let out = parsed.decode()?;
    debug!(
        "decompressed {} byte artifact ({} records, {:?} addressing) into {} bytes",
        artifact.len(),
        parsed.header.records().len(),
        opts.addressing,
        out.len()
    );
    Ok(out)
}

/// Read a whole artifact from `reader` and decompress it.
///
/// The reader is consumed to EOF but not closed.
pub fn decompress_from<R: Read>(
    reader: &mut R,
    opts: &DecompressOptions,
) -> Result<Vec<u8>, DecodeError> {
    let mut artifact = Vec::new();
    reader.read_to_end(&mut artifact)?;
    decompress_with_options(&artifact, opts)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
