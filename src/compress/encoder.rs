// Block compressor.
//
// Compression is two-pass over one block: count frequencies, build the
// tree, then code the block. HuffEncoder therefore buffers everything it is
// given and only produces the artifact on finish():
//   - header: node count, postorder node records, original length
//   - payload: MSB-first packed codes, zero padded to a byte boundary

use std::io::{self, Write};

use log::debug;
use thiserror::Error;

use crate::format::bits::{self, PackError};
use crate::format::header::{ArtifactHeader, HeaderError};
use crate::format::record::tree_to_records;
use crate::huffman::{CodeTable, FrequencyTable, TreeError, build_tree, improve_tree};

/// Inputs at least this large are counted in parallel (with `parallel`).
#[cfg(feature = "parallel")]
const PARALLEL_COUNT_THRESHOLD: usize = 1 << 20; // 1 MiB

#[cfg(feature = "parallel")]
const PARALLEL_CHUNK: usize = 1 << 18; // 256 KiB

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for the block compressor.
#[derive(Debug, Clone, Default)]
pub struct CompressOptions {
    /// Run the shape-preserving optimizer on the tree before coding.
    pub improve_tree: bool,
}

/// Summary of one compressed block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressStats {
    /// Uncompressed block size in bytes.
    pub input_len: usize,
    /// Distinct symbols in the block.
    pub symbols: usize,
    /// Node records in the header (internal tree nodes).
    pub records: usize,
    /// Coded payload length in bits, before padding.
    pub payload_bits: usize,
    /// Total artifact size in bytes.
    pub artifact_len: usize,
    /// Average code length weighted by frequency.
    pub bits_per_symbol: f64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot compress empty input")]
    EmptyInput,
    #[error("input of {0} bytes exceeds the 4 GiB length field")]
    InputTooLarge(usize),
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
    #[error("header error: {0}")]
    Header(#[from] HeaderError),
    #[error("pack error: {0}")]
    Pack(#[from] PackError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// HuffEncoder
// ---------------------------------------------------------------------------

/// Buffering block encoder writing one artifact to `W`.
///
/// # Example
/// ```
/// use oxihuff::compress::encoder::{CompressOptions, HuffEncoder};
///
/// let mut enc = HuffEncoder::new(Vec::new(), CompressOptions::default());
/// enc.write_input(b"abracadabra");
/// let (artifact, stats) = enc.finish().unwrap();
/// assert_eq!(stats.input_len, 11);
/// assert_eq!(artifact.len(), stats.artifact_len);
/// ```
pub struct HuffEncoder<W: Write> {
    writer: W,
    opts: CompressOptions,
    buffer: Vec<u8>,
}

impl<W: Write> HuffEncoder<W> {
    pub fn new(writer: W, opts: CompressOptions) -> Self {
        Self {
            writer,
            opts,
            buffer: Vec::new(),
        }
    }

    /// Append block data. Nothing is written until `finish`.
    pub fn write_input(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Bytes buffered so far.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Compress the buffered block, write the artifact, and return the
    /// writer.
    pub fn finish(mut self) -> Result<(W, CompressStats), EncodeError> {
        let stats = compress_to(&mut self.writer, &self.buffer, &self.opts)?;
        self.writer.flush()?;
        Ok((self.writer, stats))
    }
}

impl<W: Write> Write for HuffEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_input(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Compress `data` into a new artifact with default options.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, EncodeError> {
    compress_with_options(data, &CompressOptions::default())
}

pub fn compress_with_options(data: &[u8], opts: &CompressOptions) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(data.len() / 2 + 64);
    compress_to(&mut out, data, opts)?;
    Ok(out)
}

/// Compress `data` and write the artifact to `writer`.
///
/// The writer is neither flushed nor closed.
pub fn compress_to<W: Write>(
    writer: &mut W,
    data: &[u8],
    opts: &CompressOptions,
) -> Result<CompressStats, EncodeError> {
    if data.is_empty() {
        return Err(EncodeError::EmptyInput);
    }
    let original_len = u32::try_from(data.len()).map_err(|_| EncodeError::InputTooLarge(data.len()))?;

    let freq = count_frequencies(data);
    let mut tree = build_tree(&freq)?;
    if opts.improve_tree {
        improve_tree(&mut tree, &freq);
    }
    let codes = CodeTable::from_tree(&tree);
    tree.number_nodes();

    let header = ArtifactHeader::new(tree_to_records(&tree)?, original_len)?;
    let (payload, payload_bits) = bits::pack_counted(data, &codes)?;

    header.encode(writer)?;
    writer.write_all(&payload)?;

    let stats = CompressStats {
        input_len: data.len(),
        symbols: freq.len(),
        records: header.records().len(),
        payload_bits,
        artifact_len: header.encoded_len() + payload.len(),
        bits_per_symbol: tree.avg_length(&freq),
    };
    debug!(
        "compressed {} bytes: {} symbols, {} records, {:.3} bits/symbol, {} byte artifact",
        stats.input_len, stats.symbols, stats.records, stats.bits_per_symbol, stats.artifact_len
    );
    Ok(stats)
}

fn count_frequencies(data: &[u8]) -> FrequencyTable {
    #[cfg(feature = "parallel")]
    {
        if data.len() >= PARALLEL_COUNT_THRESHOLD {
            return FrequencyTable::from_bytes_parallel(data, PARALLEL_CHUNK);
        }
    }
    FrequencyTable::from_bytes(data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
