// Bit packing for Huffman-coded payloads.
//
// Bits are written MSB-first: the first code bit lands in bit 7 of the first
// byte. The final partial byte is padded with zero bits. Because padding is
// indistinguishable from data, unpacking needs the exact symbol count and
// stops as soon as it has decoded that many symbols.

use thiserror::Error;

use crate::huffman::codes::{Code, CodeTable};
use crate::huffman::tree::{HuffmanTree, Node};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("no code for symbol {symbol} at input offset {offset}")]
    MissingCode { symbol: u8, offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnpackError {
    #[error("bitstream exhausted after {decoded} of {expected} symbols")]
    Truncated { expected: usize, decoded: usize },
}

// ---------------------------------------------------------------------------
// BitWriter
// ---------------------------------------------------------------------------

/// Accumulates bits MSB-first into a byte buffer.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    /// Partial byte, filled from bit 7 down.
    current: u8,
    /// Bits used in `current` (0-7).
    used: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            current: 0,
            used: 0,
        }
    }

    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.current |= 0x80 >> self.used;
        }
        self.used += 1;
        if self.used == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.used = 0;
        }
    }

    pub fn write_code(&mut self, code: &Code) {
        for &bit in code.bits() {
            self.write_bit(bit);
        }
    }

    /// Total bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.used as usize
    }

    /// Flush the partial byte (zero padded) and return the buffer.
    pub fn finish(mut self) -> Vec<u8> {
        if self.used > 0 {
            self.bytes.push(self.current);
        }
        self.bytes
    }
}

// ---------------------------------------------------------------------------
// BitReader
// ---------------------------------------------------------------------------

/// Reads bits MSB-first from a byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Next bit, or `None` at the end of the data.
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        let byte = *self.data.get(self.position / 8)?;
        let bit = byte & (0x80 >> (self.position % 8)) != 0;
        self.position += 1;
        Some(bit)
    }

    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.position
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

// ---------------------------------------------------------------------------
// pack / unpack
// ---------------------------------------------------------------------------

/// Concatenate the codes of `data` into a zero-padded byte buffer of
/// `ceil(bits / 8)` bytes.
pub fn pack(data: &[u8], codes: &CodeTable) -> Result<Vec<u8>, PackError> {
    pack_counted(data, codes).map(|(packed, _)| packed)
}

/// Like `pack`, also returning the number of code bits before padding.
pub fn pack_counted(data: &[u8], codes: &CodeTable) -> Result<(Vec<u8>, usize), PackError> {
    let mut writer = BitWriter::with_capacity(data.len() / 2 + 1);
    for (offset, &symbol) in data.iter().enumerate() {
        let code = codes
            .get(symbol)
            .ok_or(PackError::MissingCode { symbol, offset })?;
        writer.write_code(code);
    }
    let bits = writer.bit_len();
    Ok((writer.finish(), bits))
}

/// Decode `len` symbols from `packed` by walking `tree` one bit at a time.
///
/// Trailing padding bits are never interpreted once `len` symbols have been
/// produced.
pub fn unpack(packed: &[u8], tree: &HuffmanTree, len: usize) -> Result<Vec<u8>, UnpackError> {
    // Every symbol costs at least one bit.
    let mut out = Vec::with_capacity(len.min(packed.len() * 8));
    let mut reader = BitReader::new(packed);
    let root = tree.root();
    let mut node = root;

    while out.len() < len {
        let Some(bit) = reader.read_bit() else {
            return Err(UnpackError::Truncated {
                expected: len,
                decoded: out.len(),
            });
        };
        if let Node::Internal { left, right, .. } = *tree.node(node) {
            node = if bit { right } else { left };
        }
        if let Node::Leaf { symbol } = *tree.node(node) {
            out.push(symbol);
            node = root;
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
