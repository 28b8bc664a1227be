// Byte frequency analysis.
//
// A FrequencyTable counts each distinct byte and remembers the order in
// which symbols were first seen. That order is the tie-break order used by
// the tree constructor, so two tables with equal counts but different
// first-occurrence order can produce different (equally optimal) trees.

/// Number of distinct symbols in the byte alphabet.
pub const ALPHABET_SIZE: usize = 256;

// ---------------------------------------------------------------------------
// FrequencyTable
// ---------------------------------------------------------------------------

/// Symbol occurrence counts for a single block of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
    /// Distinct symbols in first-occurrence order.
    order: Vec<u8>,
}

impl FrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
            order: Vec::new(),
        }
    }

    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        for &byte in data {
            table.add(byte, 1);
        }
        table
    }

    /// Count `data` in parallel chunks and merge the partial tables.
    ///
    /// Chunks are merged left to right, so both the counts and the
    /// first-occurrence order match `from_bytes`.
    #[cfg(feature = "parallel")]
    pub fn from_bytes_parallel(data: &[u8], chunk_size: usize) -> Self {
        use rayon::prelude::*;

        let partials: Vec<Self> = data
            .par_chunks(chunk_size.max(1))
            .map(Self::from_bytes)
            .collect();

        let mut table = Self::new();
        for partial in &partials {
            table.merge(partial);
        }
        table
    }

    /// Build a table from explicit `(symbol, count)` pairs.
    ///
    /// Pairs are taken in iteration order; a repeated symbol accumulates
    /// onto its first position. Zero counts are skipped.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut table = Self::new();
        for (symbol, count) in pairs {
            table.add(symbol, count);
        }
        table
    }

    /// Add `count` occurrences of `symbol`.
    pub fn add(&mut self, symbol: u8, count: u64) {
        if count == 0 {
            return;
        }
        let slot = &mut self.counts[symbol as usize];
        if *slot == 0 {
            self.order.push(symbol);
        }
        *slot += count;
    }

    /// Fold another table into this one. Symbols new to `self` are appended
    /// in `other`'s first-occurrence order.
    pub fn merge(&mut self, other: &Self) {
        for (symbol, count) in other.iter() {
            self.add(symbol, count);
        }
    }

    /// Occurrences of `symbol` (0 if never seen).
    #[inline]
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of distinct symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of all counts; equals the input length for `from_bytes`.
    pub fn total(&self) -> u64 {
        self.order.iter().map(|&s| self.counts[s as usize]).sum()
    }

    /// `(symbol, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.order.iter().map(|&s| (s, self.counts[s as usize]))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
