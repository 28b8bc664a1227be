// Artifact header encoding/decoding.
//
// Layout:
//   1. node count      (1 byte, 1..=255)
//   2. node records    (count * 4 bytes, postorder)
//   3. original length (4 bytes, u32 little-endian)
//   4. packed payload  (rest of the artifact)
//
// The root of the tree is always the last record.

use std::io::{self, Write};

use thiserror::Error;

use super::record::{self, NodeRecord, RECORD_LEN, RecordError};

/// Width of the original-length field.
pub const LENGTH_FIELD_LEN: usize = 4;

/// Largest record count the one-byte count field can carry. A full 256-symbol
/// alphabet needs exactly this many internal nodes.
pub const MAX_RECORDS: usize = u8::MAX as usize;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("artifact is empty")]
    Empty,
    #[error("artifact declares no tree records")]
    NoRecords,
    #[error("{0} records exceed the header limit of 255")]
    TooManyRecords(usize),
    #[error("artifact header truncated: need {needed} bytes, have {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error(transparent)]
    Record(#[from] RecordError),
}

// ---------------------------------------------------------------------------
// ArtifactHeader
// ---------------------------------------------------------------------------

/// Everything in an artifact before the packed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHeader {
    records: Vec<NodeRecord>,
    original_len: u32,
}

impl ArtifactHeader {
    pub fn new(records: Vec<NodeRecord>, original_len: u32) -> Result<Self, HeaderError> {
        match records.len() {
            0 => Err(HeaderError::NoRecords),
            n if n > MAX_RECORDS => Err(HeaderError::TooManyRecords(n)),
            _ => Ok(Self {
                records,
                original_len,
            }),
        }
    }

    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    pub fn original_len(&self) -> u32 {
        self.original_len
    }

    /// Index of the root record.
    pub fn root_index(&self) -> usize {
        self.records.len() - 1
    }

    /// Encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        1 + self.records.len() * RECORD_LEN + LENGTH_FIELD_LEN
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        // `new` caps the count at 255.
        buf.push(self.records.len() as u8);
        record::write_records(&self.records, &mut buf);
        buf.extend_from_slice(&self.original_len.to_le_bytes());
        w.write_all(&buf)
    }

    /// Parse the header at the front of `data`, returning it together with
    /// the remaining payload bytes.
    pub fn decode(data: &[u8]) -> Result<(Self, &[u8]), HeaderError> {
        let (&count, rest) = data.split_first().ok_or(HeaderError::Empty)?;
        let count = count as usize;
        if count == 0 {
            return Err(HeaderError::NoRecords);
        }

        let records_len = count * RECORD_LEN;
        let needed = records_len + LENGTH_FIELD_LEN;
        if rest.len() < needed {
            return Err(HeaderError::TooShort {
                needed: 1 + needed,
                actual: data.len(),
            });
        }

        let (record_bytes, rest) = rest.split_at(records_len);
        let (len_bytes, payload) = rest.split_at(LENGTH_FIELD_LEN);
        let records = record::records_from_bytes(record_bytes)?;
        let original_len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]);

        Ok((
            Self {
                records,
                original_len,
            },
            payload,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::record::ChildRef;

    fn sample() -> ArtifactHeader {
        ArtifactHeader::new(
            vec![
                NodeRecord::new(ChildRef::Leaf(3), ChildRef::Leaf(2)),
                NodeRecord::new(ChildRef::Internal(0), ChildRef::Leaf(5)),
            ],
            0x0102_0304,
        )
        .unwrap()
    }

    #[test]
    fn encodes_expected_layout() {
        let mut out = Vec::new();
        sample().encode(&mut out).unwrap();
        assert_eq!(
            out,
            vec![2, 0, 3, 0, 2, 1, 0, 0, 5, 0x04, 0x03, 0x02, 0x01]
        );
        assert_eq!(out.len(), sample().encoded_len());
    }

    #[test]
    fn decode_splits_payload() {
        let mut out = Vec::new();
        sample().encode(&mut out).unwrap();
        out.extend_from_slice(&[0xAA, 0xBB]);

        let (header, payload) = ArtifactHeader::decode(&out).unwrap();
        assert_eq!(header, sample());
        assert_eq!(header.root_index(), 1);
        assert_eq!(payload, &[0xAA, 0xBB]);
    }

    #[test]
    fn rejects_empty_and_zero_count() {
        assert_eq!(ArtifactHeader::decode(&[]).unwrap_err(), HeaderError::Empty);
        assert_eq!(
            ArtifactHeader::decode(&[0, 1, 2, 3, 4]).unwrap_err(),
            HeaderError::NoRecords
        );
        assert_eq!(
            ArtifactHeader::new(Vec::new(), 0).unwrap_err(),
            HeaderError::NoRecords
        );
    }

    #[test]
    fn rejects_truncated_header() {
        // One record declared, size field cut short.
        assert_eq!(
            ArtifactHeader::decode(&[1, 0, 1, 0, 2, 9, 9]).unwrap_err(),
            HeaderError::TooShort {
                needed: 9,
                actual: 7
            }
        );
    }

    #[test]
    fn rejects_bad_kind_byte() {
        let err = ArtifactHeader::decode(&[1, 0, 1, 5, 2, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            HeaderError::Record(RecordError::InvalidKind { index: 0, kind: 5 })
        );
    }

    #[test]
    fn rejects_too_many_records() {
        let records = vec![NodeRecord::new(ChildRef::Leaf(0), ChildRef::Leaf(1)); 256];
        assert_eq!(
            ArtifactHeader::new(records, 0).unwrap_err(),
            HeaderError::TooManyRecords(256)
        );
    }
}
