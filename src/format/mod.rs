// Artifact wire format.
//
// - `record`: 4-byte node records, tree serialization, two rebuild modes
// - `bits`  : MSB-first bit packing / unpacking of coded payloads
// - `header`: Artifact header: node count, records, original length

pub mod bits;
pub mod header;
pub mod record;

pub use bits::{BitReader, BitWriter, PackError, UnpackError, pack, pack_counted, unpack};
pub use header::{ArtifactHeader, HeaderError};
pub use record::{
    Addressing, ChildRef, NodeRecord, RecordError, rebuild_tree, records_from_bytes,
    records_to_bytes, tree_to_records,
};
