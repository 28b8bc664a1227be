// Integration tests for the compress module.
//
// Tests the full pipeline: HuffEncoder -> artifact -> decompress, including
// readers and writers, the tree optimizer, both record addressing modes,
// corrupted artifacts, and large data.

use std::io::{Cursor, Write};

use oxihuff::compress::{
    CompressOptions, DecodeError, DecompressOptions, EncodeError, HuffEncoder, compress,
    compress_to, compress_with_options, decompress, decompress_from, decompress_with_options,
};
use oxihuff::format::{Addressing, HeaderError, RecordError};
use rand::Rng;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn roundtrip(data: &[u8], opts: &CompressOptions) -> Vec<u8> {
    let artifact = compress_with_options(data, opts).unwrap();
    let restored = decompress(&artifact).unwrap();
    assert_eq!(
        restored,
        data,
        "roundtrip mismatch (input={}, artifact={})",
        data.len(),
        artifact.len()
    );
    artifact
}

fn generate_text(size: usize, seed: u64) -> Vec<u8> {
    // Skewed toward a small alphabet so the coder has something to win.
    const ALPHABET: &[u8] = b"eeeeeeettttaaoooiinnsshhrdlu \n";
    let mut state = seed;
    let mut data = Vec::with_capacity(size);
    for _ in 0..size {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        data.push(ALPHABET[(state >> 33) as usize % ALPHABET.len()]);
    }
    data
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_text() {
    init_logging();
    let data = b"the quick brown fox jumps over the lazy dog";
    roundtrip(data, &CompressOptions::default());
    roundtrip(data, &CompressOptions { improve_tree: true });
}

#[test]
fn roundtrip_single_random_symbol() {
    init_logging();
    let symbol: u8 = rand::rng().random();
    let data = vec![symbol; 97];
    let artifact = roundtrip(&data, &CompressOptions::default());
    // One record, 97 one-bit codes.
    assert_eq!(artifact.len(), 1 + 4 + 4 + 13);
}

#[test]
fn roundtrip_full_alphabet() {
    init_logging();
    let data: Vec<u8> = (0..=255u8).cycle().take(256 * 8).collect();
    let artifact = roundtrip(&data, &CompressOptions::default());
    assert_eq!(artifact[0], 255);
    // Uniform over 256 symbols is exactly 8 bits each.
    assert_eq!(artifact.len(), 1 + 255 * 4 + 4 + data.len());
}

#[test]
fn roundtrip_random_bytes() {
    init_logging();
    let mut rng = rand::rng();
    for len in [1usize, 2, 7, 100, 5000] {
        let data: Vec<u8> = (0..len).map(|_| rng.random()).collect();
        roundtrip(&data, &CompressOptions::default());
    }
}

#[test]
fn skewed_text_compresses() {
    init_logging();
    let data = generate_text(64 * 1024, 7);
    let artifact = roundtrip(&data, &CompressOptions::default());
    assert!(
        artifact.len() < data.len() * 3 / 4,
        "artifact={} input={}",
        artifact.len(),
        data.len()
    );
}

#[test]
fn large_input_roundtrip() {
    init_logging();
    let data = generate_text(3 * 1024 * 1024, 42);
    roundtrip(&data, &CompressOptions::default());
}

// ---------------------------------------------------------------------------
// Streaming surfaces
// ---------------------------------------------------------------------------

#[test]
fn encoder_in_chunks_matches_one_shot() {
    let data = generate_text(10_000, 3);
    let mut enc = HuffEncoder::new(Vec::new(), CompressOptions::default());
    for chunk in data.chunks(333) {
        enc.write_all(chunk).unwrap();
    }
    let (artifact, stats) = enc.finish().unwrap();
    assert_eq!(artifact, compress(&data).unwrap());
    assert_eq!(stats.input_len, data.len());
    assert_eq!(stats.artifact_len, artifact.len());
}

#[test]
fn compress_to_and_decompress_from() {
    let data = generate_text(4096, 11);
    let mut sink = Cursor::new(Vec::new());
    compress_to(&mut sink, &data, &CompressOptions::default()).unwrap();
    sink.set_position(0);
    let restored = decompress_from(&mut sink, &DecompressOptions::default()).unwrap();
    assert_eq!(restored, data);
}

#[test]
fn postorder_addressing_reads_encoder_output() {
    let data = generate_text(2048, 5);
    let artifact = compress(&data).unwrap();
    let opts = DecompressOptions {
        addressing: Addressing::Postorder,
    };
    assert_eq!(decompress_with_options(&artifact, &opts).unwrap(), data);
}

// ---------------------------------------------------------------------------
// Error paths
// ---------------------------------------------------------------------------

#[test]
fn empty_input_is_rejected() {
    assert!(matches!(compress(&[]), Err(EncodeError::EmptyInput)));
}

#[test]
fn empty_artifact_is_rejected() {
    assert!(matches!(
        decompress(&[]),
        Err(DecodeError::Header(HeaderError::Empty))
    ));
}

#[test]
fn truncated_header_is_rejected() {
    let artifact = compress(b"helloworld").unwrap();
    let err = decompress(&artifact[..20]).unwrap_err();
    assert!(matches!(err, DecodeError::Header(HeaderError::TooShort { .. })));
    assert!(err.is_malformed());
}

#[test]
fn truncated_payload_is_rejected() {
    let artifact = compress(b"helloworld").unwrap();
    let err = decompress(&artifact[..artifact.len() - 1]).unwrap_err();
    assert!(matches!(err, DecodeError::Truncated(_)));
}

#[test]
fn corrupt_kind_byte_is_rejected() {
    let mut artifact = compress(b"helloworld").unwrap();
    artifact[1] = 7;
    let err = decompress(&artifact).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Header(HeaderError::Record(RecordError::InvalidKind { index: 0, kind: 7 }))
    ));
}

#[test]
fn self_referencing_root_is_rejected() {
    // Root record 0 names itself as its left child.
    let artifact = [1, 1, 0, 0, 5, 1, 0, 0, 0, 0];
    let err = decompress(&artifact).unwrap_err();
    assert!(matches!(err, DecodeError::Tree(RecordError::RecordReused(0))));
}

#[test]
fn declared_length_beyond_payload_is_rejected() {
    let mut artifact = compress(b"aab").unwrap();
    // Claim a huge original length over a one-byte payload.
    let at = artifact.len() - 5;
    artifact[at..at + 4].copy_from_slice(&u32::MAX.to_le_bytes());
    assert!(matches!(decompress(&artifact), Err(DecodeError::Truncated(_))));
}
