//! E2E Test Suite 01: One-shot Frame API
//!
//! Validates whole-buffer compression and decompression:
//! - Round trips across block sizes, block modes, checksums and levels
//! - Declared content size and header parameters as reported by frame info
//! - Output growth from a 1-byte initial buffer
//! - Inputs far larger than one block

use lz4framed::{
    compress, decompress, decompress_with_hint, BlockMode, BlockSizeId, CompressionSession,
    DecompressionSession, Preferences, LEVEL_MAX, LEVEL_MIN, LEVEL_MIN_HC,
};

fn text(len: usize) -> Vec<u8> {
    b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. "
        .iter()
        .cycle()
        .take(len)
        .copied()
        .collect()
}

fn noisy(len: usize) -> Vec<u8> {
    let mut x: u32 = 0x9E37_79B9;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            (x >> 24) as u8
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: representative configurations round-trip
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_round_trip_configurations() {
    let configs = [
        Preferences::new(),
        Preferences::new().with_block_size(BlockSizeId::Max256Kb).with_block_mode(BlockMode::Independent),
        Preferences::new().with_block_size(BlockSizeId::Max1Mb).with_block_checksum(true),
        Preferences::new().with_block_size(BlockSizeId::Max4Mb).with_content_checksum(false),
        Preferences::new().with_level(LEVEL_MIN_HC),
        Preferences::new().with_level(LEVEL_MAX).with_block_mode(BlockMode::Independent),
    ];
    let inputs = [text(1), text(70_000), noisy(300_000)];

    for prefs in &configs {
        for input in &inputs {
            let frame = compress(input, prefs).expect("compress");
            let out = decompress(&frame).expect("decompress");
            assert_eq!(out.len(), input.len(), "length mismatch for {:?}", prefs);
            assert!(out == *input, "payload mismatch for {:?}", prefs);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: frame info reflects the preferences used
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_frame_info_matches_preferences() {
    let input = text(3_600_000);
    let prefs = Preferences::new()
        .with_block_size(BlockSizeId::Max256Kb)
        .with_block_mode(BlockMode::Independent)
        .with_content_checksum(false);
    let frame = compress(&input, &prefs).expect("compress");

    let session = DecompressionSession::new().expect("session");
    let out = session.update_chunked(&frame[..32], 1024).expect("header bytes");
    assert!(out.input_hint > 0);

    let info = session.frame_info().expect("frame info");
    assert_eq!(info.declared_length, input.len() as u64);
    assert_eq!(info.block_size_id, BlockSizeId::Max256Kb);
    assert!(!info.block_mode_linked);
    assert!(!info.content_checksum_enabled);
    assert!(info.input_hint > 0);
    assert_eq!(info.block_size(), 256 * 1024);
}

#[test]
fn test_frame_info_without_declared_size() {
    let session = CompressionSession::new().expect("session");
    let mut frame = session.begin(&Preferences::new().with_content_checksum(true)).expect("begin");
    frame.extend(session.update(&text(1000)).expect("update"));
    frame.extend(session.end().expect("end"));

    let d = DecompressionSession::new().expect("session");
    d.update_chunked(&frame[..7], 64).expect("header");
    let info = d.frame_info().expect("frame info");
    assert_eq!(info.declared_length, 0);
    assert!(info.block_mode_linked);
    assert!(info.content_checksum_enabled);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: growth from a 1-byte buffer
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_growth_from_one_byte() {
    let input = noisy(200_000);

    // declared size: buffer is sized from the header, hint is irrelevant
    let declared = compress(&input, &Preferences::new()).expect("compress");
    assert_eq!(decompress_with_hint(&declared, 1).expect("decompress"), input);

    // no declared size: buffer doubles until the payload fits
    let session = CompressionSession::new().expect("session");
    let mut undeclared = session.begin(&Preferences::new()).expect("begin");
    for piece in input.chunks(33_333) {
        undeclared.extend(session.update(piece).expect("update"));
    }
    undeclared.extend(session.end().expect("end"));
    assert_eq!(decompress_with_hint(&undeclared, 1).expect("decompress"), input);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: levels at both ends of the range, and below it
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_level_extremes() {
    let input = text(100_000);
    let fast = compress(&input, &Preferences::new().with_level(LEVEL_MIN)).expect("fast");
    let high = compress(&input, &Preferences::new().with_level(LEVEL_MAX)).expect("hc");
    assert!(high.len() <= fast.len());
    assert_eq!(decompress(&fast).expect("fast"), input);
    assert_eq!(decompress(&high).expect("hc"), input);

    let accelerated = compress(&input, &Preferences::new().with_level(-64)).expect("accelerated");
    assert_eq!(decompress(&accelerated).expect("accelerated"), input);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: many blocks of the largest size
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_multi_block_large_input() {
    let input = text(9 * 1024 * 1024 + 17);
    for mode in [BlockMode::Linked, BlockMode::Independent] {
        let prefs = Preferences::new().with_block_size(BlockSizeId::Max4Mb).with_block_mode(mode);
        let frame = compress(&input, &prefs).expect("compress");
        assert!(decompress(&frame).expect("decompress") == input);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: compressible input shrinks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_compressible_input_shrinks() {
    let input = text(1_000_000);
    let frame = compress(&input, &Preferences::new()).expect("compress");
    assert!(frame.len() < input.len() / 10);
}
