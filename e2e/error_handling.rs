//! E2E Test Suite 03: Error Handling & Edge Cases
//!
//! Verifies that every failure surfaces as the right error kind, without
//! panicking:
//! - Empty input and invalid parameters, rejected before the engine runs
//! - Engine errors carry the engine's own names and codes
//! - Truncated frames report an incomplete frame
//! - Checksum corruption is detected
//! - Frame info is unavailable until the header has been fed
//! - Declared content sizes that disagree with the payload

use lz4framed::{
    api, compress, decompress, decompress_with_hint, BlockMode, CompressionSession, DecompressionSession,
    Error, ErrorCode, Preferences, LEVEL_MAX,
};
use xxhash_rust::xxh32::xxh32;

fn sample() -> Vec<u8> {
    b"error handling sample payload, repeated enough to span blocks. ".repeat(3_000)
}

fn engine_kind(err: &Error) -> Option<ErrorCode> {
    err.engine().map(|e| e.kind())
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 1: empty input
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_empty_input_everywhere() {
    assert!(matches!(compress(b"", &Preferences::new()), Err(Error::EmptyInput)));
    assert!(matches!(decompress(b""), Err(Error::EmptyInput)));

    let c = CompressionSession::new().expect("session");
    c.begin(&Preferences::new()).expect("begin");
    assert!(matches!(c.update(b""), Err(Error::EmptyInput)));

    let d = DecompressionSession::new().expect("session");
    assert!(matches!(d.update(b""), Err(Error::EmptyInput)));
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 2: invalid parameters
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_invalid_parameters() {
    let data = sample();
    let err = api::compress(&data, 999, true, true, 0, false).expect_err("block size id");
    assert_eq!(err.to_string(), "block_size_id (999) invalid");

    let err = api::compress(&data, 7, true, true, LEVEL_MAX + 1, false).expect_err("level");
    assert!(matches!(err, Error::Parameter { name: "compression_level", .. }));

    assert!(matches!(api::get_block_size(1), Err(Error::Parameter { .. })));

    let frame = compress(&data, &Preferences::new()).expect("compress");
    assert!(matches!(decompress_with_hint(&frame, 0), Err(Error::Parameter { .. })));

    let d = DecompressionSession::new().expect("session");
    assert!(matches!(d.update_chunked(&frame, 0), Err(Error::Parameter { .. })));
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 3: out-of-order compression calls
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_update_and_end_require_begin() {
    let c = CompressionSession::new().expect("session");
    let err = c.update(b"data").expect_err("update before begin");
    assert_eq!(engine_kind(&err), Some(ErrorCode::CompressionStateUninitialized));
    let e = err.engine().expect("engine error");
    assert_eq!(e.code(), 20);
    assert_eq!(e.name(), "ERROR_compressionState_uninitialized");

    let err = c.end().expect_err("end before begin");
    assert_eq!(engine_kind(&err), Some(ErrorCode::CompressionStateUninitialized));
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 4: corrupted headers
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_corrupted_magic() {
    let mut frame = compress(&sample(), &Preferences::new()).expect("compress");
    frame[0] ^= 0xFF;
    let err = decompress(&frame).expect_err("bad magic");
    assert_eq!(engine_kind(&err), Some(ErrorCode::FrameTypeUnknown));
    assert_ne!(err.engine().map(|e| e.code()), Some(0));
}

#[test]
fn test_corrupted_header_checksum() {
    let mut frame = compress(&sample(), &Preferences::new()).expect("compress");
    // magic(4) FLG BD content-size(8) HC
    frame[14] ^= 0x01;
    let err = decompress(&frame).expect_err("bad header checksum");
    assert_eq!(engine_kind(&err), Some(ErrorCode::HeaderChecksumInvalid));

    let d = DecompressionSession::new().expect("session");
    let err = d.update(&frame).expect_err("bad header checksum");
    assert_eq!(engine_kind(&err), Some(ErrorCode::HeaderChecksumInvalid));
}

#[test]
fn test_too_short_for_a_header() {
    let err = decompress(b"\x04\x22").expect_err("two bytes");
    assert_eq!(engine_kind(&err), Some(ErrorCode::FrameHeaderIncomplete));
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 5: truncated frames
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_truncated_mid_block() {
    let frame = compress(&sample(), &Preferences::new()).expect("compress");
    let cut = &frame[..frame.len() / 2];
    assert!(matches!(decompress(cut), Err(Error::IncompleteFrame)));

    let d = DecompressionSession::new().expect("session");
    let decoded = d.update(cut).expect("partial input is not an error");
    assert!(decoded.input_hint > 0);
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 6: checksum corruption
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_content_checksum_mismatch() {
    let mut frame = compress(&sample(), &Preferences::new().with_content_checksum(true)).expect("compress");
    let last = frame.len() - 1;
    frame[last] ^= 0x55;
    let err = decompress(&frame).expect_err("content checksum");
    assert_eq!(engine_kind(&err), Some(ErrorCode::ContentChecksumInvalid));
}

#[test]
fn test_block_checksum_mismatch() {
    let data = sample();
    let prefs = Preferences::new().with_block_checksum(true).with_content_checksum(true);
    let mut frame = compress(&data, &prefs).expect("compress");
    // last 4 bytes before end mark (4) and content checksum (4)
    let idx = frame.len() - 9;
    frame[idx] ^= 0x01;
    let err = decompress(&frame).expect_err("block checksum");
    assert_eq!(engine_kind(&err), Some(ErrorCode::BlockChecksumInvalid));
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 7: frame info timing
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_frame_info_before_header() {
    let frame = compress(&sample(), &Preferences::new()).expect("compress");
    let d = DecompressionSession::new().expect("session");

    let err = d.frame_info().expect_err("nothing fed");
    assert_eq!(engine_kind(&err), Some(ErrorCode::FrameHeaderIncomplete));

    // part of the header buffered
    d.update(&frame[..5]).expect("partial header");
    let err = d.frame_info().expect_err("partial header");
    assert!(matches!(
        engine_kind(&err),
        Some(ErrorCode::FrameDecodingAlreadyStarted) | Some(ErrorCode::FrameHeaderIncomplete)
    ));

    d.update(&frame[5..15]).expect("rest of header");
    assert!(d.frame_info().is_ok());
}

#[test]
fn test_garbage_then_reset() {
    let d = DecompressionSession::new().expect("session");
    let err = d.update(&[0xAB; 64]).expect_err("garbage");
    assert!(engine_kind(&err).is_some());
    d.reset();
    let frame = compress(b"clean again", &Preferences::new()).expect("compress");
    assert_eq!(d.update(&frame).expect("after reset").concat(), b"clean again");
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 8: declared size disagreeing with the payload
// ═════════════════════════════════════════════════════════════════════════════

/// Rewrite the content-size field of a frame written by `compress` and fix
/// up the header checksum.
fn redeclare(frame: &mut [u8], size: u64) {
    // magic(4) FLG BD content-size(8) HC
    frame[6..14].copy_from_slice(&size.to_le_bytes());
    frame[14] = (xxh32(&frame[4..14], 0) >> 8) as u8;
}

#[test]
fn test_declared_size_smaller_than_payload() {
    let data = b"declared size mismatch ".repeat(13_044);
    let mut frame = compress(&data, &Preferences::new()).expect("compress");
    redeclare(&mut frame, 1_000);

    // output outgrows the declared allocation before the engine rejects it
    for hint in [1, 1024] {
        let err = decompress_with_hint(&frame, hint).expect_err("too small");
        assert_eq!(engine_kind(&err), Some(ErrorCode::FrameSizeWrong));
    }
    let err = DecompressionSession::new().expect("session").update(&frame).expect_err("session");
    assert_eq!(engine_kind(&err), Some(ErrorCode::FrameSizeWrong));
}

#[test]
fn test_declared_size_larger_than_payload() {
    let data = b"declared size mismatch ".repeat(13_044);
    let mut frame = compress(&data, &Preferences::new().with_block_mode(BlockMode::Linked))
        .expect("compress");
    redeclare(&mut frame, 400_000);

    let err = decompress_with_hint(&frame, 1).expect_err("too large");
    assert_eq!(engine_kind(&err), Some(ErrorCode::FrameSizeWrong));
}

#[test]
fn test_huge_declared_size_is_not_allocated() {
    let mut frame = compress(b"tiny", &Preferences::new()).expect("compress");
    redeclare(&mut frame, 1 << 42);

    let err = decompress(&frame).expect_err("tiny payload");
    assert_eq!(engine_kind(&err), Some(ErrorCode::FrameSizeWrong));

    // header alone: nothing to decode, nothing allocated for the claim
    assert!(matches!(decompress(&frame[..15]), Err(Error::IncompleteFrame)));
}
