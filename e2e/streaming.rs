//! E2E Test Suite 02: Session Streaming API
//!
//! Validates the begin/update/end compression protocol and chunked
//! decompression:
//! - Streaming output decodes to the same payload as one-shot output
//! - Chunked decompression under arbitrary input partitions and chunk sizes
//! - Byte-at-a-time feeding
//! - Autoflush and explicit flush behaviour
//! - Declared content size enforcement at `end`
//! - Session reuse across frames

use lz4framed::{
    compress, decompress, BlockMode, BlockSizeId, CompressionSession, DecompressionSession,
    ErrorCode, Preferences, Stage, LEVEL_MIN_HC,
};

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i / 7) % 97) as u8 ^ (i as u8 & 0x0F)).collect()
}

fn stream_compress(session: &CompressionSession, prefs: &Preferences, data: &[u8], piece: usize) -> Vec<u8> {
    let mut frame = session.begin(prefs).expect("begin");
    for p in data.chunks(piece) {
        frame.extend(session.update(p).expect("update"));
    }
    frame.extend(session.end().expect("end"));
    frame
}

fn chunked_decompress(frame: &[u8], feed: usize, chunk_len: usize) -> (Vec<u8>, usize) {
    let session = DecompressionSession::new().expect("session");
    let mut out = Vec::new();
    let mut hint = usize::MAX;
    for piece in frame.chunks(feed) {
        let decoded = session.update_chunked(piece, chunk_len).expect("decompress update");
        for chunk in &decoded.chunks {
            assert!(chunk.len() <= chunk_len);
            assert!(!chunk.is_empty());
        }
        hint = decoded.input_hint;
        out.extend(decoded.concat());
    }
    (out, hint)
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: streaming vs one-shot equivalence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_streaming_matches_oneshot_payload() {
    let data = payload(777_777);
    let prefs = Preferences::new().with_block_size(BlockSizeId::Max256Kb);
    let session = CompressionSession::new().expect("session");

    for piece in [1_000, 65_536, 300_000, data.len()] {
        let streamed = stream_compress(&session, &prefs, &data, piece);
        let oneshot = compress(&data, &prefs).expect("compress");
        assert_eq!(decompress(&streamed).expect("streamed"), data);
        assert_eq!(decompress(&oneshot).expect("one-shot"), data);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: chunked decompression under partitions
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_chunked_decompression_partitions() {
    let data = payload(300_001);
    let frame = compress(&data, &Preferences::new().with_block_checksum(true)).expect("compress");

    for (feed, chunk_len) in [(frame.len(), 65_536), (4_096, 1_000), (7, 8_192), (100_000, 1)] {
        let (out, hint) = chunked_decompress(&frame, feed, chunk_len);
        assert_eq!(hint, 0, "feed={} chunk_len={}", feed, chunk_len);
        assert!(out == data, "feed={} chunk_len={}", feed, chunk_len);
    }
}

#[test]
fn test_byte_at_a_time() {
    let data = payload(20_000);
    let frame = compress(&data, &Preferences::new().with_level(LEVEL_MIN_HC)).expect("compress");
    let (out, hint) = chunked_decompress(&frame, 1, 4_096);
    assert_eq!(hint, 0);
    assert_eq!(out, data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: autoflush emits a block per update
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_autoflush() {
    let session = CompressionSession::new().expect("session");

    session.begin(&Preferences::new().with_autoflush(false)).expect("begin");
    assert!(session.update(b"small").expect("update").is_empty());
    session.end().expect("end");

    session.begin(&Preferences::new().with_autoflush(true)).expect("begin");
    assert!(!session.update(b"small").expect("update").is_empty());
    session.end().expect("end");
}

#[test]
fn test_flush_makes_prefix_decodable() {
    let session = CompressionSession::new().expect("session");
    let mut frame = session.begin(&Preferences::new()).expect("begin");
    frame.extend(session.update(b"first half, ").expect("update"));
    frame.extend(session.flush().expect("flush"));

    let d = DecompressionSession::new().expect("session");
    let decoded = d.update(&frame).expect("prefix");
    assert!(decoded.input_hint > 0);
    assert_eq!(decoded.concat(), b"first half, ");

    let mut rest = session.update(b"second half").expect("update");
    rest.extend(session.end().expect("end"));
    let decoded = d.update(&rest).expect("rest");
    assert_eq!(decoded.input_hint, 0);
    assert_eq!(decoded.concat(), b"second half");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: declared content size is checked at end
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_declared_size_enforced() {
    let session = CompressionSession::new().expect("session");
    let prefs = Preferences::new().with_declared_content_size(Some(10));

    session.begin(&prefs).expect("begin");
    session.update(b"0123456789").expect("update");
    session.end().expect("matching size");

    session.begin(&prefs).expect("begin");
    session.update(b"short").expect("update");
    let err = session.end().expect_err("mismatched size");
    assert_eq!(err.engine().map(|e| e.kind()), Some(ErrorCode::FrameSizeWrong));
    assert_eq!(session.stage(), Stage::Idle);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: sessions are reusable
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_sessions_reused_across_frames() {
    let c = CompressionSession::new().expect("session");
    let d = DecompressionSession::new().expect("session");

    for (i, mode) in [BlockMode::Linked, BlockMode::Independent, BlockMode::Linked].into_iter().enumerate() {
        let data = payload(50_000 + i * 1_000);
        let frame = stream_compress(&c, &Preferences::new().with_block_mode(mode), &data, 10_000);
        let decoded = d.update(&frame).expect("decompress");
        assert_eq!(decoded.input_hint, 0);
        assert_eq!(decoded.consumed, frame.len());
        assert_eq!(decoded.concat(), data);
    }
}

#[test]
fn test_empty_payload_frame() {
    let c = CompressionSession::new().expect("session");
    let mut frame = c.begin(&Preferences::new()).expect("begin");
    frame.extend(c.end().expect("end"));

    assert!(decompress(&frame).expect("decompress").is_empty());
    let decoded = DecompressionSession::new().expect("session").update(&frame).expect("update");
    assert!(decoded.chunks.is_empty());
    assert_eq!(decoded.input_hint, 0);
}
