// Property tests: round trips and partition independence over arbitrary
// payloads and preferences.

use lz4framed::{
    compress, decompress_with_hint, BlockMode, BlockSizeId, CompressionSession,
    DecompressionSession, Preferences, LEVEL_MAX, LEVEL_MIN,
};
use proptest::prelude::*;

fn preferences() -> impl Strategy<Value = Preferences> {
    (
        prop::sample::select(BlockSizeId::ALL.to_vec()),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        // negative levels: accelerated fast mode
        (LEVEL_MIN - 16)..=LEVEL_MAX,
        any::<bool>(),
    )
        .prop_map(|(id, linked, block_checksum, content_checksum, level, autoflush)| {
            Preferences::new()
                .with_block_size(id)
                .with_block_mode(BlockMode::from_linked(linked))
                .with_block_checksum(block_checksum)
                .with_content_checksum(content_checksum)
                .with_level(level)
                .with_autoflush(autoflush)
        })
}

/// Mostly-compressible payloads: runs of a small alphabet with noise.
fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 1..4_096),
        prop::collection::vec(prop::sample::select(b"abcde ".to_vec()), 1..200_000),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn oneshot_round_trip(data in payload(), prefs in preferences(), hint in 1usize..70_000) {
        let frame = compress(&data, &prefs).unwrap();
        prop_assert_eq!(decompress_with_hint(&frame, hint).unwrap(), data);
    }

    #[test]
    fn streamed_frames_decode_under_any_partition(
        data in payload(),
        prefs in preferences(),
        update_len in 1usize..50_000,
        feed_len in 1usize..20_000,
        chunk_len in 1usize..100_000,
    ) {
        let c = CompressionSession::new().unwrap();
        let mut frame = c.begin(&prefs).unwrap();
        for piece in data.chunks(update_len) {
            frame.extend(c.update(piece).unwrap());
        }
        frame.extend(c.end().unwrap());

        let d = DecompressionSession::new().unwrap();
        let mut out = Vec::with_capacity(data.len());
        let mut hint = 1;
        for piece in frame.chunks(feed_len) {
            let decoded = d.update_chunked(piece, chunk_len).unwrap();
            for chunk in &decoded.chunks {
                prop_assert!(!chunk.is_empty() && chunk.len() <= chunk_len);
            }
            hint = decoded.input_hint;
            out.extend(decoded.concat());
        }
        prop_assert_eq!(hint, 0);
        prop_assert_eq!(out, data);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 1..512)) {
        let _ = lz4framed::decompress(&bytes);
        let d = DecompressionSession::new().unwrap();
        let _ = d.update_chunked(&bytes, 64);
    }
}
