#![no_main]
use libfuzzer_sys::fuzz_target;
use lz4framed::{BlockMode, BlockSizeId, CompressionSession, DecompressionSession, Preferences};

fuzz_target!(|data: &[u8]| {
    // First byte picks the preferences, the rest is the payload.
    let Some((&knobs, payload)) = data.split_first() else { return };
    if payload.is_empty() {
        return;
    }
    let prefs = Preferences::new()
        .with_block_size(BlockSizeId::ALL[(knobs & 0x07) as usize % BlockSizeId::ALL.len()])
        .with_block_mode(BlockMode::from_linked(knobs & 0x08 == 0))
        .with_block_checksum(knobs & 0x10 != 0)
        .with_content_checksum(knobs & 0x20 != 0)
        .with_autoflush(knobs & 0x40 != 0)
        .with_level(if knobs & 0x80 != 0 { 3 } else { 0 });

    // one-shot
    let frame = lz4framed::compress(payload, &prefs).expect("compress own input");
    let back = lz4framed::decompress_with_hint(&frame, 1).expect("decompress own frame");
    assert_eq!(back, payload, "one-shot round-trip mismatch");

    // streamed in uneven pieces, decoded in small chunks
    let c = CompressionSession::new().expect("session");
    let mut streamed = c.begin(&prefs).expect("begin");
    for piece in payload.chunks(1 + (knobs as usize % 97)) {
        streamed.extend(c.update(piece).expect("update"));
    }
    streamed.extend(c.end().expect("end"));

    let d = DecompressionSession::new().expect("session");
    let decoded = d.update_chunked(&streamed, 1 + (knobs as usize % 5000)).expect("decode");
    assert_eq!(decoded.input_hint, 0);
    assert_eq!(decoded.concat(), payload, "streamed round-trip mismatch");
});
