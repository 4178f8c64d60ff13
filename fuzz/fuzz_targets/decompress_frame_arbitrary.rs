#![no_main]
use libfuzzer_sys::fuzz_target;
use lz4framed::DecompressionSession;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must yield errors, never panics or UB.
    let _ = lz4framed::decompress(data);

    // Same bytes fed incrementally, resetting after every failure.
    let Ok(session) = DecompressionSession::new() else { return };
    for piece in data.chunks(7) {
        if session.update_chunked(piece, 256).is_err() {
            session.reset();
        }
    }
    let _ = session.frame_info();
});
