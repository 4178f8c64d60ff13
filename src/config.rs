// config.rs — Compile-time defaults for the codec and its sessions.
//
// Runtime configuration lives in `Preferences` (per frame) and in the
// `ConcurrencyGate` installed by an embedder (process wide). Everything here
// is a fixed default that callers may override per call.

pub const KB: usize = 1 << 10;
pub const MB: usize = 1 << 20;

// Initial output capacity for one-shot decompression when the frame does not
// declare its content size. The buffer grows geometrically from here.
pub const DEFAULT_BUFFER_SIZE: usize = KB;

// Output chunk length used by chunked decompression when the caller does not
// pick one.
pub const DEFAULT_CHUNK_LEN: usize = 64 * KB;

// Calls whose input (or output space, for chunked decompression) is at least
// this long run with the host-wide execution lock released.
pub const RELEASE_THRESHOLD: usize = 8 * KB;

// Largest output-to-input ratio an LZ4 block can reach (one 255-byte match
// length extension per input byte). One-shot decompression never allocates
// more than this up front for a declared content size.
pub const MAX_EXPANSION: usize = 255;

// Bytes the stream reader pulls before the engine gives its first hint: the
// smallest possible frame header, so the probe never reads past a frame.
pub const READER_PROBE_LEN: usize = crate::engine::HEADER_SIZE_MIN;

// Chunk length used while the stream reader decodes the frame header.
pub const READER_INITIAL_CHUNK: usize = 32;
