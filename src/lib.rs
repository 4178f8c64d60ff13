// lz4framed — LZ4 frame codec over liblz4's frame API

//! One-shot and incremental compression/decompression of LZ4 frames.
//!
//! - [`compress`] / [`decompress`]: whole buffers.
//! - [`CompressionSession`] / [`DecompressionSession`]: a frame produced or
//!   consumed across many calls, shareable between threads.
//! - [`FrameWriter`] / [`FrameReader`]: `std::io` adapters over the sessions.
//! - [`api`]: the same operations taking raw integer identifiers.
//!
//! Long engine calls release an embedding host's execution lock through a
//! [`ConcurrencyGate`].

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod oneshot;
pub mod session;
pub mod stream;
pub mod types;

mod buffer;

// ── Version constants ─────────────────────────────────────────────────────────
/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use engine::{engine_version_number, engine_version_string, frame_api_version, LZ4F_VERSION};

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use config::{DEFAULT_BUFFER_SIZE, DEFAULT_CHUNK_LEN, RELEASE_THRESHOLD};
pub use error::{EngineError, Error, ErrorCode, Result};
pub use gate::{install_global, ConcurrencyGate, ExecutionLock, HostLock, NativeThreads};
pub use oneshot::{compress, decompress, decompress_with_hint};
pub use session::{CompressionSession, DecodedChunks, DecompressionSession, Stage};
pub use stream::{FrameReader, FrameWriter};
pub use types::{
    get_block_size, BlockMode, BlockSizeId, FrameInfo, Preferences, LEVEL_MAX, LEVEL_MIN,
    LEVEL_MIN_HC,
};
