//! Flat operation surface taking raw integer identifiers.
//!
//! These functions accept block size ids and levels as plain integers (as a
//! foreign binding or a config file would supply them), validate them, and
//! delegate to the typed API. Invalid values are rejected with
//! [`Error::Parameter`](crate::Error::Parameter) before the engine is called.

use crate::error::Result;
use crate::oneshot;
use crate::session::{CompressionSession, DecodedChunks, DecompressionSession};
use crate::types::{self, BlockMode, BlockSizeId, FrameInfo, Preferences};

/// Maximum block size in bytes for a block size id.
pub fn get_block_size(block_size_id: u32) -> Result<usize> {
    types::get_block_size(block_size_id)
}

fn preferences(
    block_size_id: u32,
    block_mode_linked: bool,
    checksum: bool,
    level: i32,
    block_checksum: bool,
) -> Result<Preferences> {
    let prefs = Preferences::new()
        .with_block_size(BlockSizeId::try_from(block_size_id)?)
        .with_block_mode(BlockMode::from_linked(block_mode_linked))
        .with_content_checksum(checksum)
        .with_level(level)
        .with_block_checksum(block_checksum);
    prefs.validate()?;
    Ok(prefs)
}

/// Compress `data` into one frame.
pub fn compress(
    data: &[u8],
    block_size_id: u32,
    block_mode_linked: bool,
    checksum: bool,
    level: i32,
    block_checksum: bool,
) -> Result<Vec<u8>> {
    let prefs = preferences(block_size_id, block_mode_linked, checksum, level, block_checksum)?;
    oneshot::compress(data, &prefs)
}

/// Decompress one frame; `buffer_size` is the initial output size when the
/// frame does not declare its length.
pub fn decompress(data: &[u8], buffer_size: usize) -> Result<Vec<u8>> {
    oneshot::decompress_with_hint(data, buffer_size)
}

pub fn create_compression_session() -> Result<CompressionSession> {
    CompressionSession::new()
}

/// Start a frame on `session`, returning its header.
pub fn compression_begin(
    session: &CompressionSession,
    block_size_id: u32,
    block_mode_linked: bool,
    checksum: bool,
    autoflush: bool,
    level: i32,
    block_checksum: bool,
) -> Result<Vec<u8>> {
    let prefs = preferences(block_size_id, block_mode_linked, checksum, level, block_checksum)?
        .with_autoflush(autoflush);
    session.begin(&prefs)
}

pub fn compression_update(session: &CompressionSession, data: &[u8]) -> Result<Vec<u8>> {
    session.update(data)
}

pub fn compression_end(session: &CompressionSession) -> Result<Vec<u8>> {
    session.end()
}

pub fn create_decompression_session() -> Result<DecompressionSession> {
    DecompressionSession::new()
}

pub fn get_frame_info(session: &DecompressionSession) -> Result<FrameInfo> {
    session.frame_info()
}

pub fn decompression_update(
    session: &DecompressionSession,
    data: &[u8],
    chunk_len: usize,
) -> Result<DecodedChunks> {
    session.update_chunked(data, chunk_len)
}
