//! Frame parameters: block sizing, block linking, checksums, compression level.
//!
//! `Preferences` is the value object handed to compression sessions and the
//! one-shot codec. `FrameInfo` is what decompression reports back once a frame
//! header has been parsed.

use crate::config::{KB, MB};
use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Compression levels (lz4hc.h LZ4HC_CLEVEL_*)
// ─────────────────────────────────────────────────────────────────────────────

/// Default fast-mode level. Levels below it select accelerated fast mode,
/// trading ratio for speed.
pub const LEVEL_MIN: i32 = 0;
/// First level that selects the high-compression engine.
pub const LEVEL_MIN_HC: i32 = 2;
/// Highest accepted compression level.
pub const LEVEL_MAX: i32 = 12;

// ─────────────────────────────────────────────────────────────────────────────
// Block size and mode
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum block size of a frame, by its wire identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum BlockSizeId {
    /// Engine default, equivalent to `Max64Kb`.
    #[default]
    Default = 0,
    Max64Kb = 4,
    Max256Kb = 5,
    Max1Mb = 6,
    Max4Mb = 7,
}

impl BlockSizeId {
    pub const ALL: [BlockSizeId; 5] = [
        BlockSizeId::Default,
        BlockSizeId::Max64Kb,
        BlockSizeId::Max256Kb,
        BlockSizeId::Max1Mb,
        BlockSizeId::Max4Mb,
    ];

    /// Maximum uncompressed size of one block.
    pub fn bytes(self) -> usize {
        match self {
            BlockSizeId::Default | BlockSizeId::Max64Kb => 64 * KB,
            BlockSizeId::Max256Kb => 256 * KB,
            BlockSizeId::Max1Mb => MB,
            BlockSizeId::Max4Mb => 4 * MB,
        }
    }
}

impl TryFrom<u32> for BlockSizeId {
    type Error = Error;

    fn try_from(id: u32) -> Result<Self> {
        match id {
            0 => Ok(BlockSizeId::Default),
            4 => Ok(BlockSizeId::Max64Kb),
            5 => Ok(BlockSizeId::Max256Kb),
            6 => Ok(BlockSizeId::Max1Mb),
            7 => Ok(BlockSizeId::Max4Mb),
            _ => Err(Error::parameter("block_size_id", id)),
        }
    }
}

/// Whether blocks may reference data from preceding blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockMode {
    #[default]
    Linked,
    Independent,
}

impl BlockMode {
    pub fn from_linked(linked: bool) -> Self {
        if linked {
            BlockMode::Linked
        } else {
            BlockMode::Independent
        }
    }

    pub fn is_linked(self) -> bool {
        self == BlockMode::Linked
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preferences
// ─────────────────────────────────────────────────────────────────────────────

/// Compression settings for one frame.
///
/// Defaults match liblz4's zeroed preferences: linked 64 KiB blocks, no
/// checksums, fast mode, no declared size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub block_size_id: BlockSizeId,
    pub block_mode: BlockMode,
    pub block_checksum: bool,
    pub content_checksum: bool,
    /// Below `LEVEL_MIN_HC` selects fast mode, at or above it the HC engine.
    pub compression_level: i32,
    /// Emit a block on every update instead of buffering up to a full block.
    pub autoflush: bool,
    /// Payload length recorded in the header. The engine checks it at `end`.
    pub declared_content_size: Option<u64>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            block_size_id: BlockSizeId::Default,
            block_mode: BlockMode::Linked,
            block_checksum: false,
            content_checksum: false,
            compression_level: LEVEL_MIN,
            autoflush: false,
            declared_content_size: None,
        }
    }
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_size(mut self, id: BlockSizeId) -> Self {
        self.block_size_id = id;
        self
    }

    pub fn with_block_mode(mut self, mode: BlockMode) -> Self {
        self.block_mode = mode;
        self
    }

    pub fn with_block_checksum(mut self, enabled: bool) -> Self {
        self.block_checksum = enabled;
        self
    }

    pub fn with_content_checksum(mut self, enabled: bool) -> Self {
        self.content_checksum = enabled;
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }

    pub fn with_autoflush(mut self, autoflush: bool) -> Self {
        self.autoflush = autoflush;
        self
    }

    pub fn with_declared_content_size(mut self, size: Option<u64>) -> Self {
        self.declared_content_size = size;
        self
    }

    /// Reject settings the engine must never see.
    pub fn validate(&self) -> Result<()> {
        if self.compression_level > LEVEL_MAX {
            return Err(Error::parameter("compression_level", self.compression_level));
        }
        Ok(())
    }

    /// True when the level selects the high-compression engine.
    pub fn is_high_compression(&self) -> bool {
        self.compression_level >= LEVEL_MIN_HC
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameInfo
// ─────────────────────────────────────────────────────────────────────────────

/// Header parameters of a frame being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Bytes the engine would like to receive next (0 once the frame is done).
    pub input_hint: usize,
    /// Declared payload length, 0 when the frame does not record one.
    pub declared_length: u64,
    pub block_size_id: BlockSizeId,
    pub block_mode_linked: bool,
    pub content_checksum_enabled: bool,
    pub block_checksum_enabled: bool,
}

impl FrameInfo {
    /// Maximum uncompressed size of one block of this frame.
    pub fn block_size(&self) -> usize {
        self.block_size_id.bytes()
    }
}

/// Maximum block size in bytes for a raw block size identifier.
pub fn get_block_size(id: u32) -> Result<usize> {
    BlockSizeId::try_from(id).map(BlockSizeId::bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_sizes() {
        assert_eq!(get_block_size(0).unwrap(), 65_536);
        assert_eq!(get_block_size(4).unwrap(), 65_536);
        assert_eq!(get_block_size(5).unwrap(), 262_144);
        assert_eq!(get_block_size(6).unwrap(), 1_048_576);
        assert_eq!(get_block_size(7).unwrap(), 4_194_304);
    }

    #[test]
    fn unknown_block_size_ids_are_rejected() {
        for id in [1u32, 2, 3, 8, 999] {
            assert!(matches!(
                BlockSizeId::try_from(id),
                Err(Error::Parameter { name: "block_size_id", .. })
            ));
        }
    }

    #[test]
    fn level_range() {
        assert!(Preferences::new().with_level(LEVEL_MIN).validate().is_ok());
        assert!(Preferences::new().with_level(LEVEL_MAX).validate().is_ok());
        assert!(Preferences::new().with_level(LEVEL_MAX + 1).validate().is_err());
        assert!(Preferences::new().with_level(-1).validate().is_ok());
        assert!(Preferences::new().with_level(i32::MIN).validate().is_ok());
    }

    #[test]
    fn hc_threshold() {
        assert!(!Preferences::new().with_level(LEVEL_MIN_HC - 1).is_high_compression());
        assert!(!Preferences::new().with_level(-5).is_high_compression());
        assert!(Preferences::new().with_level(LEVEL_MIN_HC).is_high_compression());
    }

    #[test]
    fn defaults() {
        let p = Preferences::default();
        assert_eq!(p.block_size_id, BlockSizeId::Default);
        assert!(p.block_mode.is_linked());
        assert!(!p.content_checksum);
        assert!(!p.block_checksum);
        assert!(!p.autoflush);
        assert_eq!(p.declared_content_size, None);
    }
}
