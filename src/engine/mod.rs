//! Safe bindings to liblz4's frame API.
//!
//! The block-level codec is liblz4 itself, linked through the `lz4` crate's
//! `liblz4` module. This module owns the `unsafe` boundary: context handles
//! are wrapped in RAII types that free the native context exactly once, raw
//! `size_t` results are classified through the engine's own error registry,
//! and `Preferences` / `FrameInfo` are converted to and from their C layouts.

mod compress;
mod decompress;
mod ffi;

use std::ffi::CStr;

use lz4::liblz4 as sys;
use lz4::liblz4::{c_uint, size_t, LZ4FFrameInfo, LZ4FPreferences};

use crate::error::{EngineError, ErrorCode};
use crate::types::{BlockMode, BlockSizeId, FrameInfo, Preferences};

pub use compress::{compress_bound, compress_frame, compress_frame_bound, CompressionContext};
pub use decompress::{DecompressionContext, Progress};

/// Frame API version the contexts are created for (`LZ4F_VERSION`).
pub const LZ4F_VERSION: u32 = sys::LZ4F_VERSION;

/// Fast mode uses acceleration `1 - level`, which the engine caps at 65537
/// (`LZ4_ACCELERATION_MAX`). Lower levels are clamped here so the engine
/// never negates `i32::MIN`.
const ACCELERATED_LEVEL_FLOOR: i32 = -65_536;

/// Smallest possible frame header (`LZ4F_HEADER_SIZE_MIN`).
pub const HEADER_SIZE_MIN: usize = 7;
/// Largest possible frame header (`LZ4F_HEADER_SIZE_MAX`).
pub const HEADER_SIZE_MAX: usize = 19;

/// Classify a raw engine result: sizes pass through, error codes become
/// `EngineError` named by `LZ4F_getErrorName`.
pub(crate) fn check(ret: size_t) -> Result<usize, EngineError> {
    // SAFETY: LZ4F_isError is a pure function of its argument.
    if unsafe { sys::LZ4F_isError(ret) } == 0 {
        return Ok(ret);
    }
    let kind = ErrorCode::from_raw(ret).unwrap_or(ErrorCode::Generic);
    Err(EngineError::with_name(kind, error_name(ret).unwrap_or(kind.name())))
}

fn error_name(ret: size_t) -> Option<&'static str> {
    // SAFETY: LZ4F_getErrorName returns a pointer into a static table of
    // NUL-terminated strings (or a static fallback), never NULL.
    let name = unsafe { sys::LZ4F_getErrorName(ret) };
    if name.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(name) }.to_str().ok()
}

/// Version string of the linked liblz4, e.g. `"1.10.0"`.
pub fn engine_version_string() -> &'static str {
    // SAFETY: LZ4_versionString returns a static NUL-terminated literal.
    let s = unsafe { ffi::LZ4_versionString() };
    if s.is_null() {
        return "";
    }
    unsafe { CStr::from_ptr(s) }.to_str().unwrap_or("")
}

/// Version number of the linked liblz4 (`major * 10000 + minor * 100 + release`).
pub fn engine_version_number() -> u32 {
    // SAFETY: no arguments, returns a constant.
    let n = unsafe { sys::LZ4_versionNumber() };
    u32::try_from(n).unwrap_or(0)
}

/// Frame API version reported by the linked liblz4 (`LZ4F_getVersion`).
pub fn frame_api_version() -> u32 {
    // SAFETY: no arguments, returns a constant.
    unsafe { ffi::LZ4F_getVersion() }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions to and from the C layouts
// ─────────────────────────────────────────────────────────────────────────────

/// Build the C preferences struct. Expects `prefs` to be validated.
pub(crate) fn raw_preferences(prefs: &Preferences) -> LZ4FPreferences {
    LZ4FPreferences {
        frame_info: LZ4FFrameInfo {
            block_size_id: match prefs.block_size_id {
                BlockSizeId::Default => sys::BlockSize::Default,
                BlockSizeId::Max64Kb => sys::BlockSize::Max64KB,
                BlockSizeId::Max256Kb => sys::BlockSize::Max256KB,
                BlockSizeId::Max1Mb => sys::BlockSize::Max1MB,
                BlockSizeId::Max4Mb => sys::BlockSize::Max4MB,
            },
            block_mode: match prefs.block_mode {
                BlockMode::Linked => sys::BlockMode::Linked,
                BlockMode::Independent => sys::BlockMode::Independent,
            },
            content_checksum_flag: if prefs.content_checksum {
                sys::ContentChecksum::ChecksumEnabled
            } else {
                sys::ContentChecksum::NoChecksum
            },
            frame_type: sys::FrameType::Frame,
            content_size: prefs.declared_content_size.unwrap_or(0),
            dict_id: 0,
            block_checksum_flag: if prefs.block_checksum {
                sys::BlockChecksum::BlockChecksumEnabled
            } else {
                sys::BlockChecksum::NoBlockChecksum
            },
        },
        // lz4-sys types the C `int` field as unsigned; the bits pass through
        compression_level: prefs.compression_level.max(ACCELERATED_LEVEL_FLOOR) as c_uint,
        auto_flush: prefs.autoflush as c_uint,
        favor_dec_speed: 0,
        reserved: [0; 3],
    }
}

/// Zeroed frame info for the engine to fill in.
pub(crate) fn empty_frame_info() -> LZ4FFrameInfo {
    LZ4FFrameInfo {
        block_size_id: sys::BlockSize::Default,
        block_mode: sys::BlockMode::Linked,
        content_checksum_flag: sys::ContentChecksum::NoChecksum,
        frame_type: sys::FrameType::Frame,
        content_size: 0,
        dict_id: 0,
        block_checksum_flag: sys::BlockChecksum::NoBlockChecksum,
    }
}

pub(crate) fn frame_info_from_raw(raw: &LZ4FFrameInfo, input_hint: usize) -> FrameInfo {
    FrameInfo {
        input_hint,
        declared_length: raw.content_size,
        block_size_id: match raw.block_size_id {
            sys::BlockSize::Default => BlockSizeId::Default,
            sys::BlockSize::Max64KB => BlockSizeId::Max64Kb,
            sys::BlockSize::Max256KB => BlockSizeId::Max256Kb,
            sys::BlockSize::Max1MB => BlockSizeId::Max1Mb,
            sys::BlockSize::Max4MB => BlockSizeId::Max4Mb,
        },
        block_mode_linked: matches!(raw.block_mode, sys::BlockMode::Linked),
        content_checksum_enabled: matches!(
            raw.content_checksum_flag,
            sys::ContentChecksum::ChecksumEnabled
        ),
        block_checksum_enabled: matches!(
            raw.block_checksum_flag,
            sys::BlockChecksum::BlockChecksumEnabled
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names_match_engine() {
        for code in ErrorCode::ALL.iter().skip(1) {
            let raw = (code.code() as usize).wrapping_neg();
            let err = check(raw).unwrap_err();
            assert_eq!(err.kind(), *code);
            assert_eq!(err.name(), code.name());
        }
    }

    #[test]
    fn sizes_pass_through() {
        assert_eq!(check(0).unwrap(), 0);
        assert_eq!(check(1234).unwrap(), 1234);
    }

    #[test]
    fn versions() {
        assert_eq!(frame_api_version(), LZ4F_VERSION);
        let number = engine_version_number();
        assert!(number >= 10_000);
        let expected = format!("{}.{}.{}", number / 10_000, (number / 100) % 100, number % 100);
        assert_eq!(engine_version_string(), expected);
    }

    #[test]
    fn preferences_round_trip_through_c_layout() {
        let prefs = Preferences::new()
            .with_block_size(BlockSizeId::Max1Mb)
            .with_block_mode(BlockMode::Independent)
            .with_block_checksum(true)
            .with_content_checksum(false)
            .with_declared_content_size(Some(77));
        let raw = raw_preferences(&prefs);
        let info = frame_info_from_raw(&raw.frame_info, 5);
        assert_eq!(info.input_hint, 5);
        assert_eq!(info.declared_length, 77);
        assert_eq!(info.block_size_id, BlockSizeId::Max1Mb);
        assert!(!info.block_mode_linked);
        assert!(!info.content_checksum_enabled);
        assert!(info.block_checksum_enabled);
    }

    #[test]
    fn negative_levels_keep_their_bits() {
        let raw = raw_preferences(&Preferences::new().with_level(-4));
        assert_eq!(raw.compression_level as i32, -4);
        let raw = raw_preferences(&Preferences::new().with_level(i32::MIN));
        assert_eq!(raw.compression_level as i32, -65_536);
    }
}
