// compress.rs — Compression context handle and the one-call frame compressor.

use core::ptr;

use lz4::liblz4 as sys;
use lz4::liblz4::{c_void, LZ4FCompressionContext, LZ4FPreferences};

use super::{check, ffi};
use crate::error::EngineError;

/// Owned `LZ4F_cctx`. Freed on drop.
#[derive(Debug)]
pub struct CompressionContext {
    ctx: LZ4FCompressionContext,
}

// SAFETY: a compression context has no thread affinity; callers serialise access
// through `&mut self`.
unsafe impl Send for CompressionContext {}

impl CompressionContext {
    pub fn new() -> Result<Self, EngineError> {
        let mut ctx = LZ4FCompressionContext(ptr::null_mut());
        // SAFETY: the engine writes a fresh context pointer into `ctx`.
        check(unsafe { sys::LZ4F_createCompressionContext(&mut ctx, sys::LZ4F_VERSION) })?;
        Ok(CompressionContext { ctx })
    }

    /// Write the frame header into `dst`. `dst` must hold at least
    /// `HEADER_SIZE_MAX` bytes.
    pub fn begin(&mut self, dst: &mut [u8], prefs: &LZ4FPreferences) -> Result<usize, EngineError> {
        // SAFETY: `dst` is a valid writable region of `dst.len()` bytes and
        // `prefs` outlives the call.
        check(unsafe { sys::LZ4F_compressBegin(self.ctx, dst.as_mut_ptr(), dst.len(), prefs) })
    }

    /// Compress `src` into `dst`. `dst` must hold `compress_bound(src.len())`.
    pub fn update(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, EngineError> {
        // SAFETY: both slices are valid for their lengths for the whole call.
        check(unsafe {
            sys::LZ4F_compressUpdate(
                self.ctx,
                dst.as_mut_ptr(),
                dst.len(),
                src.as_ptr(),
                src.len(),
                ptr::null(),
            )
        })
    }

    /// Emit any buffered input as a block without closing the frame.
    pub fn flush(&mut self, dst: &mut [u8]) -> Result<usize, EngineError> {
        // SAFETY: `dst` is valid for `dst.len()` bytes.
        check(unsafe { sys::LZ4F_flush(self.ctx, dst.as_mut_ptr(), dst.len(), ptr::null()) })
    }

    /// Flush, then write the end mark and optional content checksum.
    pub fn end(&mut self, dst: &mut [u8]) -> Result<usize, EngineError> {
        // SAFETY: `dst` is valid for `dst.len()` bytes.
        check(unsafe { sys::LZ4F_compressEnd(self.ctx, dst.as_mut_ptr(), dst.len(), ptr::null()) })
    }
}

impl Drop for CompressionContext {
    fn drop(&mut self) {
        // SAFETY: `ctx` came from LZ4F_createCompressionContext and is freed
        // exactly once, here.
        unsafe {
            sys::LZ4F_freeCompressionContext(self.ctx);
        }
    }
}

/// Worst-case output of one update (or of flush/end with `src_len == 0`),
/// including whatever the context may still hold buffered.
pub fn compress_bound(src_len: usize, prefs: &LZ4FPreferences) -> Result<usize, EngineError> {
    // SAFETY: pure computation over `prefs`.
    check(unsafe { sys::LZ4F_compressBound(src_len, prefs) })
}

/// Worst-case size of a complete frame holding `src_len` bytes.
pub fn compress_frame_bound(src_len: usize, prefs: &LZ4FPreferences) -> Result<usize, EngineError> {
    // SAFETY: pure computation over `prefs`.
    check(unsafe { ffi::LZ4F_compressFrameBound(src_len, prefs) })
}

/// Compress `src` as one complete frame into `dst`.
pub fn compress_frame(
    dst: &mut [u8],
    src: &[u8],
    prefs: &LZ4FPreferences,
) -> Result<usize, EngineError> {
    // SAFETY: both slices are valid for their lengths for the whole call.
    check(unsafe {
        ffi::LZ4F_compressFrame(
            dst.as_mut_ptr() as *mut c_void,
            dst.len(),
            src.as_ptr() as *const c_void,
            src.len(),
            prefs,
        )
    })
}
