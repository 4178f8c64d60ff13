// decompress.rs — Decompression context handle.

use core::ptr;

use lz4::liblz4 as sys;
use lz4::liblz4::{c_uint, LZ4FDecompressOptions, LZ4FDecompressionContext};

use super::{check, empty_frame_info, frame_info_from_raw};
use crate::error::EngineError;
use crate::types::FrameInfo;

/// Result of one `LZ4F_decompress` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Input bytes consumed.
    pub consumed: usize,
    /// Output bytes produced.
    pub written: usize,
    /// Input bytes the engine expects next; 0 once the frame is complete.
    pub hint: usize,
}

/// Owned `LZ4F_dctx`. Freed on drop.
#[derive(Debug)]
pub struct DecompressionContext {
    ctx: LZ4FDecompressionContext,
}

// SAFETY: a decompression context has no thread affinity; callers serialise access
// through `&mut self`.
unsafe impl Send for DecompressionContext {}

impl DecompressionContext {
    pub fn new() -> Result<Self, EngineError> {
        let mut ctx = LZ4FDecompressionContext(ptr::null_mut());
        // SAFETY: the engine writes a fresh context pointer into `ctx`.
        check(unsafe { sys::LZ4F_createDecompressionContext(&mut ctx, sys::LZ4F_VERSION) })?;
        Ok(DecompressionContext { ctx })
    }

    /// Report the frame header, decoding it from `src` if the context has not
    /// seen it yet. Returns the info and the number of `src` bytes consumed.
    ///
    /// With an empty `src` this only succeeds once the header was fully
    /// decoded by earlier calls.
    pub fn frame_info(&mut self, src: &[u8]) -> Result<(FrameInfo, usize), EngineError> {
        let mut raw = empty_frame_info();
        let mut consumed = src.len();
        // SAFETY: `src.as_ptr()` is non-null even for an empty slice, and is
        // valid for `consumed` bytes; the engine never writes through it.
        let hint = check(unsafe {
            sys::LZ4F_getFrameInfo(self.ctx, &mut raw, src.as_ptr(), &mut consumed)
        })?;
        Ok((frame_info_from_raw(&raw, hint), consumed))
    }

    /// Decode as much of `src` as fits into `dst`.
    ///
    /// `stable_dst` promises that everything written into earlier `dst`
    /// regions stays valid and untouched until the frame ends, letting the
    /// engine reference it instead of copying history into its own buffers.
    pub fn decompress(
        &mut self,
        dst: &mut [u8],
        src: &[u8],
        stable_dst: bool,
    ) -> Result<Progress, EngineError> {
        let options = LZ4FDecompressOptions { stable_dst: stable_dst as c_uint, reserved: [0; 3] };
        let mut written = dst.len();
        let mut consumed = src.len();
        // SAFETY: both slices are valid for their lengths for the whole call;
        // callers passing `stable_dst` uphold the retention promise above.
        let hint = check(unsafe {
            sys::LZ4F_decompress(
                self.ctx,
                dst.as_mut_ptr(),
                &mut written,
                src.as_ptr(),
                &mut consumed,
                &options,
            )
        })?;
        Ok(Progress { consumed, written, hint })
    }

    /// Abandon any frame in progress, including after an error.
    pub fn reset(&mut self) {
        // SAFETY: `ctx` is a live decompression context.
        unsafe { sys::LZ4F_resetDecompressionContext(self.ctx) }
    }
}

impl Drop for DecompressionContext {
    fn drop(&mut self) {
        // SAFETY: `ctx` came from LZ4F_createDecompressionContext and is freed
        // exactly once, here.
        unsafe {
            sys::LZ4F_freeDecompressionContext(self.ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{compress_frame, compress_frame_bound, raw_preferences};
    use crate::error::ErrorCode;
    use crate::types::Preferences;

    fn frame(data: &[u8]) -> Vec<u8> {
        let raw = raw_preferences(&Preferences::new().with_declared_content_size(Some(data.len() as u64)));
        let mut dst = vec![0u8; compress_frame_bound(data.len(), &raw).unwrap()];
        let n = compress_frame(&mut dst, data, &raw).unwrap();
        dst.truncate(n);
        dst
    }

    #[test]
    fn frame_info_needs_header_bytes() {
        let mut ctx = DecompressionContext::new().unwrap();
        let err = ctx.frame_info(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorCode::FrameHeaderIncomplete);
    }

    #[test]
    fn frame_info_consumes_header() {
        let data = b"hello hello hello hello".repeat(10);
        let f = frame(&data);
        let mut ctx = DecompressionContext::new().unwrap();
        let (info, consumed) = ctx.frame_info(&f).unwrap();
        assert_eq!(consumed, 15);
        assert_eq!(info.declared_length, data.len() as u64);
        assert!(info.input_hint > 0);

        // header already decoded: info is available without more input
        let (again, consumed) = ctx.frame_info(&[]).unwrap();
        assert_eq!(consumed, 0);
        assert_eq!(again.declared_length, info.declared_length);
    }

    #[test]
    fn decompress_whole_frame() {
        let data = b"0123456789".repeat(1000);
        let f = frame(&data);
        let mut ctx = DecompressionContext::new().unwrap();
        let mut out = vec![0u8; data.len()];
        let p = ctx.decompress(&mut out, &f, false).unwrap();
        assert_eq!(p.consumed, f.len());
        assert_eq!(p.written, data.len());
        assert_eq!(p.hint, 0);
        assert_eq!(out, data);
    }

    #[test]
    fn reset_recovers_from_garbage() {
        let mut ctx = DecompressionContext::new().unwrap();
        let mut out = [0u8; 64];
        assert!(ctx.decompress(&mut out, b"not a frame at all, only plain text bytes", false).is_err());
        ctx.reset();
        let f = frame(b"after reset");
        let p = ctx.decompress(&mut out, &f, false).unwrap();
        assert_eq!(&out[..p.written], b"after reset");
    }
}
