//! Whole-buffer compression and decompression.
//!
//! `compress` writes a complete frame recording the payload length.
//! `decompress` reads exactly one frame, sizing its output from the declared
//! content size when present and otherwise growing geometrically from a hint.
//! A declared size is trusted only as far as the input could decode to.

use tracing::{debug, trace, warn};

use crate::buffer::{zeroed, OutputBuffer};
use crate::config::{DEFAULT_BUFFER_SIZE, MAX_EXPANSION};
use crate::engine::{self, compress_frame, compress_frame_bound, DecompressionContext};
use crate::error::{Error, Result};
use crate::gate::ConcurrencyGate;
use crate::types::Preferences;

/// Compress `data` into one frame using the process-wide gate.
pub fn compress(data: &[u8], prefs: &Preferences) -> Result<Vec<u8>> {
    compress_with_gate(data, prefs, &ConcurrencyGate::global())
}

/// Compress `data` into one frame. The frame always declares its content
/// size; `prefs.declared_content_size` is overridden with `data.len()`.
pub fn compress_with_gate(data: &[u8], prefs: &Preferences, gate: &ConcurrencyGate) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    prefs.validate()?;
    let prefs = prefs.clone().with_declared_content_size(Some(data.len() as u64));
    let raw = engine::raw_preferences(&prefs);

    let mut out = zeroed(compress_frame_bound(data.len(), &raw)?)?;
    let n = gate.run(data.len(), || compress_frame(&mut out, data, &raw))?;
    out.truncate(n);
    trace!(consumed = data.len(), produced = n, "compressed frame");
    Ok(out)
}

/// Decompress one frame with the default initial buffer size, using the
/// process-wide gate.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_with_gate(data, DEFAULT_BUFFER_SIZE, &ConcurrencyGate::global())
}

/// Decompress one frame. `buffer_size` is the initial output size for frames
/// that do not declare their content size.
pub fn decompress_with_hint(data: &[u8], buffer_size: usize) -> Result<Vec<u8>> {
    decompress_with_gate(data, buffer_size, &ConcurrencyGate::global())
}

pub fn decompress_with_gate(data: &[u8], buffer_size: usize, gate: &ConcurrencyGate) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    if buffer_size == 0 {
        return Err(Error::parameter("buffer_size", buffer_size));
    }

    let mut ctx = DecompressionContext::new()?;
    let (info, header_len) = ctx.frame_info(data)?;
    let mut input = &data[header_len..];
    let declared = info.declared_length;

    let mut out = if declared > 0 {
        let len = usize::try_from(declared).unwrap_or(usize::MAX);
        let reachable = input.len().saturating_mul(MAX_EXPANSION);
        if len > reachable {
            debug!(declared, reachable, "declared size exceeds what the input can decode to");
        }
        OutputBuffer::pinned(len.min(reachable))?
    } else {
        OutputBuffer::new(buffer_size.max(input.len()))?
    };

    loop {
        let pinned = out.is_pinned();
        let dst = out.spare_mut();
        let src = input;
        let progress = gate.run(src.len(), || ctx.decompress(dst, src, pinned))?;
        input = &input[progress.consumed..];
        out.advance(progress.written);

        if progress.hint == 0 {
            break;
        }
        if input.is_empty() {
            return Err(Error::IncompleteFrame);
        }
        if declared > 0 {
            warn!(
                declared,
                written = out.len(),
                remaining_input = input.len(),
                "lz4frame declared size mismatch"
            );
        }
        out.grow()?;
        trace!(capacity = out.capacity(), "decompression output grown");
    }
    Ok(out.into_vec())
}
