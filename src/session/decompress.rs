// decompress.rs — Incremental frame consumption into fixed-size output chunks.

use std::mem;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::buffer::zeroed;
use crate::config::DEFAULT_CHUNK_LEN;
use crate::engine::DecompressionContext;
use crate::error::{Error, Result};
use crate::gate::ConcurrencyGate;
use crate::types::FrameInfo;

/// Output of one chunked decompression call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedChunks {
    /// Decoded payload, in order. Every chunk but the last is exactly the
    /// requested chunk length; the last is non-empty.
    pub chunks: Vec<Vec<u8>>,
    /// Input bytes the engine expects next; 0 once the frame is complete.
    pub input_hint: usize,
    /// Bytes of the supplied input consumed. Short of the input length only
    /// when the frame completed before the input ended.
    pub consumed: usize,
}

impl DecodedChunks {
    pub fn is_frame_complete(&self) -> bool {
        self.input_hint == 0
    }

    /// Total decoded bytes across all chunks.
    pub fn decoded_len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    pub fn concat(self) -> Vec<u8> {
        self.chunks.concat()
    }
}

impl IntoIterator for DecodedChunks {
    type Item = Vec<u8>;
    type IntoIter = std::vec::IntoIter<Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}

/// Consumes frame bytes in arbitrary pieces and yields decoded chunks.
///
/// Once a frame completes (`input_hint == 0`) the session accepts the next
/// frame's bytes without being rebuilt. After an engine error its state is
/// undefined: drop it or call [`reset`](Self::reset).
#[derive(Debug)]
pub struct DecompressionSession {
    ctx: Mutex<DecompressionContext>,
    gate: ConcurrencyGate,
}

impl DecompressionSession {
    /// New session using the process-wide gate.
    pub fn new() -> Result<Self> {
        Self::with_gate(ConcurrencyGate::global())
    }

    pub fn with_gate(gate: ConcurrencyGate) -> Result<Self> {
        let ctx = DecompressionContext::new()?;
        debug!("decompression session created");
        Ok(DecompressionSession { ctx: Mutex::new(ctx), gate })
    }

    /// Header parameters of the frame being decoded. Fails with the engine's
    /// header-incomplete error until the whole header has been fed.
    pub fn frame_info(&self) -> Result<FrameInfo> {
        let mut ctx = self.gate.lock(&self.ctx);
        let (info, _) = ctx.frame_info(&[])?;
        Ok(info)
    }

    /// Decode `data` with the default chunk length.
    pub fn update(&self, data: &[u8]) -> Result<DecodedChunks> {
        self.update_chunked(data, DEFAULT_CHUNK_LEN)
    }

    /// Decode as much of `data` as the frame contains, splitting output into
    /// chunks of `chunk_len` bytes.
    ///
    /// On error nothing decoded by this call is returned.
    pub fn update_chunked(&self, data: &[u8], chunk_len: usize) -> Result<DecodedChunks> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if chunk_len == 0 {
            return Err(Error::parameter("chunk_len", chunk_len));
        }
        let mut ctx = self.gate.lock(&self.ctx);
        let ctx = &mut *ctx;

        let mut chunks = Vec::new();
        let mut chunk = zeroed(chunk_len)?;
        let mut written = 0;
        let mut pos = 0;
        let mut hint = 1;

        while pos < data.len() && hint > 0 {
            if written == chunk_len {
                chunks.push(mem::replace(&mut chunk, zeroed(chunk_len)?));
                written = 0;
            }
            let dst = &mut chunk[written..];
            let src = &data[pos..];
            let progress = self.gate.run(dst.len(), || ctx.decompress(dst, src, false))?;
            trace!(
                consumed = progress.consumed,
                written = progress.written,
                hint = progress.hint,
                "decompress update"
            );
            pos += progress.consumed;
            written += progress.written;
            hint = progress.hint;
        }

        if written > 0 {
            chunk.truncate(written);
            chunks.push(chunk);
        }
        if hint == 0 {
            debug!(consumed = pos, "frame complete");
        }
        Ok(DecodedChunks { chunks, input_hint: hint, consumed: pos })
    }

    /// Drop any partially decoded frame; the next bytes must start a frame.
    pub fn reset(&self) {
        self.gate.lock(&self.ctx).reset();
    }
}
