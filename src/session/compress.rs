// compress.rs — Incremental frame production: begin, update*, end.

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::buffer::zeroed;
use crate::engine::{self, compress_bound, CompressionContext, HEADER_SIZE_MAX};
use crate::error::{EngineError, Error, ErrorCode, Result};
use crate::gate::ConcurrencyGate;
use crate::types::Preferences;

/// Where a compression session is within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No frame open: only `begin` is accepted.
    Idle,
    /// Header emitted, accepting payload.
    Active,
}

#[derive(Debug)]
struct CompressState {
    ctx: CompressionContext,
    prefs: Preferences,
    stage: Stage,
}

/// Produces one frame at a time across `begin` / `update` / `end` calls.
///
/// Every operation holds the session's mutex for its full duration, so a
/// session may be shared between threads; calls are serialized. After `end`
/// the session returns to `Idle` and may start another frame.
#[derive(Debug)]
pub struct CompressionSession {
    state: Mutex<CompressState>,
    gate: ConcurrencyGate,
}

impl CompressionSession {
    /// New session using the process-wide gate.
    pub fn new() -> Result<Self> {
        Self::with_gate(ConcurrencyGate::global())
    }

    pub fn with_gate(gate: ConcurrencyGate) -> Result<Self> {
        let ctx = CompressionContext::new()?;
        debug!("compression session created");
        Ok(CompressionSession {
            state: Mutex::new(CompressState { ctx, prefs: Preferences::default(), stage: Stage::Idle }),
            gate,
        })
    }

    pub fn stage(&self) -> Stage {
        self.gate.lock(&self.state).stage
    }

    /// Preferences of the current (or last) frame.
    pub fn preferences(&self) -> Preferences {
        self.gate.lock(&self.state).prefs.clone()
    }

    /// Start a frame and return its header.
    ///
    /// Calling `begin` on an `Active` session abandons the open frame.
    pub fn begin(&self, prefs: &Preferences) -> Result<Vec<u8>> {
        prefs.validate()?;
        let raw = engine::raw_preferences(prefs);
        let mut state = self.gate.lock(&self.state);
        state.stage = Stage::Idle;

        let mut header = zeroed(HEADER_SIZE_MAX)?;
        let n = state.ctx.begin(&mut header, &raw)?;
        header.truncate(n);

        state.prefs = prefs.clone();
        state.stage = Stage::Active;
        debug!(
            block_size_id = ?prefs.block_size_id,
            block_mode = ?prefs.block_mode,
            level = prefs.compression_level,
            content_checksum = prefs.content_checksum,
            block_checksum = prefs.block_checksum,
            autoflush = prefs.autoflush,
            "frame started"
        );
        Ok(header)
    }

    /// Compress `data` into the open frame. May return nothing when the
    /// engine buffers input (autoflush off).
    pub fn update(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut state = self.gate.lock(&self.state);
        let state = &mut *state;
        require_active(state.stage)?;

        let raw = engine::raw_preferences(&state.prefs);
        let mut out = zeroed(compress_bound(data.len(), &raw)?)?;
        let ctx = &mut state.ctx;
        let n = self.gate.run(data.len(), || ctx.update(&mut out, data))?;
        out.truncate(n);
        trace!(consumed = data.len(), produced = n, "compress update");
        Ok(out)
    }

    /// Force buffered input out as a block without closing the frame.
    pub fn flush(&self) -> Result<Vec<u8>> {
        let mut state = self.gate.lock(&self.state);
        require_active(state.stage)?;

        let raw = engine::raw_preferences(&state.prefs);
        let mut out = zeroed(compress_bound(0, &raw)?)?;
        let n = state.ctx.flush(&mut out)?;
        out.truncate(n);
        Ok(out)
    }

    /// Close the frame: remaining data, end mark and optional checksum.
    pub fn end(&self) -> Result<Vec<u8>> {
        let mut state = self.gate.lock(&self.state);
        require_active(state.stage)?;

        let raw = engine::raw_preferences(&state.prefs);
        let mut out = zeroed(compress_bound(0, &raw)?)?;
        state.stage = Stage::Idle;
        let n = state.ctx.end(&mut out)?;
        out.truncate(n);
        debug!(produced = n, "frame finished");
        Ok(out)
    }
}

fn require_active(stage: Stage) -> Result<()> {
    match stage {
        Stage::Active => Ok(()),
        Stage::Idle => Err(EngineError::new(ErrorCode::CompressionStateUninitialized).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockMode, BlockSizeId};

    fn session() -> CompressionSession {
        CompressionSession::with_gate(ConcurrencyGate::native()).unwrap()
    }

    #[test]
    fn update_before_begin_is_uninitialized() {
        let s = session();
        let err = s.update(b"abc").unwrap_err();
        assert_eq!(err.engine().map(|e| e.kind()), Some(ErrorCode::CompressionStateUninitialized));
        let err = s.end().unwrap_err();
        assert_eq!(err.engine().map(|e| e.kind()), Some(ErrorCode::CompressionStateUninitialized));
    }

    #[test]
    fn empty_update_is_rejected() {
        let s = session();
        s.begin(&Preferences::new()).unwrap();
        assert!(matches!(s.update(b""), Err(Error::EmptyInput)));
    }

    #[test]
    fn stage_transitions() {
        let s = session();
        assert_eq!(s.stage(), Stage::Idle);
        s.begin(&Preferences::new()).unwrap();
        assert_eq!(s.stage(), Stage::Active);
        s.update(b"payload").unwrap();
        s.end().unwrap();
        assert_eq!(s.stage(), Stage::Idle);
        assert!(s.update(b"payload").is_err());
    }

    #[test]
    fn invalid_level_leaves_session_untouched() {
        let s = session();
        let err = s.begin(&Preferences::new().with_level(13)).unwrap_err();
        assert!(matches!(err, Error::Parameter { name: "compression_level", value: 13 }));
        assert_eq!(s.stage(), Stage::Idle);
    }

    #[test]
    fn buffered_update_without_autoflush() {
        let s = session();
        s.begin(&Preferences::new().with_block_size(BlockSizeId::Max64Kb)).unwrap();
        assert!(s.update(&[1u8; 100]).unwrap().is_empty());
        assert!(!s.flush().unwrap().is_empty());
        s.end().unwrap();
    }

    #[test]
    fn begin_while_active_restarts() {
        let s = session();
        let h1 = s.begin(&Preferences::new()).unwrap();
        s.update(b"abandoned").unwrap();
        let h2 = s.begin(&Preferences::new().with_block_mode(BlockMode::Independent)).unwrap();
        assert_eq!(h1.len(), h2.len());
        assert_ne!(h1, h2);
        assert_eq!(s.preferences().block_mode, BlockMode::Independent);
    }
}
