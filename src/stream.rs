//! `std::io` adapters over the sessions.
//!
//! [`FrameWriter`] compresses everything written to it into a single frame.
//! [`FrameReader`] pulls one frame from a reader and yields decoded chunks,
//! reading exactly as many bytes as the engine asks for.

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read, Write};

use tracing::debug;

use crate::config::{READER_INITIAL_CHUNK, READER_PROBE_LEN};
use crate::error::{Error, Result};
use crate::session::{CompressionSession, DecompressionSession};
use crate::types::{FrameInfo, Preferences};

// ─────────────────────────────────────────────────────────────────────────────
// Writer
// ─────────────────────────────────────────────────────────────────────────────

/// Compresses written bytes into one frame on the inner writer.
///
/// The header is emitted together with the first compressed output. Call
/// [`finish`](Self::finish) to terminate the frame; dropping the writer
/// leaves the frame unterminated.
#[derive(Debug)]
pub struct FrameWriter<W: Write> {
    session: CompressionSession,
    writer: W,
    header: Option<Vec<u8>>,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(writer: W, prefs: &Preferences) -> Result<Self> {
        Self::with_session(writer, prefs, CompressionSession::new()?)
    }

    /// Use an existing session (for example one with its own gate).
    pub fn with_session(writer: W, prefs: &Preferences, session: CompressionSession) -> Result<Self> {
        let header = session.begin(prefs)?;
        Ok(FrameWriter { session, writer, header: Some(header) })
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    fn emit(&mut self, block: &[u8]) -> io::Result<()> {
        if let Some(header) = self.header.take() {
            self.writer.write_all(&header)?;
        }
        self.writer.write_all(block)
    }

    /// Close the frame and return the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        let tail = self.session.end()?;
        self.emit(&tail)?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Write for FrameWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let block = self.session.update(buf)?;
        self.emit(&block)?;
        Ok(buf.len())
    }

    /// Pushes buffered input out as a block, then flushes the inner writer.
    fn flush(&mut self) -> io::Result<()> {
        let block = self.session.flush()?;
        self.emit(&block)?;
        self.writer.flush()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reader
// ─────────────────────────────────────────────────────────────────────────────

/// Decodes one frame from the inner reader, yielding payload chunks.
///
/// The first read probes `READER_PROBE_LEN` bytes; afterwards each read asks
/// for exactly the engine's input hint, so nothing past the end of the frame
/// is consumed. End of input before the frame
/// completes is an `UnexpectedEof` error.
#[derive(Debug)]
pub struct FrameReader<R: Read> {
    reader: R,
    session: DecompressionSession,
    info: Option<FrameInfo>,
    chunk_len: usize,
    read_len: usize,
    pending: VecDeque<Vec<u8>>,
    done: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> Result<Self> {
        Self::with_session(reader, DecompressionSession::new()?)
    }

    pub fn with_session(reader: R, session: DecompressionSession) -> Result<Self> {
        Ok(FrameReader {
            reader,
            session,
            info: None,
            chunk_len: READER_INITIAL_CHUNK,
            read_len: READER_PROBE_LEN,
            pending: VecDeque::new(),
            done: false,
        })
    }

    /// Header parameters, once the header has been decoded.
    pub fn frame_info(&self) -> Option<FrameInfo> {
        self.info
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Decode the rest of the frame into one buffer.
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        for chunk in self.by_ref() {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }

    fn step(&mut self) -> io::Result<()> {
        let mut input = vec![0u8; self.read_len];
        let n = fill(&mut self.reader, &mut input)?;
        if n == 0 {
            return Err(Error::IncompleteFrame.into());
        }
        input.truncate(n);

        let decoded = self.session.update_chunked(&input, self.chunk_len)?;
        self.pending.extend(decoded.chunks);

        if self.info.is_none() {
            // header may still be partial
            if let Ok(info) = self.session.frame_info() {
                self.chunk_len = info.block_size();
                debug!(block_size = self.chunk_len, declared = info.declared_length, "frame header read");
                self.info = Some(info);
            }
        }
        if decoded.input_hint == 0 {
            self.done = true;
        } else {
            self.read_len = decoded.input_hint;
        }
        Ok(())
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(chunk) = self.pending.pop_front() {
                return Some(Ok(chunk));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.step() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}

/// Read until `buf` is full or the reader is exhausted.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
