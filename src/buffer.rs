// buffer.rs — Fallible allocation and the growable decompression output buffer.

use tracing::debug;

use crate::error::{Error, Result};

/// Allocate `len` zeroed bytes, reporting failure instead of aborting.
pub(crate) fn zeroed(len: usize) -> Result<Vec<u8>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| Error::Allocation { requested: len })?;
    v.resize(len, 0);
    Ok(v)
}

/// Output buffer for one-shot decompression: a written prefix followed by
/// spare space, doubling in total size when the spare space runs out.
///
/// A *pinned* buffer backs direct-write decompression, where the engine may
/// keep referencing earlier output as the linked-block dictionary. Growing a
/// pinned buffer copies into a new allocation and keeps the old one alive
/// (and unmodified) until the buffer is dropped.
#[derive(Debug)]
pub(crate) struct OutputBuffer {
    buf: Vec<u8>,
    filled: usize,
    pinned: bool,
    retired: Vec<Vec<u8>>,
}

impl OutputBuffer {
    pub fn new(len: usize) -> Result<Self> {
        Ok(OutputBuffer { buf: zeroed(len.max(1))?, filled: 0, pinned: false, retired: Vec::new() })
    }

    pub fn pinned(len: usize) -> Result<Self> {
        let mut b = Self::new(len)?;
        b.pinned = true;
        Ok(b)
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.filled..]
    }

    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.filled + n <= self.buf.len());
        self.filled += n;
    }

    /// Double the total size, keeping the written prefix.
    pub fn grow(&mut self) -> Result<()> {
        let old = self.buf.len();
        let new = old.checked_mul(2).ok_or(Error::Allocation { requested: usize::MAX })?;
        if self.pinned {
            let mut next = zeroed(new)?;
            next[..self.filled].copy_from_slice(&self.buf[..self.filled]);
            self.retired.push(std::mem::replace(&mut self.buf, next));
        } else {
            self.buf
                .try_reserve_exact(new - old)
                .map_err(|_| Error::Allocation { requested: new })?;
            self.buf.resize(new, 0);
        }
        debug!(from = old, to = new, pinned = self.pinned, "grew decompression buffer");
        Ok(())
    }

    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.truncate(self.filled);
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_preserves_prefix() {
        let mut b = OutputBuffer::new(4).unwrap();
        b.spare_mut()[..3].copy_from_slice(b"abc");
        b.advance(3);
        b.grow().unwrap();
        assert_eq!(b.capacity(), 8);
        assert_eq!(b.spare_mut().len(), 5);
        assert_eq!(b.into_vec(), b"abc");
    }

    #[test]
    fn pinned_grow_keeps_old_allocation() {
        let mut b = OutputBuffer::pinned(2).unwrap();
        b.spare_mut().copy_from_slice(b"xy");
        b.advance(2);
        let before = b.buf.as_ptr();
        b.grow().unwrap();
        assert_eq!(b.retired.len(), 1);
        assert_eq!(b.retired[0].as_ptr(), before);
        assert_eq!(&b.retired[0][..], b"xy");
        assert_eq!(b.len(), 2);
        assert_eq!(b.into_vec(), b"xy");
    }

    #[test]
    fn zero_length_request_still_has_room() {
        let mut b = OutputBuffer::new(0).unwrap();
        assert_eq!(b.spare_mut().len(), 1);
    }

    #[test]
    fn absurd_allocation_is_reported() {
        assert!(matches!(zeroed(usize::MAX), Err(Error::Allocation { .. })));
    }
}
