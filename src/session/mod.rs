//! Stateful compression and decompression sessions.
//!
//! A session owns one engine context and a mutex; all of its operations take
//! `&self`, so a session can be shared (e.g. behind an `Arc`) and calls on it
//! are serialized. Distinct sessions never contend.

mod compress;
mod decompress;

pub use compress::{CompressionSession, Stage};
pub use decompress::{DecodedChunks, DecompressionSession};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn sessions_are_shareable() {
        assert_send_sync::<CompressionSession>();
        assert_send_sync::<DecompressionSession>();
    }
}
