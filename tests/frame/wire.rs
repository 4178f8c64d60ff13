// Wire-format checks: frame bytes produced by the codec are verified field by
// field against an independent XXH32 implementation.

use lz4framed::{compress, BlockMode, BlockSizeId, CompressionSession, Preferences};
use xxhash_rust::xxh32::xxh32;

const MAGIC: [u8; 4] = [0x04, 0x22, 0x4D, 0x18];

fn noisy(len: usize) -> Vec<u8> {
    let mut x: u64 = 0x2545_F491_4F6C_DD1D;
    (0..len)
        .map(|_| {
            x ^= x >> 12;
            x ^= x << 25;
            x ^= x >> 27;
            (x.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 56) as u8
        })
        .collect()
}

/// Walk the blocks after a header of `header_len` bytes; returns
/// (block size word, block data) pairs and the offset of the end mark.
fn blocks(frame: &[u8], header_len: usize, block_checksum: bool) -> (Vec<(u32, Vec<u8>)>, usize) {
    let mut pos = header_len;
    let mut out = Vec::new();
    loop {
        let word = u32::from_le_bytes(frame[pos..pos + 4].try_into().unwrap());
        if word == 0 {
            return (out, pos);
        }
        let len = (word & 0x7FFF_FFFF) as usize;
        let data = frame[pos + 4..pos + 4 + len].to_vec();
        pos += 4 + len;
        if block_checksum {
            let stored = u32::from_le_bytes(frame[pos..pos + 4].try_into().unwrap());
            assert_eq!(stored, xxh32(&data, 0), "block checksum");
            pos += 4;
        }
        out.push((word, data));
    }
}

#[test]
fn header_fields_and_checksum() {
    let data = b"wire format ".repeat(100);
    let prefs = Preferences::new()
        .with_block_size(BlockSizeId::Max1Mb)
        .with_block_mode(BlockMode::Independent)
        .with_block_checksum(true)
        .with_content_checksum(true);
    let frame = compress(&data, &prefs).unwrap();

    assert_eq!(frame[..4], MAGIC);
    let flg = frame[4];
    assert_eq!(flg >> 6, 0b01, "version");
    assert_ne!(flg & 0x20, 0, "block independence");
    assert_ne!(flg & 0x10, 0, "block checksum");
    assert_ne!(flg & 0x08, 0, "content size");
    assert_ne!(flg & 0x04, 0, "content checksum");
    // input fits in one block, so the engine may shrink the block size id
    let bd = frame[5];
    assert!((4..=6).contains(&(bd >> 4)));
    assert_eq!(u64::from_le_bytes(frame[6..14].try_into().unwrap()), data.len() as u64);

    let hc = (xxh32(&frame[4..14], 0) >> 8) as u8;
    assert_eq!(frame[14], hc, "header checksum");
}

#[test]
fn minimal_header_without_content_size() {
    let s = CompressionSession::new().unwrap();
    let header = s
        .begin(&Preferences::new().with_block_size(BlockSizeId::Max4Mb).with_content_checksum(false))
        .unwrap();
    assert_eq!(header.len(), 7);
    assert_eq!(header[..4], MAGIC);
    assert_eq!(header[4] & 0x08, 0);
    assert_eq!(header[4] & 0x04, 0);
    assert_eq!(header[5] >> 4, 7);
    assert_eq!(header[6], (xxh32(&header[4..6], 0) >> 8) as u8);
}

#[test]
fn content_checksum_and_end_mark() {
    let data = b"content checksum covers the whole payload ".repeat(5_000);
    let frame = compress(&data, &Preferences::new().with_content_checksum(true)).unwrap();
    let n = frame.len();
    assert_eq!(frame[n - 8..n - 4], [0, 0, 0, 0], "end mark");
    assert_eq!(frame[n - 4..], xxh32(&data, 0).to_le_bytes(), "content checksum");

    let (blocks, end) = blocks(&frame, 15, false);
    assert_eq!(end, n - 8);
    assert!(!blocks.is_empty());
}

#[test]
fn default_frame_ends_at_end_mark() {
    let data = b"no trailer by default ".repeat(1_000);
    let frame = compress(&data, &Preferences::new()).unwrap();
    assert_eq!(frame[4] & 0x04, 0, "content checksum flag");
    let (_, end) = blocks(&frame, 15, false);
    assert_eq!(end + 4, frame.len());
}

#[test]
fn block_checksums_cover_every_block() {
    let data = noisy(300_000);
    let frame = compress(&data, &Preferences::new().with_block_size(BlockSizeId::Max64Kb).with_block_checksum(true))
        .unwrap();
    let (blocks, _) = blocks(&frame, 15, true);
    // 300_000 bytes in 64 KiB blocks
    assert_eq!(blocks.len(), 5);
}

#[test]
fn incompressible_blocks_are_stored() {
    let data = noisy(64 * 1024);
    let frame = compress(&data, &Preferences::new().with_block_size(BlockSizeId::Max64Kb)).unwrap();
    let (blocks, _) = blocks(&frame, 15, false);
    assert_eq!(blocks.len(), 1);
    let (word, stored) = &blocks[0];
    assert_ne!(word & 0x8000_0000, 0, "uncompressed flag");
    assert_eq!(stored, &data);
}
