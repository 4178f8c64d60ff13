// Stream adapters over real files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};

use lz4framed::{decompress, BlockSizeId, FrameReader, FrameWriter, Preferences};

fn corpus(len: usize) -> Vec<u8> {
    let words: [&[u8]; 6] = [b"frame ", b"block ", b"checksum ", b"stream ", b"lz4 ", b"\n"];
    words.iter().cycle().flat_map(|w| w.iter().copied()).take(len).collect()
}

#[test]
fn write_file_then_read_back() {
    let data = corpus(3 * 1024 * 1024 + 123);
    let prefs = Preferences::new().with_block_size(BlockSizeId::Max1Mb);

    let mut file = tempfile::tempfile().unwrap();
    {
        let mut w = FrameWriter::new(BufWriter::new(&mut file), &prefs).unwrap();
        for piece in data.chunks(100_000) {
            w.write_all(piece).unwrap();
        }
        w.finish().unwrap();
    }

    file.seek(SeekFrom::Start(0)).unwrap();
    let mut reader = FrameReader::new(BufReader::new(&mut file)).unwrap();
    let mut out = Vec::new();
    let mut max_chunk = 0;
    for chunk in reader.by_ref() {
        let chunk = chunk.unwrap();
        max_chunk = max_chunk.max(chunk.len());
        out.extend_from_slice(&chunk);
    }
    assert!(out == data);
    let info = reader.frame_info().expect("header decoded");
    assert_eq!(info.block_size_id, BlockSizeId::Max1Mb);
    assert!(max_chunk <= info.block_size());
}

#[test]
fn file_written_by_writer_decodes_in_one_shot() {
    let data = corpus(200_000);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("payload.lz4");

    let mut w = FrameWriter::new(File::create(&path).unwrap(), &Preferences::new()).unwrap();
    w.write_all(&data).unwrap();
    w.flush().unwrap();
    w.write_all(&data).unwrap();
    w.finish().unwrap();

    let mut bytes = Vec::new();
    File::open(&path).unwrap().read_to_end(&mut bytes).unwrap();
    let out = decompress(&bytes).unwrap();
    assert_eq!(out.len(), 2 * data.len());
    assert!(out[..data.len()] == data[..] && out[data.len()..] == data[..]);
}

#[test]
fn two_frames_back_to_back() {
    let mut file = tempfile::tempfile().unwrap();
    for text in [&b"first"[..], &b"second"[..]] {
        let mut w = FrameWriter::new(&mut file, &Preferences::new()).unwrap();
        w.write_all(&text.repeat(10_000)).unwrap();
        w.finish().unwrap();
    }

    file.seek(SeekFrom::Start(0)).unwrap();
    let first = FrameReader::new(&mut file).unwrap().read_all().unwrap();
    let second = FrameReader::new(&mut file).unwrap().read_all().unwrap();
    assert_eq!(first, b"first".repeat(10_000));
    assert_eq!(second, b"second".repeat(10_000));
}
