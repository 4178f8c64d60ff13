//! Criterion benchmarks for one-shot and session-based frame coding.
//!
//! Run with:
//!   cargo bench --bench frame
//!
//! Optionally set LZ4FRAMED_BENCH_FILE to benchmark on real data.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lz4framed::{
    compress, decompress, decompress_with_hint, CompressionSession, DecompressionSession,
    Preferences, LEVEL_MIN_HC,
};

mod corpus {
    include!("corpus.rs");
}

const SIZES: [usize; 3] = [65_536, 1_048_576, 8_388_608];

fn bench_oneshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("oneshot");

    for &size in &SIZES {
        let input = corpus::sample(size);
        group.throughput(Throughput::Bytes(size as u64));

        for (name, prefs) in [
            ("compress_fast", Preferences::new()),
            ("compress_hc", Preferences::new().with_level(LEVEL_MIN_HC)),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &input, |b, input| {
                b.iter(|| compress(input, &prefs).unwrap())
            });
        }

        // declared size: exact allocation, direct write
        let frame = compress(&input, &Preferences::new()).unwrap();
        group.bench_with_input(BenchmarkId::new("decompress_declared", size), &frame, |b, frame| {
            b.iter(|| decompress(frame).unwrap())
        });

        // undeclared size: geometric growth from the default hint
        let session = CompressionSession::new().unwrap();
        let mut undeclared = session.begin(&Preferences::new()).unwrap();
        undeclared.extend(session.update(&input).unwrap());
        undeclared.extend(session.end().unwrap());
        group.bench_with_input(BenchmarkId::new("decompress_growing", size), &undeclared, |b, frame| {
            b.iter(|| decompress_with_hint(frame, 1024).unwrap())
        });
    }

    group.finish();
}

fn bench_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    for &size in &SIZES {
        let input = corpus::sample(size);
        group.throughput(Throughput::Bytes(size as u64));

        let session = CompressionSession::new().unwrap();
        group.bench_with_input(BenchmarkId::new("compress_64k_updates", size), &input, |b, input| {
            b.iter(|| {
                let mut out = session.begin(&Preferences::new()).unwrap();
                for piece in input.chunks(65_536) {
                    out.extend(session.update(piece).unwrap());
                }
                out.extend(session.end().unwrap());
                out
            })
        });

        let frame = compress(&input, &Preferences::new()).unwrap();
        let dsession = DecompressionSession::new().unwrap();
        group.bench_with_input(BenchmarkId::new("decompress_chunked", size), &frame, |b, frame| {
            b.iter(|| {
                let decoded = dsession.update(frame).unwrap();
                assert_eq!(decoded.input_hint, 0);
                decoded.decoded_len()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_oneshot, bench_sessions);
criterion_main!(benches);
