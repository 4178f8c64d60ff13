//! E2E Test Suite 04: Concurrency
//!
//! - Independent sessions run in parallel without interference
//! - One session shared between threads serializes calls
//! - Large calls release a host-wide lock; other host threads make progress

use std::sync::{Arc, Mutex};
use std::thread;

use rayon::prelude::*;

use lz4framed::{
    compress, decompress, CompressionSession, ConcurrencyGate, DecompressionSession,
    ExecutionLock, HostLock, Preferences, Stage, RELEASE_THRESHOLD,
};

fn payload(seed: u8, len: usize) -> Vec<u8> {
    (0..len).map(|i| seed.wrapping_add((i % 251) as u8).wrapping_mul(31)).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: independent sessions in parallel
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_parallel_independent_sessions() {
    let results: Vec<bool> = (0u8..32)
        .into_par_iter()
        .map(|seed| {
            let data = payload(seed, 100_000 + seed as usize * 1_000);
            let c = CompressionSession::new().expect("session");
            let mut frame = c.begin(&Preferences::new()).expect("begin");
            for piece in data.chunks(20_000) {
                frame.extend(c.update(piece).expect("update"));
            }
            frame.extend(c.end().expect("end"));

            let d = DecompressionSession::new().expect("session");
            let decoded = d.update(&frame).expect("decompress");
            decoded.input_hint == 0 && decoded.concat() == data
        })
        .collect();
    assert!(results.into_iter().all(|ok| ok));
}

#[test]
fn test_parallel_oneshot() {
    (0u8..16).into_par_iter().for_each(|seed| {
        let data = payload(seed, 250_000);
        let frame = compress(&data, &Preferences::new()).expect("compress");
        assert_eq!(decompress(&frame).expect("decompress"), data);
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: one session hammered from two threads
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_shared_decompression_session() {
    let frames: Vec<(Vec<u8>, Vec<u8>)> = (0u8..2)
        .map(|seed| {
            let data = payload(seed, 4 * RELEASE_THRESHOLD);
            let frame = compress(&data, &Preferences::new()).expect("compress");
            (frame, data)
        })
        .collect();
    let frames = Arc::new(frames);
    let session = Arc::new(DecompressionSession::new().expect("session"));

    let handles: Vec<_> = (0..2)
        .map(|t| {
            let session = Arc::clone(&session);
            let frames = Arc::clone(&frames);
            thread::spawn(move || {
                let (frame, data) = &frames[t];
                for _ in 0..200 {
                    // one call holds the whole frame, so calls cannot interleave mid-frame
                    let decoded = session.update_chunked(frame, 2 * RELEASE_THRESHOLD).expect("update");
                    assert_eq!(decoded.input_hint, 0);
                    assert!(decoded.concat() == *data);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("worker panicked");
    }
}

fn stream_frame(c: &CompressionSession, prefs: &Preferences, data: &[u8]) -> Vec<u8> {
    let mut frame = c.begin(prefs).expect("begin");
    for piece in data.chunks(2 * RELEASE_THRESHOLD) {
        frame.extend(c.update(piece).expect("update"));
    }
    frame.extend(c.end().expect("end"));
    frame
}

#[test]
fn test_shared_compression_session() {
    let prefs = Preferences::new().with_block_checksum(true);
    let inputs: Vec<Vec<u8>> = (0u8..2).map(|seed| payload(seed, 12 * RELEASE_THRESHOLD)).collect();
    let expected: Vec<Vec<u8>> = {
        let c = CompressionSession::with_gate(ConcurrencyGate::native()).expect("session");
        inputs.iter().map(|data| stream_frame(&c, &prefs, data)).collect()
    };

    let host = Arc::new(HostLock::new());
    let session = Arc::new(CompressionSession::with_gate(ConcurrencyGate::new(host.clone())).expect("session"));
    // a frame spans several calls, so callers take turns per frame
    let turn = Arc::new(Mutex::new(()));
    let inputs = Arc::new(inputs);

    let handles: Vec<_> = (0..2)
        .map(|t| {
            let host = Arc::clone(&host);
            let session = Arc::clone(&session);
            let turn = Arc::clone(&turn);
            let inputs = Arc::clone(&inputs);
            let prefs = prefs.clone();
            thread::spawn(move || {
                let mut frames = Vec::new();
                for _ in 0..25 {
                    let _turn = turn.lock().expect("turn lock");
                    host.acquire();
                    frames.push(stream_frame(&session, &prefs, &inputs[t]));
                    assert!(host.is_held());
                    host.release();
                }
                frames
            })
        })
        .collect();

    for (t, h) in handles.into_iter().enumerate() {
        let frames = h.join().expect("worker panicked");
        assert!(frames.iter().all(|f| *f == expected[t]));
        assert_eq!(decompress(&frames[0]).expect("decompress"), inputs[t]);
    }
    assert_eq!(session.stage(), Stage::Idle);
    // every update is at or above the threshold
    assert!(host.releases() >= 2 * 25 * 6);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: host lock is released for large calls only
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_host_lock_released_above_threshold() {
    let host = Arc::new(HostLock::new());
    let gate = ConcurrencyGate::new(host.clone());
    let c = CompressionSession::with_gate(gate.clone()).expect("session");

    host.acquire();
    c.begin(&Preferences::new()).expect("begin");
    c.update(&payload(1, RELEASE_THRESHOLD - 1)).expect("small update");
    assert_eq!(host.releases(), 0);
    c.update(&payload(2, RELEASE_THRESHOLD)).expect("large update");
    assert_eq!(host.releases(), 1);
    c.end().expect("end");
    assert_eq!(host.releases(), 1);
    assert!(host.is_held());
    host.release();
}

#[test]
fn test_host_threads_share_sessions_without_deadlock() {
    let host = Arc::new(HostLock::new());
    let gate = ConcurrencyGate::new(host.clone());
    let session = Arc::new(DecompressionSession::with_gate(gate).expect("session"));
    let data = payload(9, 16 * RELEASE_THRESHOLD);
    let frame = Arc::new(compress(&data, &Preferences::new()).expect("compress"));
    let data = Arc::new(data);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let host = Arc::clone(&host);
            let session = Arc::clone(&session);
            let frame = Arc::clone(&frame);
            let data = Arc::clone(&data);
            thread::spawn(move || {
                for _ in 0..50 {
                    host.acquire();
                    let decoded = session.update(&frame).expect("update");
                    assert!(host.is_held());
                    host.release();
                    assert!(decoded.concat() == *data);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("worker panicked");
    }
    assert!(!host.is_held());
    // every explicit release plus at least one gate release per call
    assert!(host.releases() >= 2 * 4 * 50);
}
