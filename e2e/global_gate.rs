//! E2E Test Suite 05: Process-wide Concurrency Gate
//!
//! Runs in its own process: installs a host lock as the global gate and checks
//! that sessions and one-shot calls created afterwards honour it.

use std::sync::Arc;

use lz4framed::{
    compress, decompress, install_global, ConcurrencyGate, DecompressionSession, ExecutionLock,
    HostLock, Preferences, RELEASE_THRESHOLD,
};

#[test]
fn test_global_gate_applies_to_oneshot_and_sessions() {
    let host = Arc::new(HostLock::new());
    install_global(ConcurrencyGate::new(host.clone())).expect("first install");
    assert!(install_global(ConcurrencyGate::native()).is_err(), "second install must fail");
    assert_eq!(ConcurrencyGate::global().threshold(), RELEASE_THRESHOLD);

    host.acquire();

    let small = compress(b"tiny", &Preferences::new()).expect("compress");
    assert_eq!(host.releases(), 0);
    assert_eq!(decompress(&small).expect("decompress"), b"tiny");
    assert_eq!(host.releases(), 0);

    let data = vec![0x5Au8; 4 * RELEASE_THRESHOLD];
    let frame = compress(&data, &Preferences::new()).expect("compress");
    assert_eq!(host.releases(), 1);

    let session = DecompressionSession::new().expect("session");
    let decoded = session.update(&frame).expect("update");
    assert_eq!(decoded.concat(), data);
    assert!(host.releases() >= 2);
    assert!(host.is_held());

    host.release();
}
