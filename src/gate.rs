//! Host-wide execution lock handling.
//!
//! An embedding host (an interpreter with a global lock, a single-threaded
//! event loop) may require that its lock be held whenever control is in host
//! code. Long-running engine calls should not keep it: a `ConcurrencyGate`
//! releases the host lock for the duration of any engine call whose input (or
//! output space) reaches its threshold, and reacquires it afterwards, even on
//! unwind.
//!
//! The gate is also how session mutexes are acquired: if a session is busy,
//! the host lock is released while waiting so that the thread currently inside
//! the session can reacquire the host lock and finish.
//!
//! Programs with no host lock use [`NativeThreads`], where release and
//! acquire are no-ops.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::config::RELEASE_THRESHOLD;

/// A lock the calling thread holds while running host code.
///
/// `release` is only ever called by a thread that holds the lock, and is
/// always paired with a later `acquire` on the same thread.
pub trait ExecutionLock: Send + Sync {
    fn release(&self);
    fn acquire(&self);
}

/// No host lock: threads run freely.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeThreads;

impl ExecutionLock for NativeThreads {
    #[inline]
    fn release(&self) {}
    #[inline]
    fn acquire(&self) {}
}

/// A binary host lock: at most one thread holds it at a time.
///
/// Host threads call [`acquire`](ExecutionLock::acquire) before entering
/// codec calls and [`release`](ExecutionLock::release) when they leave.
#[derive(Debug, Default)]
pub struct HostLock {
    held: Mutex<bool>,
    freed: Condvar,
    releases: AtomicU64,
}

impl HostLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        *self.held.lock()
    }

    /// Number of times the lock has been released.
    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::Relaxed)
    }
}

impl ExecutionLock for HostLock {
    fn release(&self) {
        let mut held = self.held.lock();
        *held = false;
        self.releases.fetch_add(1, Ordering::Relaxed);
        self.freed.notify_one();
    }

    fn acquire(&self) {
        let mut held = self.held.lock();
        while *held {
            self.freed.wait(&mut held);
        }
        *held = true;
    }
}

/// Releases the host lock on creation, reacquires it on drop.
struct Released<'a> {
    lock: &'a dyn ExecutionLock,
}

impl<'a> Released<'a> {
    fn new(lock: &'a dyn ExecutionLock) -> Self {
        lock.release();
        Released { lock }
    }
}

impl Drop for Released<'_> {
    fn drop(&mut self) {
        self.lock.acquire();
    }
}

/// Decides per call whether the host lock is held or released.
#[derive(Clone)]
pub struct ConcurrencyGate {
    lock: Arc<dyn ExecutionLock>,
    threshold: usize,
}

static GLOBAL: OnceLock<ConcurrencyGate> = OnceLock::new();

impl ConcurrencyGate {
    pub fn new(lock: Arc<dyn ExecutionLock>) -> Self {
        ConcurrencyGate { lock, threshold: RELEASE_THRESHOLD }
    }

    /// Gate for programs without a host lock.
    pub fn native() -> Self {
        Self::new(Arc::new(NativeThreads))
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// The process-wide gate, or a native gate if none was installed.
    pub fn global() -> Self {
        GLOBAL.get().cloned().unwrap_or_else(Self::native)
    }

    /// True when a call over `len` bytes runs without the host lock.
    #[inline]
    pub fn releases_for(&self, len: usize) -> bool {
        len >= self.threshold
    }

    /// Run `f`, releasing the host lock around it when `len` reaches the
    /// threshold.
    pub fn run<T>(&self, len: usize, f: impl FnOnce() -> T) -> T {
        if self.releases_for(len) {
            let _released = Released::new(&*self.lock);
            f()
        } else {
            f()
        }
    }

    /// Lock a session mutex, releasing the host lock while blocked on it.
    pub fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
        if let Some(guard) = mutex.try_lock() {
            return guard;
        }
        let _released = Released::new(&*self.lock);
        mutex.lock()
    }
}

impl fmt::Debug for ConcurrencyGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrencyGate").field("threshold", &self.threshold).finish_non_exhaustive()
    }
}

/// Install the process-wide gate used by sessions and one-shot calls that are
/// not given one explicitly. Only the first call succeeds; later calls hand the
/// rejected gate back.
pub fn install_global(gate: ConcurrencyGate) -> Result<(), ConcurrencyGate> {
    GLOBAL.set(gate)
}
