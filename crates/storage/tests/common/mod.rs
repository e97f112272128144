//! Store wrappers for adapter integration tests.
//!
//! - [`GatedStore`]: parks reads or writes inside the store until released,
//!   so tests can observe what the adapter lock lets through meanwhile
//! - [`FailingStore`]: injects store failures on demand
//! - [`init_tracing`]: opt-in log output for debugging a failing test

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::{Condvar, Mutex};
use rowstore_storage::{KvError, KvStore, StorageEngine, WriteBatch};
use rowstore_types::config::CommitDurability;

/// Routes adapter logs to the test harness; set `RUST_LOG=rowstore_storage=trace` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A latch that blocks callers until opened.
pub struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
}

impl Gate {
    pub fn new(open: bool) -> Self {
        Self { open: Mutex::new(open), cv: Condvar::new() }
    }

    pub fn wait(&self) {
        let mut open = self.open.lock();
        while !*open {
            self.cv.wait(&mut open);
        }
    }

    pub fn open(&self) {
        *self.open.lock() = true;
        self.cv.notify_all();
    }
}

/// In-memory engine whose reads and writes can be held inside the store.
pub struct GatedStore {
    inner: StorageEngine,
    pub read_gate: Gate,
    pub write_gate: Gate,
    pub reads_in_flight: AtomicUsize,
    pub writes_in_flight: AtomicUsize,
    pub reads_started: AtomicUsize,
    pub writes_started: AtomicUsize,
    pub max_concurrent_writes: AtomicUsize,
    /// Store calls in the order they reached the inner engine.
    pub calls: Mutex<Vec<&'static str>>,
}

impl GatedStore {
    /// Creates a store with both gates closed.
    pub fn closed() -> Self {
        Self::new(false, false)
    }

    pub fn new(reads_open: bool, writes_open: bool) -> Self {
        Self {
            inner: StorageEngine::open_in_memory().expect("open engine"),
            read_gate: Gate::new(reads_open),
            write_gate: Gate::new(writes_open),
            reads_in_flight: AtomicUsize::new(0),
            writes_in_flight: AtomicUsize::new(0),
            reads_started: AtomicUsize::new(0),
            writes_started: AtomicUsize::new(0),
            max_concurrent_writes: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl KvStore for GatedStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
        self.reads_started.fetch_add(1, Ordering::SeqCst);
        self.reads_in_flight.fetch_add(1, Ordering::SeqCst);
        self.read_gate.wait();
        self.calls.lock().push("get");
        let result = self.inner.get(key);
        self.reads_in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn write(&self, batch: WriteBatch, durability: CommitDurability) -> Result<(), KvError> {
        self.writes_started.fetch_add(1, Ordering::SeqCst);
        let concurrent = self.writes_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_concurrent_writes.fetch_max(concurrent, Ordering::SeqCst);
        self.write_gate.wait();
        self.calls.lock().push("write");
        let result = self.inner.write(batch, durability);
        self.writes_in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// In-memory engine that fails reads or writes while the flags are set.
pub struct FailingStore {
    pub inner: StorageEngine,
    pub fail_get: AtomicBool,
    pub fail_write: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self {
            inner: StorageEngine::open_in_memory().expect("open engine"),
            fail_get: AtomicBool::new(false),
            fail_write: AtomicBool::new(false),
        }
    }

    fn injected(message: &str) -> KvError {
        KvError::Storage { source: redb::StorageError::Io(std::io::Error::other(message.to_string())) }
    }
}

impl KvStore for FailingStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(Self::injected("injected read failure"));
        }
        self.inner.get(key)
    }

    fn write(&self, batch: WriteBatch, durability: CommitDurability) -> Result<(), KvError> {
        if self.fail_write.load(Ordering::SeqCst) {
            return Err(Self::injected("injected write failure"));
        }
        self.inner.write(batch, durability)
    }
}
