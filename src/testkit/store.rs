//! A store that can be told to fail.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::adapter::store::MemoryStore;
use crate::error::StoreError;
use crate::port::{BatchWrite, KeyValueStore};

/// [`MemoryStore`] with switchable read and write failures.
///
/// Failed batch writes leave the contents untouched.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Successful `set`, `remove` and `set_batch` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_write(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write {
                key: key.to_string(),
                reason: "injected write failure".into(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Read {
                key: key.to_string(),
                reason: "injected read failure".into(),
            });
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.check_write(key)?;
        self.inner.set(key, value)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_write(key)?;
        self.inner.remove(key)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn set_batch(&self, writes: Vec<BatchWrite>) -> Result<(), StoreError> {
        let first = writes.first().map(|(key, _)| key.as_str()).unwrap_or("");
        self.check_write(first)?;
        self.inner.set_batch(writes)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
