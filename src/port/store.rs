//! Key-value persistence port.
//!
//! Values are opaque strings (JSON in practice). Stores have no transactions;
//! [`KeyValueStore::set_batch`] gives callers an all-or-nothing multi-key
//! write at the logical level.

use crate::error::StoreError;

/// One write in a batch. `None` removes the key.
pub type BatchWrite = (String, Option<String>);

/// Held writer lock on a store. Released on drop.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct StoreLock {
    _held: Option<Box<dyn Send>>,
}

impl StoreLock {
    /// A guard that holds nothing, for stores private to one process.
    pub fn unlocked() -> Self {
        Self { _held: None }
    }

    pub fn new(held: impl Send + 'static) -> Self {
        Self {
            _held: Some(Box::new(held)),
        }
    }
}

impl std::fmt::Debug for StoreLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreLock")
            .field("held", &self._held.is_some())
            .finish()
    }
}

/// Synchronous key-value store.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Take the store's writer lock for a read-modify-write sequence.
    ///
    /// Stores shared between processes block here until no other process
    /// holds the lock. Writes made through this store while the guard is
    /// alive do not wait on it again.
    fn lock(&self) -> Result<StoreLock, StoreError> {
        Ok(StoreLock::unlocked())
    }

    /// Apply several writes so that either all of them or none are visible.
    ///
    /// The default applies them one by one and restores the previous values
    /// if any write fails. Stores that can write atomically should override
    /// it.
    fn set_batch(&self, writes: Vec<BatchWrite>) -> Result<(), StoreError> {
        let mut previous = Vec::with_capacity(writes.len());
        for (key, _) in &writes {
            previous.push((key.clone(), self.get(key)?));
        }

        for (applied, (key, value)) in writes.into_iter().enumerate() {
            let result = match value {
                Some(value) => self.set(&key, value),
                None => self.remove(&key),
            };
            if let Err(err) = result {
                for (key, value) in previous.into_iter().take(applied + 1).rev() {
                    // Best effort; the original failure is what gets reported.
                    let _ = match value {
                        Some(value) => self.set(&key, value),
                        None => self.remove(&key),
                    };
                }
                return Err(err);
            }
        }
        Ok(())
    }
}
