//! JSON file key-value store.
//!
//! All keys live in one JSON object on disk. Every write rewrites the whole
//! file through a temp file and a rename, so readers never see a partially
//! written ledger. Several processes may open the same file: reads always
//! go to disk, and writers serialize on an advisory lock held on a sibling
//! `.lock` file.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::StoreError;
use crate::port::{BatchWrite, KeyValueStore, StoreLock};

type Entries = BTreeMap<String, String>;

/// This store's share of the cross-process lock.
///
/// `depth` counts live guards; the lock file stays locked while it is
/// non-zero.
#[derive(Default)]
struct LockState {
    depth: usize,
    file: Option<File>,
}

/// Releases one level of the lock on drop.
struct HeldLock {
    state: Arc<Mutex<LockState>>,
}

impl Drop for HeldLock {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            // Closing the descriptor releases the advisory lock.
            state.file = None;
            trace!("Ledger lock released");
        }
    }
}

/// File-backed store shared safely between processes.
pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
    lock: Arc<Mutex<LockState>>,
    // Serializes read-modify-write within this process.
    writer: Mutex<()>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or is not a JSON
    /// object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let store = Self {
            lock_path: path.with_extension("lock"),
            path,
            lock: Arc::default(),
            writer: Mutex::new(()),
        };

        let entries = store.read_entries()?;
        debug!(path = %store.path.display(), keys = entries.len(), "Opened ledger file");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StoreError> {
        let key = || self.path.display().to_string();
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(err) => {
                return Err(StoreError::Read {
                    key: key(),
                    reason: err.to_string(),
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt { key: key(), source })
    }

    fn ensure_parent(&self) -> Result<(), std::io::Error> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }

    /// Take one level of the cross-process lock, blocking while another
    /// process holds it.
    fn acquire(&self) -> Result<HeldLock, StoreError> {
        let lock_err = |err: std::io::Error| StoreError::Lock {
            path: self.lock_path.display().to_string(),
            reason: err.to_string(),
        };

        let mut state = self.lock.lock();
        if state.depth == 0 {
            self.ensure_parent().map_err(lock_err)?;
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&self.lock_path)
                .map_err(lock_err)?;
            FileExt::lock_exclusive(&file).map_err(lock_err)?;
            trace!(path = %self.lock_path.display(), "Ledger lock acquired");
            state.file = Some(file);
        }
        state.depth += 1;

        Ok(HeldLock {
            state: Arc::clone(&self.lock),
        })
    }

    /// Write `entries` to disk atomically.
    fn persist(&self, entries: &Entries, key: &str) -> Result<(), StoreError> {
        let write_err = |err: std::io::Error| StoreError::Write {
            key: key.to_string(),
            reason: err.to_string(),
        };

        let json = serde_json::to_string_pretty(entries).map_err(|err| StoreError::Write {
            key: key.to_string(),
            reason: err.to_string(),
        })?;

        self.ensure_parent().map_err(write_err)?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(write_err)?;

        let cleanup_and_err = |err: std::io::Error| {
            let _ = fs::remove_file(&temp_path);
            write_err(err)
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }

    /// Re-read the file under the lock, apply `writes` and persist.
    fn commit(&self, writes: Vec<BatchWrite>) -> Result<(), StoreError> {
        let _held = self.acquire()?;
        let _writer = self.writer.lock();

        let mut entries = self.read_entries()?;
        let mut label = String::new();
        for (key, value) in writes {
            if !label.is_empty() {
                label.push(',');
            }
            label.push_str(&key);
            match value {
                Some(value) => entries.insert(key, value),
                None => entries.remove(&key),
            };
        }

        self.persist(&entries, &label)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.commit(vec![(key.to_string(), Some(value))])
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.commit(vec![(key.to_string(), None)])
    }

    fn set_batch(&self, writes: Vec<BatchWrite>) -> Result<(), StoreError> {
        self.commit(writes)
    }

    fn lock(&self) -> Result<StoreLock, StoreError> {
        Ok(StoreLock::new(self.acquire()?))
    }
}
