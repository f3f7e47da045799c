//! InMemoryCache - HashMap-backed derived-data cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::{CacheError, CacheStats, DerivedCache};

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Process-wide cache backed by a HashMap of encoded values.
///
/// Clone-friendly via Arc: clones share entries and counters, so one instance
/// can be handed to every request worker.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    storage: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    counters: Arc<Counters>,
}

impl InMemoryCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently held, sorted.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| CacheError::LockPoisoned("keys"))?;
        let mut keys: Vec<String> = storage.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl DerivedCache for InMemoryCache {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| CacheError::LockPoisoned("read"))?;

        match storage.get(key) {
            Some(bytes) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(bytes.clone()))
            }
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    fn put_raw(&self, key: &str, bytes: Vec<u8>) -> Result<(), CacheError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| CacheError::LockPoisoned("write"))?;
        storage.insert(key.to_string(), bytes);
        Ok(())
    }

    fn invalidate(&self, key: &str) -> Result<bool, CacheError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| CacheError::LockPoisoned("invalidate"))?;
        Ok(storage.remove(key).is_some())
    }

    fn invalidate_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| CacheError::LockPoisoned("invalidate"))?;
        let before = storage.len();
        storage.retain(|key, _| !key.starts_with(prefix));
        let dropped = before - storage.len();
        debug!(prefix, dropped, "cache prefix invalidated");
        Ok(dropped)
    }

    fn invalidate_all(&self) -> Result<usize, CacheError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| CacheError::LockPoisoned("invalidate"))?;
        let dropped = storage.len();
        storage.clear();
        Ok(dropped)
    }

    fn stats(&self) -> Result<CacheStats, CacheError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| CacheError::LockPoisoned("stats"))?;
        Ok(CacheStats {
            entries: storage.len(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
        })
    }
}
