//! DerivedCache - abstract byte-level storage for memoized values.

use super::{CacheError, CacheStats};

/// Byte-level key-value storage behind the memoization layer.
///
/// Implementations must be safe to share between request workers. Typed
/// access goes through [`CacheExt`](super::CacheExt).
pub trait DerivedCache: Send + Sync {
    /// Get the encoded value stored under `key`. Counts a hit or a miss.
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store an encoded value, replacing whatever was there (last write wins).
    fn put_raw(&self, key: &str, bytes: Vec<u8>) -> Result<(), CacheError>;

    /// Drop one entry. Returns true if it existed.
    fn invalidate(&self, key: &str) -> Result<bool, CacheError>;

    /// Drop every entry whose key starts with `prefix`. Returns the count.
    fn invalidate_prefix(&self, prefix: &str) -> Result<usize, CacheError>;

    /// Drop every entry. Returns the count.
    fn invalidate_all(&self) -> Result<usize, CacheError>;

    fn stats(&self) -> Result<CacheStats, CacheError>;
}
