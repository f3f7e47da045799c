//! Derived-data cache - memoization of expensive joins and aggregations.
//!
//! Every derived value (score tables, performance lists, rankings) is computed
//! on first miss and kept until an explicit flush. Values are stored encoded,
//! so readers always receive an owned copy and never observe a partially
//! written entry.
//!
//! ## Example
//!
//! ```ignore
//! use usab_rankings::cache::{CacheExt, InMemoryCache, keys};
//!
//! let cache = InMemoryCache::new();
//! let ranks = cache.get_or_compute(&keys::ranks(1, EventType::BS, AgeGroup::U15), || {
//!     compute_ranks()
//! })?;
//! cache.invalidate_all()?;
//! ```

mod in_memory;
pub mod keys;
mod memo;
mod store;

use serde::Serialize;
use std::fmt;

/// Point-in-time counters of a cache instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Error type for cache operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The backing lock was poisoned by a panicking writer.
    LockPoisoned(&'static str),
    /// A value could not be encoded for storage.
    Encode { key: String, message: String },
    /// A stored value could not be decoded as the requested type.
    Decode { key: String, message: String },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::LockPoisoned(operation) => {
                write!(f, "cache lock poisoned during {}", operation)
            }
            CacheError::Encode { key, message } => {
                write!(f, "failed to encode cache entry {}: {}", key, message)
            }
            CacheError::Decode { key, message } => {
                write!(f, "failed to decode cache entry {}: {}", key, message)
            }
        }
    }
}

impl std::error::Error for CacheError {}

pub use in_memory::InMemoryCache;
pub use memo::CacheExt;
pub use store::DerivedCache;
