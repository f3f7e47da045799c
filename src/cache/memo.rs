//! Typed memoization over any [`DerivedCache`].

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{CacheError, DerivedCache};

/// Typed access and get-or-compute for any `DerivedCache`.
pub trait CacheExt: DerivedCache {
    /// Decode the value stored under `key`, if any.
    fn get<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>, CacheError> {
        match self.get_raw(key)? {
            Some(bytes) => bitcode::deserialize(&bytes)
                .map(Some)
                .map_err(|e| CacheError::Decode {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Encode and store `value` under `key`.
    fn put<V: Serialize>(&self, key: &str, value: &V) -> Result<(), CacheError> {
        let bytes = bitcode::serialize(value).map_err(|e| CacheError::Encode {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.put_raw(key, bytes)
    }

    /// Return the cached value for `key`, or run `compute`, store its result
    /// and return it.
    ///
    /// Nothing is stored when `compute` fails. Concurrent callers missing the
    /// same key may each run `compute`; the last store wins.
    fn get_or_compute<V, E, F>(&self, key: &str, compute: F) -> Result<V, E>
    where
        V: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(key)? {
            debug!(key, "cache hit");
            return Ok(value);
        }

        debug!(key, "cache miss");
        let value = compute()?;
        self.put(key, &value)?;
        Ok(value)
    }
}

impl<C: DerivedCache + ?Sized> CacheExt for C {}
