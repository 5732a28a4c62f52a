//! Cache store trait.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::CacheKey;

/// Errors raised by cache backends.
///
/// Callers are expected to log these and fall through to the source of
/// truth; a cache failure never fails a business operation.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache backend could not be reached.
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// A key-value cache with per-entry TTL.
///
/// Values are serialized payloads; the cache does not interpret them.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Looks up a key. Expired entries read as absent.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError>;

    /// Stores a value under a key for `ttl`.
    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes a single key.
    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError>;

    /// Removes every key the given key is a prefix of, returning the
    /// number of entries dropped.
    async fn delete_prefix(&self, prefix: &CacheKey) -> Result<usize, CacheError>;

    /// Removes all entries.
    async fn clear(&self) -> Result<(), CacheError>;
}
