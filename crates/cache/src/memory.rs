//! In-memory cache implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::{CacheError, CacheKey, CacheStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory TTL cache.
///
/// Entries are evicted lazily: an expired entry reads as absent and is
/// dropped on the next access. Prefix deletion scans the key space, which
/// is acceptable at the entry counts this service caches.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries, including not-yet-evicted expired ones.
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        let rendered = key.render();
        {
            let entries = self.entries.read().await;
            match entries.get(&rendered) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
            }
        }
        // Expired: evict under the write lock.
        self.entries.write().await.remove(&rendered);
        Ok(None)
    }

    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> Result<(), CacheError> {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.render(), entry);
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.entries.write().await.remove(&key.render());
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &CacheKey) -> Result<usize, CacheError> {
        let rendered = prefix.render();
        let boundary = format!("{rendered}:");
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|k, _| k != &rendered && !k.starts_with(&boundary));
        Ok(before - entries.len())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(parts: &[&str]) -> CacheKey {
        let mut key = CacheKey::new("test");
        for part in parts {
            key = key.part(part);
        }
        key
    }

    #[tokio::test]
    async fn set_then_get() {
        let cache = InMemoryCache::new();
        let k = key(&["a"]);

        cache
            .set(&k, "value".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get(&k).await.unwrap(), Some("value".to_string()));
    }

    #[tokio::test]
    async fn missing_key_reads_absent() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get(&key(&["nope"])).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = InMemoryCache::new();
        let k = key(&["a"]);

        cache
            .set(&k, "value".to_string(), Duration::from_secs(300))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.get(&k).await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get(&k).await.unwrap(), None);
        // Expired entry was evicted on read.
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn set_overwrites_existing_value() {
        let cache = InMemoryCache::new();
        let k = key(&["a"]);

        cache
            .set(&k, "one".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set(&k, "two".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get(&k).await.unwrap(), Some("two".to_string()));
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let cache = InMemoryCache::new();
        let k = key(&["a"]);

        cache
            .set(&k, "value".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        cache.delete(&k).await.unwrap();

        assert_eq!(cache.get(&k).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_prefix_removes_matching_entries_only() {
        let cache = InMemoryCache::new();
        let ttl = Duration::from_secs(60);

        cache
            .set(&key(&["user-1", "all", "1"]), "a".to_string(), ttl)
            .await
            .unwrap();
        cache
            .set(&key(&["user-1", "pending", "2"]), "b".to_string(), ttl)
            .await
            .unwrap();
        cache
            .set(&key(&["user-10", "all", "1"]), "c".to_string(), ttl)
            .await
            .unwrap();

        let dropped = cache.delete_prefix(&key(&["user-1"])).await.unwrap();
        assert_eq!(dropped, 2);

        assert_eq!(cache.get(&key(&["user-1", "all", "1"])).await.unwrap(), None);
        // "user-10" is not under the "user-1" prefix.
        assert_eq!(
            cache.get(&key(&["user-10", "all", "1"])).await.unwrap(),
            Some("c".to_string())
        );
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let cache = InMemoryCache::new();
        let ttl = Duration::from_secs(60);

        cache.set(&key(&["a"]), "a".to_string(), ttl).await.unwrap();
        cache.set(&key(&["b"]), "b".to_string(), ttl).await.unwrap();
        cache.clear().await.unwrap();

        assert_eq!(cache.entry_count().await, 0);
    }
}
