//! In-memory key-value store.
//!
//! Fast, thread-safe storage suitable for development, testing,
//! and single-process deployments. Behaves like a small slice of Redis:
//! values written with a TTL disappear on expiry, counters created by
//! `increment` persist until overwritten.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, instrument};

use webcache_core::error::{Result, StoreOperation, WebCacheError};
use webcache_core::traits::KeyValueStore;

/// A stored value with an optional TTL.
#[derive(Clone, Debug)]
struct StoreEntry {
    value: Vec<u8>,
    inserted_at: Instant,
    ttl: Option<Duration>,
}

impl StoreEntry {
    fn is_expired(&self) -> bool {
        match self.ttl {
            Some(ttl) => self.inserted_at.elapsed() > ttl,
            None => false,
        }
    }
}

/// In-memory key-value store.
///
/// Uses a concurrent map for thread-safe access without external
/// synchronization. Expired entries are dropped lazily when touched;
/// call [`purge_expired`](MemoryStore::purge_expired) to reclaim
/// memory eagerly.
///
/// # Thread Safety
///
/// All operations are thread-safe and can be called concurrently.
/// `increment` is atomic: concurrent callers each observe a distinct
/// counter value.
#[derive(Debug)]
pub struct MemoryStore {
    entries: DashMap<String, StoreEntry>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Creates a store with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of entries, including any not yet purged
    /// expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            if entry.is_expired() {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    /// Looks up a key, treating expired entries as absent.
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            // Re-checked under the shard lock so a concurrent overwrite
            // is not lost between the read above and the removal.
            self.entries.remove_if(key, |_, entry| entry.is_expired());
            debug!(key, "Dropped expired entry");
        }

        Ok(None)
    }

    /// Stores `value` under `key`, replacing any previous value and TTL.
    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set_with_expiry(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        debug!(key, ttl_ms = ttl.as_millis() as u64, "Storing entry");
        self.entries.insert(
            key.to_string(),
            StoreEntry {
                value,
                inserted_at: Instant::now(),
                ttl: Some(ttl),
            },
        );
        Ok(())
    }

    /// Atomically adds one to the counter at `key`, creating it at zero
    /// first. The entry's TTL, if any, is left untouched; an expired
    /// counter restarts from zero.
    #[instrument(skip(self))]
    async fn increment(&self, key: &str) -> Result<i64> {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| StoreEntry {
                value: b"0".to_vec(),
                inserted_at: Instant::now(),
                ttl: None,
            });

        if entry.is_expired() {
            entry.value = b"0".to_vec();
            entry.inserted_at = Instant::now();
            entry.ttl = None;
        }

        // Same failure surface as Redis INCR on a non-numeric value.
        let current: i64 = std::str::from_utf8(&entry.value)
            .ok()
            .and_then(|text| text.trim().parse().ok())
            .ok_or_else(|| WebCacheError::Store {
                operation: StoreOperation::Increment,
                key: key.to_string(),
                reason: "value is not an integer or out of range".into(),
            })?;

        let next = current.checked_add(1).ok_or_else(|| WebCacheError::Store {
            operation: StoreOperation::Increment,
            key: key.to_string(),
            reason: "increment or decrement would overflow".into(),
        })?;

        entry.value = next.to_string().into_bytes();
        debug!(key, count = next, "Incremented counter");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();

        store
            .set_with_expiry("result:a", b"hello".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        let value = store.get("result:a").await.unwrap();
        assert_eq!(value, Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("result:missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let store = MemoryStore::new();

        store
            .set_with_expiry("result:a", b"short lived".to_vec(), Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.get("result:a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value_and_ttl() {
        let store = MemoryStore::new();

        store
            .set_with_expiry("result:a", b"first".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        store
            .set_with_expiry("result:a", b"second".to_vec(), Duration::from_millis(10))
            .await
            .unwrap();

        assert_eq!(
            store.get("result:a").await.unwrap(),
            Some(b"second".to_vec())
        );

        tokio::time::sleep(Duration::from_millis(50)).await;

        // The shorter TTL from the overwrite won
        assert_eq!(store.get("result:a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_increment_creates_counter_at_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.increment("count:a").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_increment_counts_up() {
        let store = MemoryStore::new();

        assert_eq!(store.increment("count:a").await.unwrap(), 1);
        assert_eq!(store.increment("count:a").await.unwrap(), 2);
        assert_eq!(store.increment("count:a").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_increment_reads_existing_numeric_value() {
        let store = MemoryStore::new();

        store
            .set_with_expiry("count:a", b"41".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.increment("count:a").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_increment_rejects_non_numeric_value() {
        let store = MemoryStore::new();

        store
            .set_with_expiry("count:a", b"not a number".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        let err = store.increment("count:a").await.unwrap_err();
        assert!(err.is_store_error());
    }

    #[tokio::test]
    async fn test_counter_is_readable_as_plain_value() {
        let store = MemoryStore::new();

        store.increment("count:a").await.unwrap();
        store.increment("count:a").await.unwrap();

        assert_eq!(store.get("count:a").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn test_counters_do_not_expire() {
        let store = MemoryStore::new();

        store.increment("count:a").await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.get("count:a").await.unwrap(), Some(b"1".to_vec()));
    }

    #[tokio::test]
    async fn test_expired_counter_restarts_from_zero() {
        let store = MemoryStore::new();

        store
            .set_with_expiry("count:a", b"7".to_vec(), Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.increment("count:a").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_isolated() {
        let store = MemoryStore::new();

        store.increment("count:a").await.unwrap();
        store.increment("count:a").await.unwrap();
        store.increment("count:b").await.unwrap();

        assert_eq!(store.get("count:a").await.unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.get("count:b").await.unwrap(), Some(b"1".to_vec()));
    }

    #[tokio::test]
    async fn test_concurrent_increments() {
        use std::sync::Arc;
        use tokio::task::JoinSet;

        let store = Arc::new(MemoryStore::new());
        let mut tasks = JoinSet::new();

        // Spawn 100 concurrent increments on the same counter
        for _ in 0..100 {
            let store = store.clone();
            tasks.spawn(async move { store.increment("count:shared").await.unwrap() });
        }

        let mut seen = Vec::new();
        while let Some(result) = tasks.join_next().await {
            seen.push(result.unwrap());
        }

        // Every task observed a distinct value and none were lost
        seen.sort_unstable();
        assert_eq!(seen, (1..=100).collect::<Vec<i64>>());
        assert_eq!(store.get("count:shared").await.unwrap(), Some(b"100".to_vec()));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = MemoryStore::new();

        store
            .set_with_expiry("result:gone", b"x".to_vec(), Duration::from_millis(10))
            .await
            .unwrap();
        store
            .set_with_expiry("result:kept", b"y".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("result:kept").await.unwrap(), Some(b"y".to_vec()));
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::new();

        store.increment("count:a").await.unwrap();
        store
            .set_with_expiry("result:a", b"x".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.len(), 2);

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.get("count:a").await.unwrap(), None);
    }
}
