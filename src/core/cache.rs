use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

/// TTL-memoizing cache. Freshness is checked at access time: an entry is
/// served only while `now - fetched_at < ttl`. Expired entries are left in
/// place and overwritten by the next `put`; the key set is small and fixed,
/// so no further eviction is needed.
#[derive(Clone)]
pub struct TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<HashMap<K, CacheEntry<V>>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + std::fmt::Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get(&self, key: &K, ttl: Duration) -> Option<V> {
        let cache = self.inner.lock().await;
        if let Some(entry) = cache.get(key) {
            if entry.fetched_at.elapsed() < ttl {
                debug!("Cache HIT for key: {:?}", key);
                return Some(entry.value.clone());
            }
            debug!("Cache entry expired for key: {:?}", key);
            return None;
        }
        debug!("Cache MISS for key: {:?}", key);
        None
    }

    pub async fn put(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            fetched_at: Instant::now(),
        };
        let mut cache = self.inner.lock().await;
        debug!("Cache PUT for key: {:?}", key);
        cache.insert(key, entry);
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + std::fmt::Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_cache_get_put() {
        let cache = TtlCache::<String, i32>::new();
        let ttl = Duration::from_secs(60);

        // Initially, cache is empty
        assert!(cache.get(&"key1".to_string(), ttl).await.is_none());

        cache.put("key1".to_string(), 123).await;
        assert_eq!(cache.get(&"key1".to_string(), ttl).await, Some(123));

        // Get a non-existent key
        assert!(cache.get(&"key2".to_string(), ttl).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_ttl_expiration() {
        let cache = TtlCache::<String, i32>::new();

        cache.put("key1".to_string(), 123).await;
        assert_eq!(
            cache
                .get(&"key1".to_string(), Duration::from_millis(50))
                .await,
            Some(123)
        );

        sleep(Duration::from_millis(60)).await;
        assert!(
            cache
                .get(&"key1".to_string(), Duration::from_millis(50))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_ttl_checked_per_access() {
        let cache = TtlCache::<String, i32>::new();

        cache.put("key1".to_string(), 123).await;
        sleep(Duration::from_millis(20)).await;

        // The same entry is stale under a short TTL and fresh under a long one
        assert!(
            cache
                .get(&"key1".to_string(), Duration::from_millis(5))
                .await
                .is_none()
        );
        assert_eq!(
            cache.get(&"key1".to_string(), Duration::from_secs(60)).await,
            Some(123)
        );
    }

    #[tokio::test]
    async fn test_put_refreshes_fetched_at() {
        let cache = TtlCache::<String, i32>::new();
        let ttl = Duration::from_millis(50);

        cache.put("key1".to_string(), 1).await;
        sleep(Duration::from_millis(60)).await;
        assert!(cache.get(&"key1".to_string(), ttl).await.is_none());

        cache.put("key1".to_string(), 2).await;
        assert_eq!(cache.get(&"key1".to_string(), ttl).await, Some(2));
    }
}
