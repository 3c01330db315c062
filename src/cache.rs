//! In-memory session cache.
//!
//! Holds shared, immutable values under string keys for the lifetime of the
//! owning [`crate::catalog::Catalog`]. Nothing expires; entries leave only
//! through [`SessionCache::invalidate`] or [`SessionCache::clear`].

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Key under which the merged catalog is stored.
pub const ALL_APIS_KEY: &str = "allApis";

pub struct SessionCache<T> {
    entries: RwLock<HashMap<String, Arc<T>>>,
}

impl<T> SessionCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<T>> {
        self.entries.read().await.get(key).cloned()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub async fn put(&self, key: &str, value: Arc<T>) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    /// Remove one key. Returns whether it was present.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<T> Default for SessionCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_returns_same_allocation() {
        let cache = SessionCache::new();
        let value = Arc::new(vec![1, 2, 3]);
        cache.put(ALL_APIS_KEY, value.clone()).await;

        let cached = cache.get(ALL_APIS_KEY).await.unwrap();
        assert!(Arc::ptr_eq(&value, &cached));
    }

    #[tokio::test]
    async fn invalidate_removes_entry() {
        let cache = SessionCache::new();
        cache.put("k", Arc::new("v".to_string())).await;

        assert!(cache.invalidate("k").await);
        assert!(!cache.invalidate("k").await);
        assert!(cache.get("k").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn last_write_wins() {
        let cache = SessionCache::new();
        cache.put("k", Arc::new(1)).await;
        cache.put("k", Arc::new(2)).await;
        assert_eq!(*cache.get("k").await.unwrap(), 2);
        assert_eq!(cache.len().await, 1);
    }
}
