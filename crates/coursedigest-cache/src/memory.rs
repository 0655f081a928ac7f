// In-process cache with the same contract as the disk store

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::Result;
use crate::key::CacheKey;
use crate::store::CacheStore;

#[derive(Debug, Default)]
pub struct MemoryCache {
    store: RwLock<HashMap<CacheKey, Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic in another holder leaves the map intact, so keep using it
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, Value>> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, Value>> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an entry exists for `key`, without cloning the payload
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.read().contains_key(key)
    }

    /// Count entries written under an operation name
    pub fn count_operation(&self, operation: &str) -> usize {
        self.read().keys().filter(|k| k.operation() == operation).count()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>> {
        Ok(self.read().get(key).cloned())
    }

    async fn put(&self, key: &CacheKey, payload: &Value) -> Result<()> {
        self.write().insert(key.clone(), payload.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_cache_basic() {
        let cache = MemoryCache::new();
        let key1 = CacheKey::new("thread", ["https://reddit.com/r/x/1"]);
        let key2 = CacheKey::new("thread", ["https://reddit.com/r/x/2"]);

        cache.put(&key1, &json!({"title": "t"})).await.unwrap();

        assert_eq!(cache.get(&key1).await.unwrap(), Some(json!({"title": "t"})));
        assert_eq!(cache.get(&key2).await.unwrap(), None);
        assert!(cache.contains(&key1));
        assert_eq!(cache.count_operation("thread"), 1);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let cache = MemoryCache::new();
        let key = CacheKey::new("summary", ["q"]);

        cache.put(&key, &json!(1)).await.unwrap();
        cache.put(&key, &json!(2)).await.unwrap();

        assert_eq!(cache.get(&key).await.unwrap(), Some(json!(2)));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_writes_survive_poisoned_lock() {
        let cache = Arc::new(MemoryCache::new());
        let holder = Arc::clone(&cache);
        let _ = std::thread::spawn(move || {
            let _guard = holder.store.write().unwrap();
            panic!("holder panicked");
        })
        .join();
        assert!(cache.store.is_poisoned());

        let key = CacheKey::new("thread", ["https://reddit.com/r/x/3"]);
        cache.put(&key, &json!("kept")).await.unwrap();

        assert_eq!(cache.get(&key).await.unwrap(), Some(json!("kept")));
        assert_eq!(cache.len(), 1);
    }
}
