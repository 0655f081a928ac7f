use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::key::CacheKey;
use crate::store::CacheStore;

/// Typed lookup. I/O errors and payloads of the wrong shape are misses.
pub async fn load<T: DeserializeOwned>(cache: &dyn CacheStore, key: &CacheKey) -> Option<T> {
    let value = match cache.get(key).await {
        Ok(Some(value)) => value,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Cache read failed, recomputing");
            return None;
        }
    };

    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Cached payload has unexpected shape, recomputing");
            None
        }
    }
}

/// Typed write. Failures are logged and otherwise ignored.
pub async fn store<T: Serialize>(cache: &dyn CacheStore, key: &CacheKey, value: &T) {
    let payload = match serde_json::to_value(value) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Could not serialize cache payload");
            return;
        }
    };

    if let Err(e) = cache.put(key, &payload).await {
        tracing::warn!(key = %key, error = %e, "Cache write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCache;
    use serde_json::json;

    #[tokio::test]
    async fn test_typed_roundtrip() {
        let cache = MemoryCache::new();
        let key = CacheKey::new("search", ["CS577"]);
        let links = vec!["https://reddit.com/r/UWMadison/comments/a".to_string()];

        store(&cache, &key, &links).await;
        let loaded: Option<Vec<String>> = load(&cache, &key).await;

        assert_eq!(loaded, Some(links));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_miss() {
        let cache = MemoryCache::new();
        let key = CacheKey::new("search", ["CS577"]);
        cache.put(&key, &json!({"not": "a list"})).await.unwrap();

        let loaded: Option<Vec<String>> = load(&cache, &key).await;
        assert!(loaded.is_none());
    }
}
