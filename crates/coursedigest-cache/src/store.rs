use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::key::CacheKey;

/// Content-addressed result store
///
/// Entries are never updated in place: a changed input hashes to a different
/// key. Concurrent writers to one key race and the last write wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a previously stored payload. Unreadable entries are misses.
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>>;

    /// Store a payload under `key`, overwriting any previous entry
    async fn put(&self, key: &CacheKey, payload: &Value) -> Result<()>;
}
