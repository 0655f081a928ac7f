use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::key::CacheKey;
use crate::store::CacheStore;

/// On-disk envelope. `cached_at` is informational only; nothing expires.
#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    key: String,
    cached_at: DateTime<Utc>,
    payload: Value,
}

/// Flat directory of JSON files, one per key
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Make sure the directory exists and is writable
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for DiskCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Entry>(&bytes) {
            Ok(entry) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(Some(entry.payload))
            }
            Err(e) => {
                tracing::warn!(key = %key, path = %path.display(), error = %e, "Corrupt cache entry, treating as miss");
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &CacheKey, payload: &Value) -> Result<()> {
        self.ensure_dir().await?;

        let entry = Entry {
            key: key.to_string(),
            cached_at: Utc::now(),
            payload: payload.clone(),
        };
        let bytes = serde_json::to_vec(&entry)?;
        tokio::fs::write(self.path_for(key), bytes).await?;

        tracing::debug!(key = %key, "Cache entry written");
        Ok(())
    }
}
