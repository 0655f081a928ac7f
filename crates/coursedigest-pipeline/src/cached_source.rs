use async_trait::async_trait;
use coursedigest_cache::{load, store, CacheKey, CacheStore};
use coursedigest_sources::{Thread, ThreadSource};
use std::sync::Arc;

/// Memoizes successful thread fetches by URL.
///
/// Empty threads are never stored so a transient failure is retried on the
/// next run.
pub struct CachedThreadSource {
    inner: Arc<dyn ThreadSource>,
    cache: Arc<dyn CacheStore>,
}

impl CachedThreadSource {
    pub fn new(inner: Arc<dyn ThreadSource>, cache: Arc<dyn CacheStore>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl ThreadSource for CachedThreadSource {
    async fn fetch_thread(&self, url: &str) -> Thread {
        let key = CacheKey::new("thread", [url]);
        if let Some(thread) = load::<Thread>(self.cache.as_ref(), &key).await {
            return thread;
        }

        let thread = self.inner.fetch_thread(url).await;
        if !thread.is_empty() {
            store(self.cache.as_ref(), &key, &thread).await;
        }
        thread
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursedigest_cache::MemoryCache;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakySource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ThreadSource for FlakySource {
        async fn fetch_thread(&self, url: &str) -> Thread {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Thread::empty(url)
            } else {
                Thread::new(url, "CS577 review", "Hard but fair", vec!["Agreed".to_string()])
            }
        }
    }

    #[tokio::test]
    async fn test_empty_threads_are_refetched_then_cached() {
        let inner = Arc::new(FlakySource {
            calls: AtomicUsize::new(0),
        });
        let cache = Arc::new(MemoryCache::new());
        let source = CachedThreadSource::new(inner.clone(), cache.clone());
        let url = "https://www.reddit.com/r/UWMadison/comments/abc/cs577/";

        assert!(source.fetch_thread(url).await.is_empty());
        assert!(cache.is_empty());

        let fetched = source.fetch_thread(url).await;
        assert_eq!(fetched.title, "CS577 review");

        let again = source.fetch_thread(url).await;
        assert_eq!(again, fetched);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.count_operation("thread"), 1);
    }
}
