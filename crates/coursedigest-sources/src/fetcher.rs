use futures::stream::{self, StreamExt};
use std::sync::Arc;

use crate::reddit::ThreadSource;
use crate::types::Thread;

/// Fetch every URL with at most `concurrency` requests in flight.
///
/// Results come back in completion order, not input order. Failed fetches are
/// returned as empty threads for the caller to filter.
pub async fn fetch_threads(
    source: Arc<dyn ThreadSource>,
    urls: &[String],
    concurrency: usize,
) -> Vec<Thread> {
    let concurrency = concurrency.max(1);

    stream::iter(urls.iter().cloned())
        .map(|url| {
            let source = Arc::clone(&source);
            async move { source.fetch_thread(&url).await }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Tracks the peak number of concurrent fetches
    struct SlowSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ThreadSource for SlowSource {
        async fn fetch_thread(&self, url: &str) -> Thread {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url.ends_with("bad") {
                Thread::empty(url)
            } else {
                Thread::new(url, format!("title {}", url), "", vec![])
            }
        }
    }

    #[tokio::test]
    async fn test_bounded_fan_out() {
        let source = Arc::new(SlowSource {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let urls: Vec<String> = (0..10).map(|i| format!("https://reddit.com/r/x/{}", i)).collect();

        let threads = fetch_threads(source.clone(), &urls, 3).await;

        assert_eq!(threads.len(), 10);
        assert!(source.peak.load(Ordering::SeqCst) <= 3);
        for url in &urls {
            assert!(threads.iter().any(|t| &t.url == url));
        }
    }

    #[tokio::test]
    async fn test_failures_degrade_to_empty_threads() {
        let source = Arc::new(SlowSource {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let urls = vec!["https://reddit.com/r/x/ok".to_string(), "https://reddit.com/r/x/bad".to_string()];

        let threads = fetch_threads(source, &urls, 0).await;

        assert_eq!(threads.len(), 2);
        assert_eq!(threads.iter().filter(|t| t.is_empty()).count(), 1);
    }
}
