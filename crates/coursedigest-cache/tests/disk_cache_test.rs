use coursedigest_cache::{load, store, CacheKey, CacheStore, DiskCache};
use serde_json::json;

#[tokio::test]
async fn test_put_then_get_returns_identical_payload() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = DiskCache::new(tmp.path());
    let key = CacheKey::new("summary", ["CS577", "https://reddit.com/r/UWMadison/comments/1"]);
    let payload = json!({
        "narrative": "Heavy workload, fair grading.",
        "tags": ["Hard", "Great prof"],
        "estimate": "60%"
    });

    cache.put(&key, &payload).await.unwrap();

    assert_eq!(cache.get(&key).await.unwrap(), Some(payload));
}

#[tokio::test]
async fn test_corrupt_file_is_a_miss() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = DiskCache::new(tmp.path());
    let key = CacheKey::new("completion", ["prompt", "model"]);

    std::fs::write(cache.path_for(&key), b"{\"key\": \"completion:abc\", \"payl").unwrap();

    assert_eq!(cache.get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn test_foreign_json_is_a_miss() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = DiskCache::new(tmp.path());
    let key = CacheKey::new("search", ["CS577"]);

    std::fs::write(cache.path_for(&key), b"[\"bare\", \"list\"]").unwrap();

    assert_eq!(cache.get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn test_overwrite_keeps_last_write() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = DiskCache::new(tmp.path());
    let key = CacheKey::new("thread", ["https://reddit.com/r/UWMadison/comments/2"]);

    cache.put(&key, &json!({"v": 1})).await.unwrap();
    cache.put(&key, &json!({"v": 2})).await.unwrap();

    assert_eq!(cache.get(&key).await.unwrap(), Some(json!({"v": 2})));
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_entries_survive_a_new_handle() {
    let tmp = tempfile::tempdir().unwrap();
    let key = CacheKey::new("search", ["site:reddit.com/r/UWMadison CS577"]);

    store(&DiskCache::new(tmp.path()), &key, &vec!["a".to_string(), "b".to_string()]).await;

    let reopened = DiskCache::new(tmp.path());
    let links: Option<Vec<String>> = load(&reopened, &key).await;
    assert_eq!(links, Some(vec!["a".to_string(), "b".to_string()]));
}
