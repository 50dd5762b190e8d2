//! In-memory response cache.
//!
//! Caches raw JSON bodies per request URL so repeated page renders within an
//! endpoint's TTL do not hit the remote catalog.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Entry in the response cache.
struct CacheEntry {
    body: Arc<Value>,
    stored_at: Instant,
    ttl: Duration,
    last_accessed: Instant,
}

impl CacheEntry {
    fn is_fresh(&self) -> bool {
        self.stored_at.elapsed() < self.ttl
    }
}

/// Thread-safe TTL cache keyed by request URL.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    max_entries: usize,
}

impl ResponseCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Get a cached body if present and not expired.
    pub fn get(&self, url: &str) -> Option<Arc<Value>> {
        if let Some(mut entry) = self.entries.get_mut(url) {
            if entry.is_fresh() {
                entry.last_accessed = Instant::now();
                return Some(Arc::clone(&entry.body));
            }
            // Expired, remove it
            drop(entry);
            self.entries.remove(url);
        }
        None
    }

    /// Store a body for `ttl`, evicting the least recently accessed entry when full.
    pub fn insert(&self, url: &str, body: Value, ttl: Duration) -> Arc<Value> {
        let body = Arc::new(body);
        let now = Instant::now();

        if !self.entries.contains_key(url) && self.entries.len() >= self.max_entries {
            self.cleanup_expired();
            if self.entries.len() >= self.max_entries {
                self.evict_oldest();
            }
        }

        self.entries.insert(
            url.to_string(),
            CacheEntry {
                body: Arc::clone(&body),
                stored_at: now,
                ttl,
                last_accessed: now,
            },
        );
        body
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove expired entries.
    pub fn cleanup_expired(&self) {
        self.entries.retain(|_, entry| entry.is_fresh());
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.last_accessed)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            tracing::debug!(url = %key, "Evicting cached catalog response");
            self.entries.remove(&key);
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(512)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_insert_and_get() {
        let cache = ResponseCache::new(10);
        cache.insert("https://api/a", json!({"items": []}), HOUR);

        let body = cache.get("https://api/a").unwrap();
        assert_eq!(*body, json!({"items": []}));
        assert!(cache.get("https://api/b").is_none());
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let cache = ResponseCache::new(10);
        cache.insert("https://api/a", json!(1), Duration::ZERO);
        assert!(cache.get("https://api/a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_evicts_least_recently_accessed() {
        let cache = ResponseCache::new(2);
        cache.insert("a", json!("a"), HOUR);
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("b", json!("b"), HOUR);
        std::thread::sleep(Duration::from_millis(2));
        // Touch "a" so "b" is the oldest access.
        cache.get("a").unwrap();
        cache.insert("c", json!("c"), HOUR);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_expired_entries_make_room_first() {
        let cache = ResponseCache::new(2);
        cache.insert("stale", json!(0), Duration::ZERO);
        cache.insert("a", json!("a"), HOUR);
        cache.insert("b", json!("b"), HOUR);

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn test_replace_existing_key() {
        let cache = ResponseCache::new(1);
        cache.insert("a", json!(1), HOUR);
        cache.insert("a", json!(2), HOUR);
        assert_eq!(cache.len(), 1);
        assert_eq!(*cache.get("a").unwrap(), json!(2));
    }
}
