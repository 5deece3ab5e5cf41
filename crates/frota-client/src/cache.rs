//! Short-TTL response cache
//!
//! Memoizes parsed GET responses keyed by `METHOD_URL`. Entries expire
//! lazily on read; there is no background sweep. Any mutating domain call
//! clears the whole cache (coarse-grained on purpose — see DESIGN.md).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use reqwest::Method;
use serde_json::Value;
use url::Url;

/// Default entry lifetime
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

/// TTL-bounded memo of parsed GET responses
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// Create a cache with the given entry lifetime (fixed for the cache's life)
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache key for a request
    pub fn key(method: &Method, url: &Url) -> String {
        format!("{}_{}", method, url)
    }

    /// Look up a fresh entry; expired entries count as absent
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a parsed response
    pub fn set(&self, key: String, value: Value) {
        self.entries.lock().insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_within_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(30));
        cache.set("GET_http://x/a".into(), json!({"id": 1}));
        assert_eq!(cache.get("GET_http://x/a"), Some(json!({"id": 1})));
    }

    #[test]
    fn test_absent_key() {
        let cache = ResponseCache::default();
        assert_eq!(cache.get("GET_http://x/missing"), None);
    }

    #[test]
    fn test_lazy_expiry() {
        let cache = ResponseCache::new(Duration::from_millis(10));
        cache.set("GET_http://x/a".into(), json!(1));
        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(cache.get("GET_http://x/a"), None);
        // The expired entry was evicted on read
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = ResponseCache::default();
        cache.set("GET_http://x/a".into(), json!(1));
        cache.set("GET_http://x/b".into(), json!(2));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_key_includes_method() {
        let url = Url::parse("http://x/a").unwrap();
        assert_ne!(
            ResponseCache::key(&Method::GET, &url),
            ResponseCache::key(&Method::POST, &url)
        );
    }
}
