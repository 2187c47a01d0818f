//! Short-lived response cache
//!
//! Registry responses change slowly; a small TTL keeps repeated panel
//! refreshes from hammering the API while staying fresh enough for
//! interactive use.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default time-to-live for cached responses
pub const DEFAULT_TTL: Duration = Duration::from_secs(2 * 60);

struct CacheEntry {
    value: serde_json::Value,
    expires: Instant,
}

/// TTL cache of raw JSON responses, keyed by request path
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache with the default TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Get a cached value if present and not expired
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;
        if Instant::now() >= entry.expires {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Insert a value, stamped with the cache's TTL
    pub fn insert(&self, key: impl Into<String>, value: serde_json::Value) {
        self.entries.lock().insert(
            key.into(),
            CacheEntry {
                value,
                expires: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
