use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use super::RequestKey;

/// Validity window of a cached response
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// A raw response payload and the moment it was captured
#[derive(Debug, Clone)]
pub struct CacheEntry {
    payload: Vec<u8>,
    captured_at: Instant,
}

impl CacheEntry {
    fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            captured_at: Instant::now(),
        }
    }

    fn is_valid(&self, ttl: Duration) -> bool {
        self.captured_at.elapsed() < ttl
    }
}

/// Time-bounded cache of raw response bytes keyed by canonical request
///
/// Validity is re-checked on every read; expired entries are removed lazily by the `get` that
/// finds them, there is no background sweep and no capacity bound. Safe to share between
/// concurrent request completions: concurrent `put`s to one key are last-write-wins.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<RequestKey, CacheEntry>>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached bytes for `key` if still valid, evicting the entry otherwise
    pub fn get(&self, key: &RequestKey) -> Option<Vec<u8>> {
        let mut entries = self.lock();

        match entries.get(key) {
            Some(entry) if entry.is_valid(self.ttl) => Some(entry.payload.clone()),
            Some(_) => {
                entries.remove(key);
                tracing::debug!(ttl_secs = self.ttl.as_secs(), "Evicted expired cache entry");
                None
            }
            None => None,
        }
    }

    /// Stores `payload` under `key`, replacing any previous entry with a freshly stamped one
    pub fn put(&self, key: RequestKey, payload: Vec<u8>) {
        self.lock().insert(key, CacheEntry::new(payload));
    }

    /// Number of stored entries, expired ones included until they are read
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave a half-written entry behind: inserts and
    // removals are single map operations.
    fn lock(&self) -> MutexGuard<'_, HashMap<RequestKey, CacheEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
