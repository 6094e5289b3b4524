//! Short-TTL cache for provider lookups.
//!
//! The directory client reads through a [`TtlCache`] so that repeated page
//! renders don't each hit the provider's rate limits. [`MemoryCache`] is the
//! in-process implementation; a shared cache can be plugged in by
//! implementing the trait.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;

/// A key-value cache whose entries expire after a per-entry TTL.
///
/// Expired entries are never returned. Concurrent writers to the same key
/// are last-write-wins.
#[async_trait]
pub trait TtlCache<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Get a live entry.
    async fn get(&self, key: &str) -> Option<V>;

    /// Insert or replace an entry that expires after `ttl`.
    async fn put(&self, key: String, value: V, ttl: Duration);

    /// Drop an entry.
    async fn invalidate(&self, key: &str);
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory [`TtlCache`] with lazy expiry.
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> MemoryCache<V> {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[async_trait]
impl<V> TtlCache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: evict unless a concurrent writer already refreshed it.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
        }
        None
    }

    async fn put(&self, key: String, value: V, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries.write().insert(key, Entry { value, expires_at });
    }

    async fn invalidate(&self, key: &str) {
        self.entries.write().remove(key);
    }
}
