//! In-memory LRU byte cache.

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::domain::entities::{CacheEntry, ImageKey, ResponseMeta};
use crate::domain::ports::ByteCachePort;

/// Default maximum number of entries to cache in memory.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// In-memory LRU cache for fetched byte payloads.
///
/// Thread-safe. Entries are inserted and served whole under a single map
/// lock, so a reader never observes a partially written entry.
pub struct MemoryByteCache {
    cache: Arc<RwLock<LruCache<ImageKey, CacheEntry>>>,
    hits: std::sync::atomic::AtomicU64,
    misses: std::sync::atomic::AtomicU64,
}

impl MemoryByteCache {
    /// Creates a new cache with the specified capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(RwLock::new(LruCache::new(cap))),
            hits: std::sync::atomic::AtomicU64::new(0),
            misses: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Creates a new cache with the default capacity.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(std::sync::atomic::Ordering::Relaxed);
        let misses = self.misses.load(std::sync::atomic::Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }

    /// Peeks at an entry without promoting it in the LRU.
    pub async fn peek(&self, key: &ImageKey) -> Option<CacheEntry> {
        let cache = self.cache.read().await;
        cache.peek(key).cloned()
    }
}

impl Default for MemoryByteCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached entries.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} entries, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

#[async_trait]
impl ByteCachePort for MemoryByteCache {
    async fn lookup(&self, key: &ImageKey) -> Option<CacheEntry> {
        let mut cache = self.cache.write().await;
        if let Some(entry) = cache.get(key) {
            self.hits
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            trace!(key = %key, "Cache hit");
            Some(entry.clone())
        } else {
            self.misses
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            trace!(key = %key, "Cache miss");
            None
        }
    }

    async fn store(&self, key: ImageKey, bytes: Bytes, meta: ResponseMeta) {
        if !meta.is_cacheable() {
            debug!(key = %key, status = meta.status, "Skipping non-cacheable response");
            return;
        }
        let mut cache = self.cache.write().await;
        debug!(key = %key, size = bytes.len(), "Storing payload in cache");
        cache.put(key, CacheEntry { bytes, meta });
    }

    async fn evict(&self, key: &ImageKey) {
        let mut cache = self.cache.write().await;
        if cache.pop(key).is_some() {
            debug!(key = %key, "Evicted payload from cache");
        }
    }

    fn len(&self) -> usize {
        // Best-effort estimate; may lag concurrent modifications.
        let cache = self.cache.try_read();
        cache.map(|c| c.len()).unwrap_or(0)
    }

    async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
        debug!("Cleared byte cache");
    }
}
