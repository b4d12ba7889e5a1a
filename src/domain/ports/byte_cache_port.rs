//! Port definition for byte caching.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::entities::{CacheEntry, ImageKey, ResponseMeta};

/// Port for byte-payload caching.
///
/// Implementations must be thread-safe, must insert and serve entries
/// whole, and must validate cacheability from the stored metadata.
#[async_trait]
pub trait ByteCachePort: Send + Sync {
    /// Attempts to look up a cached entry. Returns `None` on miss.
    async fn lookup(&self, key: &ImageKey) -> Option<CacheEntry>;

    /// Stores bytes with their originating response metadata.
    /// Entries whose metadata is not cacheable are discarded.
    async fn store(&self, key: ImageKey, bytes: Bytes, meta: ResponseMeta);

    /// Removes an entry.
    async fn evict(&self, key: &ImageKey);

    /// Returns the current number of cached entries.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries.
    async fn clear(&self);
}
