//! Domain types for cached image payloads.

use std::sync::Arc;

use bytes::Bytes;

/// Unique key for a cached payload.
/// Derived from a hash of the full request URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    /// Creates a key from any string-like input.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Creates a key from a URL by hashing it.
    ///
    /// The same URL always yields the same key; distinct URLs yield
    /// distinct keys.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let result = hasher.finalize();
        Self(hex::encode(&result[..16]))
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Response metadata captured alongside fetched bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    /// HTTP status of the originating response.
    pub status: u16,
    /// Content type of the originating response, when reported.
    pub content_type: Option<String>,
}

impl ResponseMeta {
    /// Creates metadata for the given status.
    #[must_use]
    pub const fn new(status: u16) -> Self {
        Self {
            status,
            content_type: None,
        }
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Whether the originating response may enter the cache.
    /// Only [200, 299] successes are eligible.
    #[must_use]
    pub const fn is_cacheable(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// A cached byte payload together with its originating response metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Raw payload bytes.
    pub bytes: Bytes,
    /// Metadata of the response that produced the bytes.
    pub meta: ResponseMeta,
}

/// A fully decoded image delivered to a consumer slot.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Cache key of the payload.
    pub key: ImageKey,
    /// The decoded image.
    pub image: Arc<image::DynamicImage>,
    /// Where the bytes were obtained.
    pub source: ImageSource,
}

/// Where image bytes were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from the in-memory cache.
    Cache,
    /// Downloaded from the network.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Network => write!(f, "network"),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn key_from_url_is_deterministic() {
        let url = "https://images.test/photos/abc/thumb";
        let first = ImageKey::from_url(url);
        let second = ImageKey::from_url(url);
        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 32);
    }

    #[test]
    fn distinct_urls_yield_distinct_keys() {
        let thumb = ImageKey::from_url("https://images.test/photos/abc/thumb");
        let regular = ImageKey::from_url("https://images.test/photos/abc/regular");
        assert_ne!(thumb, regular);
    }

    #[test]
    fn query_participates_in_the_key() {
        let plain = ImageKey::from_url("https://images.test/a");
        let sized = ImageKey::from_url("https://images.test/a?w=200");
        assert_ne!(plain, sized);
    }

    #[test_case(199, false; "status 199 is not cacheable")]
    #[test_case(200, true; "status 200 is cacheable")]
    #[test_case(299, true; "status 299 is cacheable")]
    #[test_case(300, false; "status 300 is not cacheable")]
    #[test_case(500, false; "status 500 is not cacheable")]
    fn cacheability_follows_the_success_range(status: u16, expected: bool) {
        assert_eq!(ResponseMeta::new(status).is_cacheable(), expected);
    }
}
