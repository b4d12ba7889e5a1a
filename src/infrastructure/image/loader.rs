//! Async image loading pipeline.
//!
//! Composes the byte cache, the single-flight guard, and the HTTP
//! transport: a cache hit returns immediately; a miss triggers one shared
//! download whose bytes land back in the cache.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, trace, warn};

use super::memory_cache::{CacheStats, MemoryByteCache};
use super::single_flight::FlightGroup;
use super::slot::ImageSlot;
use crate::domain::entities::{ImageKey, ImageSource, LoadedImage, ResponseMeta};
use crate::domain::errors::FetchError;
use crate::domain::ports::ByteCachePort;

/// Message sent when an asynchronous image load finishes.
#[derive(Debug, Clone)]
pub struct ImageLoadedEvent {
    /// Cache key of the requested image.
    pub key: ImageKey,
    /// The loaded image, or the error that ended the load.
    pub result: Result<LoadedImage, FetchError>,
}

/// Configuration for the image loader.
#[derive(Debug, Clone)]
pub struct ImageLoaderConfig {
    /// Maximum entries in the byte cache.
    pub cache_capacity: usize,
    /// Maximum concurrent downloads.
    pub max_concurrent_downloads: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ImageLoaderConfig {
    fn default() -> Self {
        Self {
            cache_capacity: super::memory_cache::DEFAULT_CACHE_CAPACITY,
            max_concurrent_downloads: 4,
            timeout_secs: 30,
        }
    }
}

/// Loads images through the cache-then-network pipeline.
pub struct ImageLoader {
    cache: Arc<MemoryByteCache>,
    flights: FlightGroup<Bytes>,
    semaphore: Arc<Semaphore>,
    http_client: reqwest::Client,
}

impl ImageLoader {
    /// Creates a loader over an injected cache.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ImageLoaderConfig, cache: Arc<MemoryByteCache>) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            cache,
            flights: FlightGroup::new(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_downloads)),
            http_client,
        })
    }

    /// Creates a loader with a fresh cache of the configured capacity.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(config: &ImageLoaderConfig) -> Result<Self, FetchError> {
        let cache = Arc::new(MemoryByteCache::new(config.cache_capacity));
        Self::new(config, cache)
    }

    /// Fetches raw bytes for `url`, serving from cache when possible.
    ///
    /// Concurrent callers for the same URL share a single download; on
    /// success the bytes are stored back into the cache keyed by the URL.
    ///
    /// # Errors
    /// Propagates transport, status, and URL failures from the download.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
        let key = ImageKey::from_url(url);

        if let Some(entry) = self.cache.lookup(&key).await {
            return Ok(entry.bytes);
        }

        let client = self.http_client.clone();
        let semaphore = Arc::clone(&self.semaphore);
        let cache = Arc::clone(&self.cache);
        let fetch_key = key.clone();
        let url = url.to_string();

        self.flights
            .run(&key, async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| FetchError::transport("downloader shut down"))?;

                let (bytes, meta) = download(&client, &url).await?;
                cache.store(fetch_key, bytes.clone(), meta).await;
                Ok(bytes)
            })
            .await
    }

    /// Loads and decodes an image for `slot`.
    ///
    /// Returns `None` when a newer load superseded this one while it was
    /// in flight; the stale result, success or failure, is discarded.
    pub async fn load(
        &self,
        slot: &ImageSlot,
        url: &str,
    ) -> Option<Result<LoadedImage, FetchError>> {
        let token = slot.begin();
        let key = ImageKey::from_url(url);

        let result = self.fetch_and_decode(&key, url).await;

        if !slot.is_current(token) {
            trace!(key = %key, "Discarding superseded image load");
            return None;
        }

        Some(result)
    }

    /// Starts a load in the background, delivering the outcome on `events`.
    ///
    /// Superseded completions are dropped without an event, like `load`.
    pub fn load_async(
        self: &Arc<Self>,
        slot: Arc<ImageSlot>,
        url: String,
        events: mpsc::UnboundedSender<ImageLoadedEvent>,
    ) {
        let loader = Arc::clone(self);
        tokio::spawn(async move {
            let key = ImageKey::from_url(&url);
            if let Some(result) = loader.load(&slot, &url).await
                && events.send(ImageLoadedEvent { key, result }).is_err()
            {
                warn!("Image event receiver dropped");
            }
        });
    }

    /// Returns byte cache statistics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn fetch_and_decode(
        &self,
        key: &ImageKey,
        url: &str,
    ) -> Result<LoadedImage, FetchError> {
        let (bytes, source) = if let Some(entry) = self.cache.lookup(key).await {
            (entry.bytes, ImageSource::Cache)
        } else {
            (self.fetch_bytes(url).await?, ImageSource::Network)
        };

        let image = decode(bytes).await?;

        debug!(key = %key, source = %source, "Image ready");

        Ok(LoadedImage {
            key: key.clone(),
            image,
            source,
        })
    }
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader").finish_non_exhaustive()
    }
}

/// Downloads a payload, mapping transport and status failures.
async fn download(
    client: &reqwest::Client,
    url: &str,
) -> Result<(Bytes, ResponseMeta), FetchError> {
    let url = reqwest::Url::parse(url).map_err(|_| FetchError::InvalidUrl)?;

    debug!(%url, "Downloading image");

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::transport("request timed out")
        } else if e.is_connect() {
            FetchError::transport("failed to connect")
        } else {
            FetchError::transport(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::server(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::transport(format!("failed to read body: {e}")))?;

    let meta = match content_type {
        Some(ct) => ResponseMeta::new(status.as_u16()).with_content_type(ct),
        None => ResponseMeta::new(status.as_u16()),
    };

    Ok((bytes, meta))
}

/// Decodes image bytes off the async runtime.
async fn decode(bytes: Bytes) -> Result<Arc<image::DynamicImage>, FetchError> {
    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| FetchError::invalid_payload(format!("decode task panicked: {e}")))?
        .map_err(|e| FetchError::invalid_payload(e.to_string()))?;
    Ok(Arc::new(decoded))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::infrastructure::http::testing::{http_response, spawn_server};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(width, height);
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    fn loader() -> ImageLoader {
        ImageLoader::with_config(&ImageLoaderConfig::default()).expect("loader")
    }

    #[tokio::test]
    async fn second_fetch_for_the_same_url_hits_the_cache() {
        let server = spawn_server(
            http_response(200, "OK", "image/png", &png_bytes(2, 2)),
            Duration::ZERO,
        )
        .await;
        let loader = loader();
        let url = server.url("/photo.png");

        let first = loader.fetch_bytes(&url).await.unwrap();
        let second = loader.fetch_bytes(&url).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_fetches_share_one_download() {
        let server = spawn_server(
            http_response(200, "OK", "image/png", &png_bytes(2, 2)),
            Duration::from_millis(100),
        )
        .await;
        let loader = loader();
        let url = server.url("/photo.png");

        let (first, second) = tokio::join!(loader.fetch_bytes(&url), loader.fetch_bytes(&url));

        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn load_decodes_cached_and_network_payloads() {
        let server = spawn_server(
            http_response(200, "OK", "image/png", &png_bytes(3, 2)),
            Duration::ZERO,
        )
        .await;
        let loader = loader();
        let slot = ImageSlot::new();
        let url = server.url("/photo.png");

        let network = loader.load(&slot, &url).await.expect("current").unwrap();
        assert_eq!(network.source, ImageSource::Network);
        assert_eq!(network.image.width(), 3);

        let cached = loader.load(&slot, &url).await.expect("current").unwrap();
        assert_eq!(cached.source, ImageSource::Cache);
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn a_superseded_load_is_silently_discarded() {
        let slow = spawn_server(
            http_response(200, "OK", "image/png", &png_bytes(2, 2)),
            Duration::from_millis(300),
        )
        .await;
        let fast = spawn_server(
            http_response(200, "OK", "image/png", &png_bytes(5, 5)),
            Duration::ZERO,
        )
        .await;
        let loader = loader();
        let slot = ImageSlot::new();

        let slow_url = slow.url("/first.png");
        let fast_url = fast.url("/second.png");

        let (stale, fresh) = tokio::join!(
            loader.load(&slot, &slow_url),
            loader.load(&slot, &fast_url),
        );

        assert!(stale.is_none());
        let fresh = fresh.expect("current").unwrap();
        assert_eq!(fresh.key, ImageKey::from_url(&fast_url));
        assert_eq!(fresh.image.width(), 5);
    }

    #[tokio::test]
    async fn errors_reach_the_slot_when_still_current() {
        let server = spawn_server(
            http_response(404, "Not Found", "text/plain", b"gone"),
            Duration::ZERO,
        )
        .await;
        let loader = loader();
        let slot = ImageSlot::new();

        let result = loader.load(&slot, &server.url("/missing.png")).await;
        assert_eq!(
            result.expect("current").unwrap_err(),
            FetchError::server(404)
        );
    }

    #[tokio::test]
    async fn undecodable_bytes_are_an_invalid_payload() {
        let server = spawn_server(
            http_response(200, "OK", "image/png", b"this is not an image"),
            Duration::ZERO,
        )
        .await;
        let loader = loader();
        let slot = ImageSlot::new();

        let result = loader.load(&slot, &server.url("/broken.png")).await;
        assert!(matches!(
            result.expect("current").unwrap_err(),
            FetchError::InvalidPayload { .. }
        ));
    }

    #[tokio::test]
    async fn failed_downloads_are_not_cached() {
        let server = spawn_server(
            http_response(500, "Internal Server Error", "text/plain", b"boom"),
            Duration::ZERO,
        )
        .await;
        let loader = loader();
        let url = server.url("/photo.png");

        let first = loader.fetch_bytes(&url).await;
        let second = loader.fetch_bytes(&url).await;

        assert!(first.is_err());
        assert!(second.is_err());
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn load_async_delivers_an_event() {
        let server = spawn_server(
            http_response(200, "OK", "image/png", &png_bytes(2, 2)),
            Duration::ZERO,
        )
        .await;
        let loader = Arc::new(loader());
        let slot = Arc::new(ImageSlot::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let url = server.url("/photo.png");

        loader.load_async(slot, url.clone(), tx);

        let event = rx.recv().await.expect("event");
        assert_eq!(event.key, ImageKey::from_url(&url));
        assert!(event.result.is_ok());
    }
}
