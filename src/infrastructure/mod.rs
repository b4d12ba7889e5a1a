//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Unsplash API client.
pub mod http;
/// Image handling (caching, loading).
pub mod image;

pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager};
pub use http::{ApiClient, RequestParams, UnsplashPhotoFetcher};
pub use self::image::{
    CacheStats, FlightGroup, ImageLoadedEvent, ImageLoader, ImageLoaderConfig, ImageSlot,
    MemoryByteCache, RequestToken,
};
